//! Status lines for command output
//!
//! Every line goes through [`emit`]: cliclack log lines on a terminal, a
//! bracketed tag per line otherwise so scripts can grep for `[OK]`/`[WARN]`.

use super::context::UiContext;
use console::{style, StyledObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Fail,
    Info,
}

impl Status {
    fn tag(self) -> StyledObject<&'static str> {
        match self {
            Self::Ok => style("[OK]").green(),
            Self::Warn => style("[WARN]").yellow(),
            Self::Fail => style("[FAIL]").red(),
            Self::Info => style("[INFO]").cyan(),
        }
    }
}

fn emit(ctx: &UiContext, status: Status, message: &str) {
    if ctx.use_fancy_output() {
        let _ = match status {
            Status::Ok => cliclack::log::success(message),
            Status::Warn => cliclack::log::warning(message),
            Status::Fail => cliclack::log::error(message),
            Status::Info => cliclack::log::info(message),
        };
    } else {
        println!("  {} {}", status.tag(), message);
    }
}

/// Section heading, e.g. above the cart table
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        let _ = cliclack::intro(style(title).magenta().bold());
    } else {
        println!("{}", style(title).magenta().bold());
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    emit(ctx, Status::Ok, message);
}

/// Warning followed by what to run next
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    let hint = if ctx.use_fancy_output() {
        style(hint).dim().to_string()
    } else {
        hint.to_string()
    };
    emit(ctx, Status::Warn, &format!("{} - {}", message, hint));
}

pub fn step_fail(ctx: &UiContext, message: &str) {
    emit(ctx, Status::Fail, message);
}

pub fn step_info(ctx: &UiContext, message: &str) {
    emit(ctx, Status::Info, message);
}

/// Untagged, dimmed follow-up line
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        let _ = cliclack::log::remark(message);
    } else {
        println!("  {}", style(message).dim());
    }
}

/// Aligned `label: value` line for totals
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    let key = if ctx.use_fancy_output() {
        style(key).dim().to_string()
    } else {
        key.to_string()
    };
    println!("  {}: {}", key, value);
}
