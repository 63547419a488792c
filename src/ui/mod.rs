//! Terminal output helpers
//!
//! Uses `cliclack` for styled output on a terminal, with plain line output
//! when piped or running in CI.

mod context;
mod output;
mod progress;
mod theme;

pub use context::UiContext;
pub use output::{intro, key_value, remark, step_fail, step_info, step_ok, step_warn_hint};
pub use progress::TaskSpinner;
pub use theme::{init_theme, MarketTheme};
