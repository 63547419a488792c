//! Storefront colors for cliclack

use cliclack::ThemeState;
use console::Style;

/// Magenta accent; finished steps turn green, errors red
#[derive(Debug, Clone, Default)]
pub struct MarketTheme;

impl MarketTheme {
    fn accent(state: &ThemeState, submitted: Style) -> Style {
        match state {
            ThemeState::Active => Style::new().magenta(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => submitted,
        }
    }
}

impl cliclack::Theme for MarketTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        Self::accent(state, Style::new().magenta().dim())
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        Self::accent(state, Style::new().green())
    }
}

pub fn init_theme() {
    cliclack::set_theme(MarketTheme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cliclack::Theme;

    #[test]
    fn errors_are_red_in_both_slots() {
        let error = ThemeState::Error(String::new());
        assert_eq!(MarketTheme.bar_color(&error), Style::new().red());
        assert_eq!(MarketTheme.state_symbol_color(&error), Style::new().red());
        assert_eq!(
            MarketTheme.state_symbol_color(&ThemeState::Submit),
            Style::new().green()
        );
    }
}
