use std::fmt::Display;

use console::{style, StyledObject};

/// Rates at or above this read as healthy.
const HEALTHY_RATE: f64 = 90.0;
/// Rates below this read as failing; anything in between is flaky.
const FAILING_RATE: f64 = 50.0;

pub fn bright_yellow(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn bright_green(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn cyan(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).cyan()
}

pub fn dim(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn bright(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright()
}

pub fn magenta_bold(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

/// Success percentage with one decimal, coloured by health. Steps that
/// never ran are dimmed instead.
pub fn success_rate(rate: f64, total: usize) -> StyledObject<String> {
    let text = format!("{rate:.1}");
    if total == 0 {
        dim(text)
    } else if rate >= HEALTHY_RATE {
        bright_green(text)
    } else if rate >= FAILING_RATE {
        bright_yellow(text)
    } else {
        style(text).red().bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_keeps_one_decimal() {
        assert!(success_rate(100.0, 4).to_string().contains("100.0"));
        assert!(success_rate(200.0 / 3.0, 3).to_string().contains("66.7"));
        assert!(success_rate(0.0, 0).to_string().contains("0.0"));
    }

    #[test]
    fn test_success_rate_forced_colours_differ_by_band() {
        let render = |rate: f64, total: usize| success_rate(rate, total).force_styling(true).to_string();

        let healthy = render(95.0, 20);
        let flaky = render(60.0, 20);
        let failing = render(10.0, 20);
        let idle = render(0.0, 0);

        assert_ne!(healthy, flaky);
        assert_ne!(flaky, failing);
        assert_ne!(failing, idle);
        assert!(healthy.contains("95.0"));
    }
}
