use budgetbox_config::Config;
use budgetbox_domain::Period;

/// Languages whose money is written `1.234,56`.
const DECIMAL_COMMA_LANGUAGES: [&str; 7] = ["pt", "es", "fr", "de", "it", "nl", "tr"];

/// Money and period formatting derived from the active configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    currency_symbol: String,
    decimal_comma: bool,
}

impl CliFormatters {
    pub fn new(config: &Config) -> Self {
        let language = config
            .locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self {
            currency_symbol: config.currency_symbol.clone(),
            decimal_comma: DECIMAL_COMMA_LANGUAGES.contains(&language.as_str()),
        }
    }

    pub fn format_amount(&self, amount: f64) -> String {
        let (decimal, grouping) = if self.decimal_comma {
            (',', '.')
        } else {
            ('.', ',')
        };
        let cents = (amount.abs() * 100.0).round() as u64;
        let whole = group_digits(cents / 100, grouping);
        let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
        format!(
            "{sign}{symbol} {whole}{decimal}{fraction:02}",
            symbol = self.currency_symbol,
            fraction = cents % 100
        )
    }

    pub fn period_label(&self, period: Period) -> String {
        format!("[{}] {}", period.badge(), period)
    }
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(locale: &str) -> CliFormatters {
        let config = Config {
            locale: locale.into(),
            ..Config::default()
        };
        CliFormatters::new(&config)
    }

    #[test]
    fn brazilian_locale_uses_decimal_comma() {
        let fmt = formatter("pt-BR");
        assert_eq!(fmt.format_amount(70.0), "R$ 70,00");
        assert_eq!(fmt.format_amount(1234.5), "R$ 1.234,50");
        assert_eq!(fmt.format_amount(-5.25), "-R$ 5,25");
    }

    #[test]
    fn english_locale_uses_decimal_point() {
        let fmt = formatter("en-US");
        assert_eq!(fmt.format_amount(1234567.891), "R$ 1,234,567.89");
        assert_eq!(fmt.format_amount(0.0), "R$ 0.00");
    }

    #[test]
    fn negative_zero_prints_without_sign() {
        assert_eq!(formatter("pt-BR").format_amount(-0.001), "R$ 0,00");
    }

    #[test]
    fn period_labels_carry_badges() {
        assert_eq!(formatter("pt-BR").period_label(Period::Weekly), "[W] weekly");
    }
}
