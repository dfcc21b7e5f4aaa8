// src/common/currency.rs

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formata um valor como moeda brasileira: `R$ 1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("R$ ")
            .expect("prefixo de moeda inválido")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-R$ ")
            .expect("prefixo de moeda inválido")
            .precision(Precision::Decimals(2))
    });

    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        // numfmt escreve zero como "0"
        return "R$ 0,00".to_owned();
    }
    let number = rounded.abs().to_f64().unwrap_or_default();

    let mut formatted = if rounded.is_sign_negative() {
        negative_fmt.fmt_string(number)
    } else {
        positive_fmt.fmt_string(number)
    };

    // numfmt omite zeros finais: "12.30" sai como "12.3"
    match formatted.rfind('.').map(|dot| formatted.len() - dot - 1) {
        None => formatted.push_str(".00"),
        Some(1) => formatted.push('0'),
        _ => {}
    }

    // numfmt só conhece o padrão en-US; troca os separadores para pt-BR
    formatted
        .chars()
        .map(|c| match c {
            ',' => '.',
            '.' => ',',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn brl(s: &str) -> String {
        format_brl(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn formats_whole_values_with_cents() {
        assert_eq!(brl("150"), "R$ 150,00");
        assert_eq!(brl("0"), "R$ 0,00");
    }

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(brl("1234.5"), "R$ 1.234,50");
        assert_eq!(brl("1234567.89"), "R$ 1.234.567,89");
        assert_eq!(brl("100000"), "R$ 100.000,00");
    }

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(brl("10.005"), "R$ 10,01");
        assert_eq!(brl("0.994"), "R$ 0,99");
    }

    #[test]
    fn negative_values_keep_the_sign_in_front() {
        assert_eq!(brl("-40"), "-R$ 40,00");
        assert_eq!(brl("-1234.5"), "-R$ 1.234,50");
    }

    #[test]
    fn values_that_round_to_zero_have_no_sign() {
        assert_eq!(brl("-0.001"), "R$ 0,00");
        assert_eq!(brl("0.05"), "R$ 0,05");
    }
}
