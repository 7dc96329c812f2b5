//! BRL display format
//!
//! `R$ 1.234,56`: two decimals, `.` groups thousands, `,` separates
//! centavos. Negative amounts carry the sign before the symbol.

use crate::money::{Money, CENTS_PER_REAL};
use crate::{Error, Result};

/// Currency symbol used by the display format
pub const CURRENCY_SYMBOL: &str = "R$";

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Format an amount the way the storefront displays totals
pub fn format_brl(amount: Money) -> String {
    let cents = amount.cents().unsigned_abs();
    let reais = cents / CENTS_PER_REAL as u64;
    let centavos = cents % CENTS_PER_REAL as u64;

    let digits = reais.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(ch);
    }

    let sign = if amount.is_negative() { "-" } else { "" };
    format!(
        "{}{} {}{}{:02}",
        sign, CURRENCY_SYMBOL, grouped, DECIMAL_SEPARATOR, centavos
    )
}

/// Parse a display-formatted amount back into centavos
///
/// Accepts the output of [`format_brl`] as well as the looser forms users
/// type into forms (`1234,5`, `-50`, `R$1.000`). Anything with more than
/// two decimal digits is rejected rather than rounded.
pub fn parse_brl(input: &str) -> Result<Money> {
    let mut rest = trim(input);
    if rest.is_empty() {
        return Err(Error::Parse("empty amount".to_string()));
    }

    let mut negative = false;
    if let Some(stripped) = strip_sign(rest, &mut negative) {
        rest = stripped;
    }
    if let Some(stripped) = rest.strip_prefix(CURRENCY_SYMBOL) {
        rest = trim(stripped);
        if !negative {
            if let Some(stripped) = strip_sign(rest, &mut negative) {
                rest = stripped;
            }
        }
    }

    let (integer, fraction) = match rest.split_once(DECIMAL_SEPARATOR) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rest, None),
    };

    let reais = parse_integer_part(integer, input)?;
    let centavos = match fraction {
        None => 0,
        Some(fraction) => parse_fraction(fraction, input)?,
    };

    let cents = reais
        .checked_mul(CENTS_PER_REAL)
        .and_then(|c| c.checked_add(centavos))
        .ok_or_else(|| Error::InvalidAmount(format!("'{}' is out of range", input)))?;

    Money::try_from_cents(if negative { -cents } else { cents })
}

fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{a0}')
}

fn strip_sign<'a>(s: &'a str, negative: &mut bool) -> Option<&'a str> {
    if let Some(stripped) = s.strip_prefix('-') {
        *negative = true;
        Some(trim(stripped))
    } else {
        s.strip_prefix('+').map(trim)
    }
}

fn parse_integer_part(integer: &str, input: &str) -> Result<i64> {
    if integer.is_empty() {
        return Err(Error::Parse(format!("'{}' has no integer part", input)));
    }

    let groups: Vec<&str> = integer.split(THOUSANDS_SEPARATOR).collect();
    if groups.len() > 1 {
        let head_ok = (1..=3).contains(&groups[0].len());
        let tail_ok = groups[1..].iter().all(|g| g.len() == 3);
        if !head_ok || !tail_ok {
            return Err(Error::Parse(format!(
                "'{}' has misplaced thousands separators",
                input
            )));
        }
    }

    let mut value: i64 = 0;
    for ch in groups.concat().chars() {
        let digit = ch
            .to_digit(10)
            .ok_or_else(|| Error::Parse(format!("unexpected '{}' in '{}'", ch, input)))?;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(digit)))
            .ok_or_else(|| Error::InvalidAmount(format!("'{}' is out of range", input)))?;
    }
    Ok(value)
}

fn parse_fraction(fraction: &str, input: &str) -> Result<i64> {
    if fraction.is_empty() || fraction.len() > 2 {
        return Err(Error::Parse(format!(
            "'{}' must have one or two decimal digits",
            input
        )));
    }
    let mut value: i64 = 0;
    for ch in fraction.chars() {
        let digit = ch
            .to_digit(10)
            .ok_or_else(|| Error::Parse(format!("unexpected '{}' in '{}'", ch, input)))?;
        value = value * 10 + i64::from(digit);
    }
    if fraction.len() == 1 {
        value *= 10;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Money::ZERO), "R$ 0,00");
        assert_eq!(format_brl(Money::from_cents(5)), "R$ 0,05");
        assert_eq!(format_brl(Money::from_cents(99_999)), "R$ 999,99");
        assert_eq!(format_brl(Money::from_cents(123_456)), "R$ 1.234,56");
        assert_eq!(format_brl(Money::from_cents(123_456_789)), "R$ 1.234.567,89");
        assert_eq!(format_brl(Money::from_cents(-5_000)), "-R$ 50,00");
    }

    #[test]
    fn test_parse_formatted() {
        assert_eq!(parse_brl("R$ 1.234,56").unwrap().cents(), 123_456);
        assert_eq!(parse_brl("-R$ 50,00").unwrap().cents(), -5_000);
        assert_eq!(parse_brl("R$\u{a0}0,05").unwrap().cents(), 5);
    }

    #[test]
    fn test_parse_loose_input() {
        assert_eq!(parse_brl("1234,5").unwrap().cents(), 123_450);
        assert_eq!(parse_brl("  950 ").unwrap().cents(), 95_000);
        assert_eq!(parse_brl("R$ -20,00").unwrap().cents(), -2_000);
        assert_eq!(parse_brl("R$1.000").unwrap().cents(), 100_000);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_brl("").is_err());
        assert!(parse_brl("R$").is_err());
        assert!(parse_brl("10,005").is_err());
        assert!(parse_brl("10,").is_err());
        assert!(parse_brl("1.23,00").is_err());
        assert!(parse_brl("12a,00").is_err());
        assert!(parse_brl("99999999999999999999").is_err());
    }

    #[test]
    fn test_bounds_round_trip() {
        for amount in [Money::MAX, Money::MIN, Money::from_cents(i64::MIN)] {
            assert_eq!(parse_brl(&format_brl(amount)).unwrap(), amount);
        }
        assert_eq!(format_brl(Money::MIN), "-R$ 23.058.430.092.136.939,51");
        assert!(matches!(
            parse_brl("-R$ 92.233.720.368.547.758,08"),
            Err(Error::InvalidAmount(_))
        ));
        assert!(parse_brl("R$ 23.058.430.092.136.939,52").is_err());
    }
}
