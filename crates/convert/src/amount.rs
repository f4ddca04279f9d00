use rust_decimal::Decimal;
use std::str::FromStr;

use csv2ofx_core::Money;

use crate::error::ConvertError;

/// Parse a locale-ambiguous amount string into a two-decimal [`Money`].
///
/// `decimal_sep` is the caller-configured decimal separator (`,` for
/// Brazilian-style `1.234,56`, `.` for `1,234.56`); the other punctuation
/// mark is treated as thousands grouping and removed. Currency symbols and
/// whitespace are stripped wherever they appear. An accounting-style
/// parenthesized value or any `-` marker makes the result negative.
pub fn normalize(raw: &str, decimal_sep: char) -> Result<Money, ConvertError> {
    let kept: String = raw
        .chars()
        .filter(|c| {
            c.is_ascii_digit() || matches!(*c, '+' | '-' | '(' | ')' | '.' | ',') || *c == decimal_sep
        })
        .collect();

    // Sign markers never cancel: parens or any dash forces negative.
    let negative = (kept.contains('(') && kept.contains(')')) || kept.contains('-');

    let grouping_sep = if decimal_sep == ',' { '.' } else { ',' };
    let digits: String = kept
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == decimal_sep)
        .filter(|c| *c != grouping_sep)
        .collect();

    if !digits.chars().any(|c| c.is_ascii_digit()) {
        return Err(ConvertError::MalformedAmount(raw.to_string()));
    }

    // With repeated separators the last one is the true decimal point; the
    // earlier ones can only have been grouping marks.
    let (int_part, frac_part) = match digits.rfind(decimal_sep) {
        Some(idx) => {
            let (head, tail) = digits.split_at(idx);
            let int_digits: String = head.chars().filter(char::is_ascii_digit).collect();
            (int_digits, tail[decimal_sep.len_utf8()..].to_string())
        }
        None => (digits, String::new()),
    };

    let canonical = if frac_part.is_empty() {
        if int_part.is_empty() {
            return Err(ConvertError::MalformedAmount(raw.to_string()));
        }
        int_part
    } else if int_part.is_empty() {
        format!("0.{frac_part}")
    } else {
        format!("{int_part}.{frac_part}")
    };

    let value = Decimal::from_str(&canonical)
        .map_err(|_| ConvertError::MalformedAmount(raw.to_string()))?;

    let value = if negative { -value.abs() } else { value };
    Ok(Money::from_decimal(value))
}
