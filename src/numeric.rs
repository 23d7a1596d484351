use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// Anchored at the first digit. Comma grouping wins over dot grouping, so
// "1,234.5" is English and "1.234,5" continental.
static COMMA_GROUPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:,\d{3})+(?:\.\d+)?").unwrap());
static DOT_GROUPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+(?:,\d+)?").unwrap());
static PLAIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?").unwrap());
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+").unwrap());

/// A number read out of box text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Number::Integer(value as i64)
        } else {
            Number::Decimal(value)
        }
    }

    /// Integer part; fractions are truncated.
    pub fn truncate(self) -> i64 {
        match self {
            Number::Integer(n) => n,
            Number::Decimal(d) => d.trunc() as i64,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Decimal(d) => write!(f, "{}", d),
        }
    }
}

/// Parse the first number in `text`, tolerating both "1,234,567" and "1.234.567".
pub fn parse_leading_number(text: &str) -> Option<Number> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];

    if let Some(m) = COMMA_GROUPED_RE.find(rest) {
        let cleaned = m.as_str().replace(',', "");
        return cleaned.parse::<f64>().ok().map(Number::from_f64);
    }
    if let Some(m) = DOT_GROUPED_RE.find(rest) {
        let cleaned = m.as_str().replace('.', "").replace(',', ".");
        return cleaned.parse::<f64>().ok().map(Number::from_f64);
    }
    if let Some(m) = PLAIN_RE.find(rest) {
        return m.as_str().parse::<f64>().ok().map(Number::from_f64);
    }
    DIGITS_RE
        .find(rest)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(Number::Integer)
}

/// "1234567.5" → "1,234,567.5". Non-numeric input is returned unchanged.
pub fn group_thousands(value: &str) -> String {
    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return value.to_string();
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
