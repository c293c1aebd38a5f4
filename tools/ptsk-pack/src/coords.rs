//! Sexagesimal and decimal coordinate parsing
//!
//! Right ascension accepts `HH:MM:SS(.s)` (converted to degrees, 1h = 15°) or a plain
//! decimal-degree value. Declination accepts `[+-]DD:MM:SS(.s)` or `[+-]D.d`.

use crate::descriptor::NumericValue;

/// Why a coordinate could not be parsed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{reason}: {value:?}")]
pub struct CoordinateError {
    pub value: String,
    pub reason: &'static str,
}

impl CoordinateError {
    fn new(value: &str, reason: &'static str) -> Self {
        Self {
            value: value.to_string(),
            reason,
        }
    }
}

pub fn hms_to_deg(h: f64, m: f64, s: f64) -> f64 {
    (h + m / 60.0 + s / 3600.0) * 15.0
}

pub fn dms_to_deg(negative: bool, d: f64, m: f64, s: f64) -> f64 {
    let deg = d + m / 60.0 + s / 3600.0;
    if negative { -deg } else { deg }
}

/// Parse a right ascension into degrees
pub fn parse_ra(value: &NumericValue) -> Result<f64, CoordinateError> {
    match value {
        NumericValue::Number(deg) => finite(*deg, &deg.to_string()),
        NumericValue::Text(text) => parse_ra_str(text),
    }
}

/// Parse a declination into degrees
pub fn parse_dec(value: &NumericValue) -> Result<f64, CoordinateError> {
    match value {
        NumericValue::Number(deg) => finite(*deg, &deg.to_string()),
        NumericValue::Text(text) => parse_dec_str(text),
    }
}

pub fn parse_ra_str(text: &str) -> Result<f64, CoordinateError> {
    let trimmed = text.trim();
    if !trimmed.contains(':') {
        return finite(parse_number(trimmed, text)?, text);
    }
    let [h, m, s] = split_three(trimmed, text)
        .ok_or_else(|| CoordinateError::new(text, "expected HH:MM:SS"))?;
    finite(hms_to_deg(h, m, s), text)
}

pub fn parse_dec_str(text: &str) -> Result<f64, CoordinateError> {
    let trimmed = text.trim();
    let (negative, body) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };
    if body.is_empty() {
        return Err(CoordinateError::new(text, "empty declination"));
    }

    if body.split(':').count() != 3 {
        let deg = parse_number(body, text)?;
        return finite(if negative { -deg } else { deg }, text);
    }
    let [d, m, s] =
        split_three(body, text).ok_or_else(|| CoordinateError::new(text, "expected DD:MM:SS"))?;
    finite(dms_to_deg(negative, d, m, s), text)
}

fn split_three(body: &str, original: &str) -> Option<[f64; 3]> {
    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_number(part, original).ok()?;
    }
    Some(out)
}

fn parse_number(text: &str, original: &str) -> Result<f64, CoordinateError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| CoordinateError::new(original, "not a number"))
}

fn finite(value: f64, original: &str) -> Result<f64, CoordinateError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoordinateError::new(original, "not finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ra_sexagesimal() {
        // Betelgeuse: 05h 55m 10.3s
        let ra = parse_ra_str("05:55:10.3").unwrap();
        assert!(close(ra, (5.0 + 55.0 / 60.0 + 10.3 / 3600.0) * 15.0));
        assert!(close(parse_ra_str("00:00:00").unwrap(), 0.0));
        assert!(close(parse_ra_str("12:00:00").unwrap(), 180.0));
    }

    #[test]
    fn test_ra_decimal_degrees() {
        assert!(close(parse_ra_str("88.79").unwrap(), 88.79));
        assert!(close(parse_ra(&NumericValue::Number(12.5)).unwrap(), 12.5));
    }

    #[test]
    fn test_ra_rejects_malformed() {
        assert!(parse_ra_str("05:55").is_err());
        assert!(parse_ra_str("05:55:10:1").is_err());
        assert!(parse_ra_str("aa:bb:cc").is_err());
        assert!(parse_ra_str("").is_err());
        assert!(parse_ra_str("nan").is_err());
    }

    #[test]
    fn test_dec_sexagesimal_with_sign() {
        assert!(close(
            parse_dec_str("+07:24:25").unwrap(),
            7.0 + 24.0 / 60.0 + 25.0 / 3600.0
        ));
        assert!(close(
            parse_dec_str("-08:12:05.9").unwrap(),
            -(8.0 + 12.0 / 60.0 + 5.9 / 3600.0)
        ));
        // Sign applies to the whole value, including "-00:30:00"
        assert!(close(parse_dec_str("-00:30:00").unwrap(), -0.5));
    }

    #[test]
    fn test_dec_decimal_forms() {
        assert!(close(parse_dec_str("+7.4").unwrap(), 7.4));
        assert!(close(parse_dec_str("-16.7").unwrap(), -16.7));
        assert!(close(parse_dec_str("45").unwrap(), 45.0));
        assert!(close(parse_dec(&NumericValue::Number(-60.8)).unwrap(), -60.8));
    }

    #[test]
    fn test_dec_rejects_malformed() {
        assert!(parse_dec_str("").is_err());
        assert!(parse_dec_str("-").is_err());
        assert!(parse_dec_str("+1:2:x").is_err());
        assert!(parse_dec_str("north").is_err());
        assert!(parse_dec(&NumericValue::Number(f64::INFINITY)).is_err());
    }
}
