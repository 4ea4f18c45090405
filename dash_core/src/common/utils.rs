/// Convert a numeric cell to a value, treating blanks and NaN markers as missing
pub fn parse_cell(s: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") || s == ".." {
        return Ok(None);
    }
    s.parse::<f64>().map(normalize)
}

/// NaN and infinities are stored as missing
pub fn normalize(v: f64) -> Option<f64> {
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

/// Decode bytes as UTF-8, falling back to latin-1 for legacy exports
pub fn decode_latin1_fallback(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Format an optional value for table output
pub fn fmt_opt(v: Option<f64>, precision: usize) -> String {
    match v {
        Some(x) => format!("{:.*}", precision, x),
        None => "NaN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("1.25").unwrap(), Some(1.25));
        assert_eq!(parse_cell(" ").unwrap(), None);
        assert_eq!(parse_cell("NaN").unwrap(), None);
        assert_eq!(parse_cell("null").unwrap(), None);
        assert!(parse_cell("abc").is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(f64::NAN), None);
        assert_eq!(normalize(f64::INFINITY), None);
        assert_eq!(normalize(f64::NEG_INFINITY), None);
        assert_eq!(normalize(2.0), Some(2.0));
    }

    #[test]
    fn test_decode_latin1_fallback() {
        assert_eq!(decode_latin1_fallback(b"abc"), "abc");
        // 0xE7 is 'ç' in latin-1 and invalid on its own in UTF-8
        assert_eq!(decode_latin1_fallback(b"Cura\xE7ao"), "Curaçao");
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(1.23456), 2), "1.23");
        assert_eq!(fmt_opt(None, 2), "NaN");
    }
}
