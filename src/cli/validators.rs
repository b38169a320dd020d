//! CLI argument validators.

use crate::constants::inference::STRIDE;

/// Parse and validate a threshold value (0.0-1.0).
pub fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!("threshold must be between 0.0 and 1.0, got {value}"));
    }

    Ok(value)
}

/// Parse and validate the network input size (positive multiple of the stride).
pub fn parse_imgsz(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid image size"))?;

    if value == 0 || value % STRIDE != 0 {
        return Err(format!(
            "image size must be a positive multiple of {STRIDE}, got {value}"
        ));
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold_valid() {
        assert_eq!(parse_threshold("0.269").ok(), Some(0.269));
        assert_eq!(parse_threshold("0.0").ok(), Some(0.0));
        assert_eq!(parse_threshold("1.0").ok(), Some(1.0));
    }

    #[test]
    fn test_parse_threshold_invalid() {
        assert!(parse_threshold("1.1").is_err());
        assert!(parse_threshold("-0.1").is_err());
        assert!(parse_threshold("abc").is_err());
    }

    #[test]
    fn test_parse_imgsz() {
        assert_eq!(parse_imgsz("864").ok(), Some(864));
        assert_eq!(parse_imgsz("640").ok(), Some(640));
        assert!(parse_imgsz("0").is_err());
        assert!(parse_imgsz("850").is_err());
        assert!(parse_imgsz("big").is_err());
    }
}
