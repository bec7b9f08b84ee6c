//! WebVTT output validation

use regex::Regex;

use crate::subtitle::WEBVTT_HEADER;

/// Outcome of a validation pass
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, msg: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(msg.into());
    }
}

/// Check the structural guarantees of a generated document
pub fn validate_webvtt(document: &str) -> ValidationResult {
    let mut result = ValidationResult::success();

    if !document.starts_with(WEBVTT_HEADER) {
        result.push("Missing WEBVTT FILE header");
    }
    if !document.ends_with("\r\n\r\n") {
        result.push("Document does not end with a blank line");
    }

    let comma_timestamp = Regex::new(r"[0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3}").unwrap();
    if let Some(m) = comma_timestamp.find(document) {
        result.push(format!("Comma-separated timestamp left: {}", m.as_str()));
    }

    let bracket_tag = Regex::new(r"\{\\?/?[ibu]1?\}").unwrap();
    if let Some(m) = bracket_tag.find(document) {
        result.push(format!("Bracket tag left: {}", m.as_str()));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document() {
        let result = validate_webvtt("WEBVTT FILE\r\n\r\n00:00:01.000 <i>x</i>\r\n\r\n");
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_invalid_document() {
        let result = validate_webvtt("00:00:01,000 {i}x{/i}");
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 4);
    }
}
