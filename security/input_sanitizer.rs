//! Input Sanitization and Validation
//!
//! Normalizes the free-form input that reaches the core logic:
//! - Login emails (rate limiter keys)
//! - Justification text typed by the conferente

use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Longest accepted email (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Longest accepted justification text
pub const MAX_JUSTIFICATION_LENGTH: usize = 1000;

/// Sanitization errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SanitizationError {
    /// Input exceeds the allowed length
    #[error("Input too long: max {max}, got {actual}")]
    TooLong {
        /// Allowed length
        max: usize,
        /// Submitted length
        actual: usize,
    },

    /// Input does not have the expected shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Input contains a control character
    #[error("Forbidden character: {0:?}")]
    ForbiddenCharacter(char),
}

/// Result type for sanitization
pub type Result<T> = std::result::Result<T, SanitizationError>;

/// Input sanitizer
#[derive(Debug, Clone)]
pub struct InputSanitizer {
    /// Regex for email
    email_regex: Regex,

    /// Forbidden characters
    forbidden_chars: HashSet<char>,
}

impl InputSanitizer {
    /// Create new input sanitizer
    pub fn new() -> Self {
        let email_regex = Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$")
            .expect("email pattern is a valid regex");

        // C0 control characters except tab, line feed and carriage return
        let forbidden_chars = ('\0'..='\x1f')
            .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
            .chain(std::iter::once('\x7f'))
            .collect();

        Self {
            email_regex,
            forbidden_chars,
        }
    }

    /// Sanitize free text (reject control characters, NFC-normalize, trim)
    pub fn sanitize_string(&self, input: &str, max_length: usize) -> Result<String> {
        let count = input.chars().count();
        if count > max_length {
            return Err(SanitizationError::TooLong {
                max: max_length,
                actual: count,
            });
        }

        if let Some(ch) = input.chars().find(|c| self.forbidden_chars.contains(c)) {
            return Err(SanitizationError::ForbiddenCharacter(ch));
        }

        let normalized: String = input.nfc().collect();
        Ok(normalized.trim().to_string())
    }

    /// Sanitize a divergence justification
    ///
    /// Blank text comes back as an empty string; deciding whether that is
    /// acceptable belongs to the closure gate.
    pub fn sanitize_justification(&self, text: &str) -> Result<String> {
        self.sanitize_string(text, MAX_JUSTIFICATION_LENGTH)
    }

    /// Normalize an email for use as a rate-limit key (trimmed, lower-cased)
    pub fn normalize_email(&self, email: &str) -> Result<String> {
        let email = email.trim().to_lowercase();

        if email.len() > MAX_EMAIL_LENGTH {
            return Err(SanitizationError::TooLong {
                max: MAX_EMAIL_LENGTH,
                actual: email.len(),
            });
        }

        if !self.email_regex.is_match(&email) {
            return Err(SanitizationError::InvalidFormat(
                "Invalid email format".to_string(),
            ));
        }

        Ok(email)
    }
}

impl Default for InputSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
