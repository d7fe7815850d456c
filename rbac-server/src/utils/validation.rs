//! Input validation helpers
//!
//! Required-field checks for request bodies. Every missing field is
//! reported, joined into one message.

use shared::error::AppError;

/// Entity names: user, role
pub const MAX_NAME_LEN: usize = 200;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Collects field errors for one request body
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None`, empty and whitespace-only values are "required" errors
    pub fn require<'a>(&mut self, value: Option<&'a str>, field: &str, max_len: usize) -> &'a str {
        match value {
            Some(v) if !v.trim().is_empty() => {
                if v.len() > max_len {
                    self.0
                        .push(format!("{field} is too long ({} chars, max {max_len})", v.len()));
                }
                v
            }
            _ => {
                self.0.push(format!("{field} is required"));
                ""
            }
        }
    }

    /// `Err(ValidationFailed)` with all messages joined by `", "`
    pub fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.0.join(", ")))
        }
    }
}
