//! Field-level input checks shared by the request types.

use crate::error::{Error, FieldError, Result};
use serde::{Deserialize, Deserializer, Serialize};

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";

pub fn max_length(limit: usize) -> String {
    format!("Ensure this field has no more than {limit} characters.")
}

/// An integer as clients send it: a JSON number or a numeric string.
/// Serializes back to the value it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerInput {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl IntegerInput {
    /// Coerce to an `i32`. Floats and strings count only when they hold a whole number,
    /// so `30`, `30.0`, `"30"` and `" 30.00 "` are all 30.
    pub fn to_i32(&self) -> Option<i32> {
        let value = match self {
            IntegerInput::Integer(n) => *n,
            IntegerInput::Float(f) if f.is_finite() && f.fract() == 0.0 => *f as i64,
            IntegerInput::Float(_) | IntegerInput::Other(_) => return None,
            IntegerInput::Text(text) => {
                let text = text.trim();
                let digits = match text.split_once('.') {
                    Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
                    Some(_) => return None,
                    None => text,
                };
                digits.parse::<i64>().ok()?
            }
        };
        i32::try_from(value).ok()
    }
}

impl From<i32> for IntegerInput {
    fn from(value: i32) -> Self {
        IntegerInput::Integer(value.into())
    }
}

/// Tell an explicit `null` (`Some(None)`) apart from a missing field (`None`).
pub fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Collects every field error of a request before anything is written.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn error(&mut self, field: &str, reason: impl Into<String>) {
        self.errors.push(FieldError::new(field, reason));
    }

    /// Trim a text field and check blank and length rules.
    pub fn text(
        &mut self,
        field: &str,
        value: &str,
        max_len: Option<usize>,
        allow_blank: bool,
    ) -> Option<String> {
        let trimmed = value.trim();

        if trimmed.is_empty() && !allow_blank {
            self.error(field, BLANK);
            return None;
        }

        if let Some(limit) = max_len {
            if trimmed.chars().count() > limit {
                self.error(field, max_length(limit));
                return None;
            }
        }

        Some(trimmed.to_string())
    }

    /// A text field that must be present.
    pub fn required_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        max_len: Option<usize>,
    ) -> Option<String> {
        match value {
            Some(value) => self.text(field, value, max_len, false),
            None => {
                self.error(field, REQUIRED);
                None
            }
        }
    }

    pub fn integer(&mut self, field: &str, value: &IntegerInput) -> Option<i32> {
        let coerced = value.to_i32();
        if coerced.is_none() {
            self.error(field, INVALID_INTEGER);
        }
        coerced
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(errors = ?self.errors, "rejected invalid input");
            Err(Error::Validation(self.errors))
        }
    }
}
