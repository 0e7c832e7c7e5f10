//! Input validation for behavior group payloads.
//!
//! Runs before any statement reaches the database so a rejected payload never
//! leaves partial state behind.

/// Maximum length of a behavior group display name (matches the column width).
pub const MAX_DISPLAY_NAME_LENGTH: usize = 255;

/// Field name reported for display name violations.
pub const DISPLAY_NAME_FIELD: &str = "display_name";

/// Validation error with details about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validates a behavior group display name and returns it unchanged.
///
/// The stored value is the input as given; trimming only decides blankness.
pub fn validate_display_name(display_name: Option<&str>) -> Result<&str, Vec<ValidationError>> {
    let error = |message: &str| {
        vec![ValidationError {
            field: DISPLAY_NAME_FIELD.to_string(),
            message: message.to_string(),
        }]
    };

    match display_name {
        None => Err(error("must not be null")),
        Some(name) if name.trim().is_empty() => Err(error("must not be blank")),
        Some(name) if name.chars().count() > MAX_DISPLAY_NAME_LENGTH => Err(error(&format!(
            "cannot exceed {} characters",
            MAX_DISPLAY_NAME_LENGTH
        ))),
        Some(name) => Ok(name),
    }
}
