//! # Validation Module
//!
//! Input validation for registration and ride requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (menus, prompts)                                      │
//! │  ├── Parses raw strings into ids, locations, fares                     │
//! │  └── Re-prompts on bad input                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields are non-empty                                     │
//! │  └── Phone numbers are 10 or 11 ASCII digits                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: DispatchEngine                                               │
//! │  ├── Duplicate identifiers                                             │
//! │  └── Fare positivity, availability, trip status                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ride_core::validation::{validate_phone, validate_required};
//!
//! validate_phone("5551234567").unwrap();
//! validate_required("start", "Home").unwrap();
//! ```

use crate::error::ValidationError;
use crate::PHONE_DIGIT_COUNTS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a required field is non-empty.
///
/// Only the empty string fails. Whitespace is content; trimming is the
/// caller's business.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Exactly 10 or 11 characters
/// - Every character is an ASCII digit (no sign, spaces or separators)
///
/// ## Example
/// ```rust
/// use ride_core::validation::validate_phone;
///
/// assert!(validate_phone("5551234567").is_ok());   // 10 digits
/// assert!(validate_phone("15551234567").is_ok());  // 11 digits
/// assert!(validate_phone("555123456").is_err());   // 9 digits
/// assert!(validate_phone("555-123-4567").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if !PHONE_DIGIT_COUNTS.contains(&phone.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be 10 or 11 digits long".to_string(),
        });
    }

    if !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
