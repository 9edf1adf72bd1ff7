//! Client-side form checks run before a draft is submitted.

use rust_decimal::Decimal;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the field (camelCase), or `form` for cross-field checks
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

/// Every problem found in a draft, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summary(.fields))]
pub struct FormErrors {
    /// Rejected fields
    pub fields: Vec<FieldError>,
}

fn summary(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl FormErrors {
    /// A single form-level problem.
    #[must_use]
    pub fn single(field: &str, message: &str) -> Self {
        Self {
            fields: vec![FieldError {
                field: field.to_string(),
                message: message.to_string(),
            }],
        }
    }

    /// Record a problem with `field`.
    pub fn add(&mut self, field: &str, message: &str) {
        self.fields.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// The message recorded for `field`, if any.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message.as_str())
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: camel_case(field),
                    message: e
                        .message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), ToString::to_string),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self { fields }
    }
}

/// Run the derived checks of a draft.
///
/// # Errors
///
/// Returns [`FormErrors`] listing every rejected field.
pub fn check<T: Validate>(draft: &T) -> Result<(), FormErrors> {
    draft.validate().map_err(FormErrors::from)
}

/// Run the derived checks of a draft, then the `extra` ones the derive
/// cannot express (presence of optional fields, cross-field rules).
///
/// # Errors
///
/// Returns [`FormErrors`] listing every rejected field.
pub(crate) fn check_with<T: Validate>(
    draft: &T,
    extra: impl FnOnce(&mut FormErrors),
) -> Result<(), FormErrors> {
    let mut errors = check(draft).err().unwrap_or(FormErrors { fields: Vec::new() });
    extra(&mut errors);
    if errors.fields.is_empty() {
        return Ok(());
    }
    errors.fields.sort_by(|a, b| a.field.cmp(&b.field));
    Err(errors)
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("Must not be negative".into());
        return Err(error);
    }
    Ok(())
}
