//! Conversion of `validator` failures into [`CoreError`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run derive-based validation, mapping failures to [`CoreError::Validation`]
/// carrying the raw validator message.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(validation_error)
}

/// Convert a set of validation errors into a single [`CoreError::Validation`].
///
/// Each failing field becomes `field: message`; fields are sorted and joined
/// with `"; "`.
pub fn validation_error(errors: ValidationErrors) -> CoreError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs.iter().map(|e| e.to_string()).collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    fields.sort();
    CoreError::Validation(fields.join("; "))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3))]
        username: String,
    }

    #[derive(Validate)]
    struct Credentials {
        #[validate(length(min = 3, message = "too short"))]
        username: String,
        #[validate(length(min = 5, message = "too weak"))]
        password: String,
    }

    #[test]
    fn short_field_maps_to_validation_error() {
        let sample = Sample {
            username: "ab".into(),
        };
        assert_matches!(
            validate_input(&sample),
            Err(CoreError::Validation(msg)) if msg.contains("username")
        );
    }

    #[test]
    fn multiple_fields_are_separated() {
        let creds = Credentials {
            username: "ab".into(),
            password: "1234".into(),
        };
        assert_matches!(
            validate_input(&creds),
            Err(CoreError::Validation(msg)) if msg == "password: too weak; username: too short"
        );
    }

    #[test]
    fn valid_input_passes() {
        let sample = Sample {
            username: "abc".into(),
        };
        assert!(validate_input(&sample).is_ok());
    }
}
