use crate::error::CommandError;

/// Result names are session variables: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_result_name(name: &str) -> Result<(), CommandError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if !valid {
        return Err(CommandError::InvalidName {
            kind: "result",
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_result_name_given_identifier_should_return_ok() {
        for name in ["r", "_r", "result_2", "Diet"] {
            assert!(validate_result_name(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_validate_result_name_given_non_identifier_should_return_error() {
        for name in ["", "2r", "r-1", "r.x", "ré"] {
            assert!(validate_result_name(name).is_err(), "{}", name);
        }
    }
}
