// ABOUTME: Shared utility functions for Larder
// ABOUTME: Query-string parsing for boolean flags and id lists

use crate::validation::ValidationError;

/// Parse a boolean query flag such as `assigned_only`
///
/// Integers are truthy when non-zero; the usual words are accepted too.
/// An empty value counts as false.
pub fn parse_flag(field: &'static str, value: &str) -> Result<bool, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(false);
    }
    if let Ok(number) = value.parse::<i64>() {
        return Ok(number != 0);
    }

    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err(ValidationError::invalid(
            field,
            format!("'{}' is not a boolean flag", value),
        )),
    }
}

/// Parse a comma-separated list of ids such as `1,2,3`
pub fn parse_id_list(field: &'static str, value: &str) -> Result<Vec<i64>, ValidationError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| ValidationError::invalid(field, format!("'{}' is not an id", part)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", true)]
    #[case("2", true)]
    #[case("0", false)]
    #[case("", false)]
    #[case("true", true)]
    #[case("False", false)]
    #[case("yes", true)]
    #[case("off", false)]
    fn test_parse_flag(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse_flag("assigned_only", input).unwrap(), expected);
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert!(parse_flag("assigned_only", "maybe").is_err());
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("tags", "1,2, 3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_id_list("tags", "").unwrap(), Vec::<i64>::new());
        assert!(parse_id_list("tags", "1,abc").is_err());
    }
}
