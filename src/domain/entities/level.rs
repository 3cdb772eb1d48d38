use serde::{Deserialize, Serialize};
use validator::Validate;

/// Outcome of a level lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LevelStatus {
    /// No check has run for the current id.
    Unknown,
    Invalid,
    Valid { name: String },
}

impl LevelStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, LevelStatus::Valid { .. })
    }
}

/// Form body carrying a level id, shared by the check endpoint and the
/// submission endpoint's scalar fields.
#[derive(Debug, Deserialize, Validate)]
pub struct LevelIdField {
    #[serde(rename = "level-id")]
    #[validate(length(max = 32, message = "Level ID is too long"))]
    pub level_id: String,
}

/// Parse the lookup service's reply.
///
/// The body is either the sentinel `-1` (level does not exist) or a flat
/// colon-delimited `key:value` token stream in which the value following the
/// first literal token `2` is the level's display name.
pub fn parse_lookup_response(body: &str) -> LevelStatus {
    if body.trim() == "-1" {
        return LevelStatus::Invalid;
    }

    let tokens: Vec<&str> = body.split(':').collect();
    let name = tokens
        .iter()
        .position(|token| *token == "2")
        .and_then(|i| tokens.get(i + 1))
        .map(|name| name.to_string())
        .unwrap_or_default();

    LevelStatus::Valid { name }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_means_invalid() {
        assert_eq!(parse_lookup_response("-1"), LevelStatus::Invalid);
        assert_eq!(parse_lookup_response("  -1\n"), LevelStatus::Invalid);
    }

    #[test]
    fn name_follows_the_2_token() {
        assert_eq!(
            parse_lookup_response("1:128:2:My Level:3:9"),
            LevelStatus::Valid { name: "My Level".to_string() }
        );
    }

    #[test]
    fn missing_name_token_is_still_valid() {
        assert_eq!(
            parse_lookup_response("1:128:3:9"),
            LevelStatus::Valid { name: String::new() }
        );
    }

    #[test]
    fn trailing_2_token_without_value_yields_empty_name() {
        assert_eq!(
            parse_lookup_response("1:128:2"),
            LevelStatus::Valid { name: String::new() }
        );
    }
}
