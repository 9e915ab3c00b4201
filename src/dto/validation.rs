//! Validation helpers for DTOs.

use validator::ValidationError;

/// Maximum length accepted for a player name.
pub const PLAYER_NAME_MAX: usize = 50;
/// Maximum length accepted for a clue text.
pub const CLUE_TEXT_MAX: usize = 200;

/// Validates that a player name is non-blank and at most 50 characters.
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("Player name must not be empty".into());
        return Err(err);
    }

    if name.chars().count() > PLAYER_NAME_MAX {
        let mut err = ValidationError::new("player_name_length");
        err.message =
            Some(format!("Player name must be at most {PLAYER_NAME_MAX} characters").into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a scanned QR payload is a non-blank string.
pub fn validate_scan_token(token: &str) -> Result<(), ValidationError> {
    if token.trim().is_empty() {
        let mut err = ValidationError::new("scan_token_blank");
        err.message = Some("Scanned code must not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a clue text is non-blank and fits the display limit.
pub fn validate_clue_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut err = ValidationError::new("clue_text_blank");
        err.message = Some("Clue text must not be empty".into());
        return Err(err);
    }

    if text.chars().count() > CLUE_TEXT_MAX {
        let mut err = ValidationError::new("clue_text_length");
        err.message = Some(format!("Clue text must be at most {CLUE_TEXT_MAX} characters").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("Ada").is_ok());
        assert!(validate_player_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_validate_player_name_invalid() {
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("   ").is_err()); // blank
        assert!(validate_player_name(&"x".repeat(51)).is_err()); // too long
    }

    #[test]
    fn test_validate_scan_token() {
        assert!(validate_scan_token("T1").is_ok());
        assert!(validate_scan_token("").is_err());
        assert!(validate_scan_token("  ").is_err());
    }

    #[test]
    fn test_validate_clue_text() {
        assert!(validate_clue_text("Look under the bridge").is_ok());
        assert!(validate_clue_text("").is_err());
        assert!(validate_clue_text(&"c".repeat(201)).is_err());
    }
}
