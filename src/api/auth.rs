//! API token handling.
//!
//! Clubhouse authenticates with a per-user API token passed as the `token`
//! query parameter. The command-line tool reads the token from the
//! environment or from the OS keyring.

use tracing::debug;

use super::error::{ApiError, Result};

/// The keyring service name for Clubhouse tokens.
const KEYRING_SERVICE: &str = "clubhouse";

/// The keyring account the token is stored under.
const KEYRING_ACCOUNT: &str = "api-token";

/// Environment variable consulted before the keyring.
pub const TOKEN_ENV_VAR: &str = "CLUBHOUSE_API_TOKEN";

/// Find an API token: the environment first, then the OS keyring.
pub fn resolve_token() -> Option<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
        if !token.trim().is_empty() {
            debug!("Using API token from {}", TOKEN_ENV_VAR);
            return Some(token);
        }
    }

    match get_token() {
        Ok(token) => {
            debug!("Using API token from keyring");
            Some(token)
        }
        Err(e) => {
            debug!("No API token in keyring: {}", e);
            None
        }
    }
}

/// Render a token for display, keeping only its last four characters.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// Store an API token in the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be stored in the keyring.
pub fn store_token(token: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
        .map_err(|e| ApiError::Keyring(format!("failed to create keyring entry: {}", e)))?;

    entry
        .set_password(token)
        .map_err(|e| ApiError::Keyring(format!("failed to store token: {}", e)))?;

    Ok(())
}

/// Retrieve the API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be retrieved from the keyring.
pub fn get_token() -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

/// Delete the API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be deleted from the keyring.
pub fn delete_token() -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .delete_password()
        .map_err(|e| ApiError::Keyring(format!("failed to delete token: {}", e)))?;

    Ok(())
}
