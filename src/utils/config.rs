/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
use crate::error::{FrappeError, FrappeResult};
use std::env;

/// Reads an environment variable, treating unset and blank values alike
///
/// # Arguments
/// * `env_var` - Name of the environment variable
///
/// # Returns
/// The trimmed value if present and non-empty, `None` otherwise
pub fn get_env_or_none(env_var: &str) -> Option<String> {
    env::var(env_var)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

/// Reads an environment variable that must be present
///
/// # Arguments
/// * `env_var` - Name of the environment variable
///
/// # Returns
/// * `Ok(String)` - The trimmed value
/// * `Err(FrappeError::MissingConfig)` - If the variable is unset or blank
pub fn get_env_required(env_var: &str) -> FrappeResult<String> {
    get_env_or_none(env_var).ok_or_else(|| {
        FrappeError::MissingConfig(format!("{env_var} not found in environment variables or .env file"))
    })
}

/// Reads two environment variables that only make sense together
///
/// Returns `None` unless both are set.
pub fn get_env_pair(first: &str, second: &str) -> Option<(String, String)> {
    Some((get_env_or_none(first)?, get_env_or_none(second)?))
}
