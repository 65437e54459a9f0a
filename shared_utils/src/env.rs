use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Reads an optional setting from the environment.
///
/// Unset, non-unicode and blank values all read as `None`, so an exported but
/// empty variable falls through to the next configuration layer.
pub fn optional_env_var(name: &str) -> Option<String> {
    get_env_var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VAR: &str = "SHARED_UTILS_ENV_TEST_VAR";

    #[test]
    #[serial]
    fn missing_var_is_reported_by_name() {
        unsafe { std::env::remove_var(VAR) };
        let err = get_env_var(VAR).unwrap_err();
        assert_eq!(err.to_string(), format!("Missing environment variable: {VAR}"));
        assert_eq!(optional_env_var(VAR), None);
    }

    #[test]
    #[serial]
    fn optional_var_is_trimmed_and_blank_is_none() {
        unsafe { std::env::set_var(VAR, "  WIN$N ") };
        assert_eq!(optional_env_var(VAR).as_deref(), Some("WIN$N"));

        unsafe { std::env::set_var(VAR, "   ") };
        assert_eq!(optional_env_var(VAR), None);

        unsafe { std::env::remove_var(VAR) };
    }
}
