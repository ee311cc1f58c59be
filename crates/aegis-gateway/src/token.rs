use crate::GatewayError;

/// Name of the environment variable the bearer token is read from. This is
/// the single place the secret store would be replaced if the core ever
/// moved off environment-variable configuration.
pub const TOKEN_ENV_VAR: &str = "AEGIS_UPSTREAM_TOKEN";

/// Reads the process-wide bearer token. Token compromise handling is out
/// of scope for this core; centralizing the accessor here means there is
/// exactly one call site to change if that changes.
pub fn bearer_token() -> Result<String, GatewayError> {
    std::env::var(TOKEN_ENV_VAR).map_err(|_| GatewayError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_var_is_a_typed_error() {
        std::env::remove_var(TOKEN_ENV_VAR);
        assert!(matches!(bearer_token(), Err(GatewayError::MissingToken)));
    }
}
