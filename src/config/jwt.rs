use std::env;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub signing_key: String,
    /// Access token lifetime in hours.
    pub expiration_hours: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            signing_key: env::var("JWT_SIGNING_KEY")
                .unwrap_or_else(|_| "change-this-signing-key-in-production".to_string()),
            expiration_hours: env::var("JWT_EXPIRATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(72),
        }
    }
}
