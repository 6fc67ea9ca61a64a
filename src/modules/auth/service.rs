use tracing::{info, instrument};

use crate::config::jwt::JwtConfig;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_token;

use super::model::Identity;

pub struct AuthService;

impl AuthService {
    /// Authenticates a user and returns a signed token on success.
    #[instrument(skip(jwt_config, password))]
    pub fn login(
        jwt_config: &JwtConfig,
        username: &str,
        password: &str,
    ) -> Result<String, AppError> {
        match Self::authenticate(username, password) {
            Some(identity) => create_token(&identity, jwt_config),
            None => Err(AppError::unauthorized()),
        }
    }

    /// Checks a username/password pair, returning the identity on success.
    // TODO: replace the demo credential check with a user store lookup.
    fn authenticate(username: &str, password: &str) -> Option<Identity> {
        if username == "demo" && password == "pass" {
            info!(user = username, "authentication successful");
            return Some(Identity {
                id: "100".to_string(),
                name: "demo".to_string(),
            });
        }

        info!(user = username, "authentication failed");
        None
    }
}
