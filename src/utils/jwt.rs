use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{Claims, Identity};
use crate::utils::errors::AppError;

/// Creates a signed access token encoding the authenticated identity.
pub fn create_token(identity: &Identity, config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: identity.id.clone(),
        name: identity.name.clone(),
        iat: now,
        exp: now + config.expiration_hours * 3600,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.signing_key.as_bytes()),
    )
    .map_err(AppError::internal)
}

/// Verifies a token signature and expiry, returning its claims.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.signing_key.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            signing_key: "test-signing-key".to_string(),
            expiration_hours: 72,
        }
    }

    fn identity() -> Identity {
        Identity {
            id: "100".to_string(),
            name: "demo".to_string(),
        }
    }

    #[test]
    fn round_trip_preserves_identity() {
        let token = create_token(&identity(), &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, "100");
        assert_eq!(claims.name, "demo");
        assert_eq!(claims.exp - claims.iat, 72 * 3600);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = create_token(&identity(), &config()).unwrap();
        let other = JwtConfig {
            signing_key: "different-key".to_string(),
            expiration_hours: 72,
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token("not-a-token", &config()).is_err());
    }
}
