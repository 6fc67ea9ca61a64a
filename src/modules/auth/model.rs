use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

/// An authenticated user identity.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub username: String,
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}
