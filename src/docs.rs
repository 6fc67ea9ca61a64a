use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::albums::model::{Album, CreateAlbumRequest, UpdateAlbumRequest};
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::utils::errors::{ErrorResponse, FieldError};
use crate::utils::pagination::Pages;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::healthcheck,
        crate::modules::auth::controller::login,
        crate::modules::albums::controller::get_album,
        crate::modules::albums::controller::list_albums,
        crate::modules::albums::controller::create_album,
        crate::modules::albums::controller::update_album,
        crate::modules::albums::controller::delete_album,
    ),
    components(
        schemas(
            Album,
            CreateAlbumRequest,
            UpdateAlbumRequest,
            Pages<Album>,
            LoginRequest,
            LoginResponse,
            ErrorResponse,
            FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Albums", description = "Album catalog endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Health", description = "Service health")
    ),
    info(
        title = "Waxstack API",
        version = "0.1.0",
        description = "A REST API for an album catalog, built with Rust, Axum, and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
