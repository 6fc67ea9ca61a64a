#[utoipa::path(
    get,
    path = "/healthcheck",
    responses((status = 200, description = "Service is up")),
    tag = "Health"
)]
pub async fn healthcheck() -> String {
    format!("OK {}", env!("CARGO_PKG_VERSION"))
}
