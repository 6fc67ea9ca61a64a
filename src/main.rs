use waxstack::config::server::ServerConfig;
use waxstack::logging::init_tracing;
use waxstack::router::init_router;
use waxstack::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let config = ServerConfig::from_env();
    let address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("failed to bind server address");

    tracing::info!(
        "server {} is running at {}",
        env!("CARGO_PKG_VERSION"),
        address
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
}
