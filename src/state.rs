use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::db::DbContext;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: DbContext,
    pub jwt_config: JwtConfig,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: DbContext::new(init_db_pool().await),
        jwt_config: JwtConfig::from_env(),
    }
}
