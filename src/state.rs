use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::database::ProductRepository;
use crate::services::{EmailService, GoogleOAuthClient};

/// Shared handler state, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub jwt: Arc<JwtService>,
    pub google: Arc<GoogleOAuthClient>,
    pub email: EmailService,
    pub config: Arc<AppConfig>,
    /// Present when running against Postgres; used by the health check
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        products: Arc<dyn ProductRepository>,
        email: EmailService,
        http: reqwest::Client,
    ) -> Self {
        Self {
            products,
            jwt: Arc::new(JwtService::from_config(&config.security)),
            google: Arc::new(GoogleOAuthClient::new(http, config.google.clone())),
            email,
            config: Arc::new(config),
            pool: None,
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }
}
