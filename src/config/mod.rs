use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub google: GoogleConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    /// Marks the auth cookie `Secure` and `SameSite=Strict`
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailProviderKind {
    Resend,
    Log,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub provider: EmailProviderKind,
    pub resend_api_key: Option<String>,
    pub from_email: String,
}

const DEFAULT_JWT_SECRET: &str = "change-this-secret-in-production";
const SEVEN_DAYS_SECS: u64 = 7 * 24 * 60 * 60;

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("PORT").ok().and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            if !v.is_empty() {
                self.security.jwt_secret = v;
            }
        }
        if let Ok(v) = env::var("JWT_EXPIRES_IN_SECONDS") {
            self.security.jwt_expires_in_seconds = v.parse().unwrap_or(self.security.jwt_expires_in_seconds);
        }

        // Google OAuth
        self.google.client_id = non_empty_var("GOOGLE_CLIENT_ID");
        self.google.client_secret = non_empty_var("GOOGLE_CLIENT_SECRET");
        if let Some(v) = non_empty_var("GOOGLE_REDIRECT_URI") {
            self.google.redirect_uri = v;
        }

        // Email
        if let Ok(v) = env::var("EMAIL_PROVIDER") {
            match v.to_ascii_lowercase().as_str() {
                "resend" => self.email.provider = EmailProviderKind::Resend,
                "log" => self.email.provider = EmailProviderKind::Log,
                other => tracing::warn!("Unknown EMAIL_PROVIDER '{}', keeping {:?}", other, self.email.provider),
            }
        }
        self.email.resend_api_key = non_empty_var("RESEND_API_KEY");
        if let Some(v) = non_empty_var("RESEND_FROM_EMAIL") {
            self.email.from_email = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                jwt_expires_in_seconds: SEVEN_DAYS_SECS,
                secure_cookies: false,
            },
            google: GoogleConfig::default(),
            email: EmailConfig {
                provider: EmailProviderKind::Log,
                resend_api_key: None,
                from_email: "noreply@peterparts.com".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.peterparts.com".to_string()],
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                jwt_expires_in_seconds: SEVEN_DAYS_SECS,
                secure_cookies: true,
            },
            google: GoogleConfig::default(),
            email: EmailConfig {
                provider: EmailProviderKind::Resend,
                resend_api_key: None,
                from_email: "noreply@peterparts.com".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://peterparts.com".to_string()],
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                jwt_expires_in_seconds: SEVEN_DAYS_SECS,
                secure_cookies: true,
            },
            google: GoogleConfig::default(),
            email: EmailConfig {
                provider: EmailProviderKind::Resend,
                resend_api_key: None,
                from_email: "noreply@peterparts.com".to_string(),
            },
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: "http://localhost:3000/auth/google/callback".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
