use std::env;

/// Runtime environment the server runs in.
///
/// Selects log formatting and CORS strictness; read from `APP_ENV`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub frontend_url: String,
    pub content_api_url: String,
    pub content_api_key: String,
    pub env: Environment,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            content_api_url: env::var("CONTENT_API_URL")?,
            content_api_key: env::var("CONTENT_API_KEY")?,
            env: Environment::from_env(),
        })
    }
}
