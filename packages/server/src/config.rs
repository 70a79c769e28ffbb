use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of access tokens, in seconds.
    pub access_token_ttl_secs: i64,
    /// Lifetime of refresh tokens, in seconds.
    pub refresh_token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl_secs: 300,
            refresh_token_ttl_secs: 86_400,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Groups created on startup if missing. Never assigned automatically.
    pub groups: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                "Admins".to_string(),
                "Coordinadores".to_string(),
                "DocentesStaff".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.access_token_ttl_secs", 300)?
            .set_default("auth.refresh_token_ttl_secs", 86_400)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., FACULTY__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("FACULTY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
