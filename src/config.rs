use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_api_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub catalog_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_api_url = env::var("STORE_API_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let catalog_ttl = env::var("CATALOG_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(300));
        Ok(Self {
            store_api_url,
            jwt_secret,
            host,
            port,
            catalog_ttl,
        })
    }
}
