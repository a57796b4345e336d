use crate::error::{AppError, Result};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

const DEFAULT_API_BASE: &str = "https://api.z.ai/api/paas/v4";
const DEFAULT_MODEL: &str = "glm-4.7";

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub zai_api_key: String,
    pub zai_api_base: String,
    pub summary_model: String,
    pub cron_secret: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let zai_api_key = env::var("ZAI_API_KEY")?;
        let cron_secret = env::var("CRON_SECRET")?;
        let zai_api_base =
            env::var("ZAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let summary_model =
            env::var("SUMMARY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        // Server address with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            zai_api_key,
            zai_api_base,
            summary_model,
            cron_secret,
        })
    }
}
