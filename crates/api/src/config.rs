//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `PROFILE_SERVICE_URL` — profile service base URL
/// - `SKILLS_SERVICE_URL` — skills service base URL
/// - `IDENTITY_SERVICE_URL` — identity service base URL
/// - `REGISTRY_URL` — external project registry base URL
/// - `DATABASE_URL` — PostgreSQL link store; in-memory store when unset
///
/// Base URLs are read here once and passed into the client constructors;
/// nothing downstream reads ambient process state.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub profile_service_url: String,
    pub skills_service_url: String,
    pub identity_service_url: String,
    pub registry_url: String,
    pub database_url: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            profile_service_url: env_or("PROFILE_SERVICE_URL", "http://localhost:5002"),
            skills_service_url: env_or("SKILLS_SERVICE_URL", "http://localhost:5003"),
            identity_service_url: env_or("IDENTITY_SERVICE_URL", "http://localhost:5001"),
            registry_url: env_or("REGISTRY_URL", "http://localhost:9000"),
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            profile_service_url: "http://localhost:5002".to_string(),
            skills_service_url: "http://localhost:5003".to_string(),
            identity_service_url: "http://localhost:5001".to_string(),
            registry_url: "http://localhost:9000".to_string(),
            database_url: None,
        }
    }
}
