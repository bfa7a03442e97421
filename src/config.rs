use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_filter: String,
    pub database: Option<DatabaseConfig>,
    pub seed_file: Option<PathBuf>,
    /// Clear progress and lessons before seeding.
    pub seed_reset: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let host = env_parse("HOST").unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        let port = env_parse("PORT").unwrap_or(8081);
        let log_filter = std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "lingua_server=info,axum=info,tower_http=info".into());

        let database = env_non_empty("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS").unwrap_or(5),
            acquire_timeout_secs: env_parse("DATABASE_ACQUIRE_TIMEOUT_SECS").unwrap_or(5),
        });

        Self {
            host,
            port,
            log_filter,
            database,
            seed_file: env_non_empty("SEED_FILE").map(PathBuf::from),
            seed_reset: env_flag("SEED_RESET"),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
