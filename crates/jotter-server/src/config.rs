use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

/// Process configuration, read once at startup.
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("JOTTER_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("JOTTER_JWT_SECRET is unset or still a placeholder; set it in .env");
        }

        let db_path = lookup("JOTTER_DB_PATH")
            .unwrap_or_else(|| "jotter.db".into())
            .into();
        let host = lookup("JOTTER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("JOTTER_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("JOTTER_PORT is not a valid port: {raw}"))?,
            None => 8080,
        };

        Ok(Self {
            jwt_secret,
            db_path,
            host,
            port,
        })
    }

    /// Host and port for `TcpListener::bind`; the host may be an IP address
    /// or a name such as `localhost`.
    pub fn bind_target(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}
