//! Application settings.
//!
//! Values are read from an optional `settings.toml` next to the binary and
//! can be overridden with `ITINERA__`-prefixed environment variables, e.g.
//! `ITINERA__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
    Url(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
            Database::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .set_default("server.database", "memory")?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("ITINERA").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_urls() {
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
        assert_eq!(
            Database::Sqlite("./itinera.db".to_string()).url(),
            "sqlite:./itinera.db?mode=rwc"
        );
        assert_eq!(
            Database::Url("sqlite:/tmp/x.db".to_string()).url(),
            "sqlite:/tmp/x.db"
        );
    }

    #[test]
    fn unit_variant_parses_from_plain_string() {
        let settings: Server = Config::builder()
            .set_override("port", 8080)
            .and_then(|b| b.set_override("database", "memory"))
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .unwrap();
        assert!(matches!(settings.database, Database::Memory));
        assert_eq!(settings.port, 8080);
    }
}
