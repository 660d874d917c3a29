use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::domain::services::locale_service::is_locale;

/// Configuración de la base de datos PostgreSQL
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// URL de conexión; sin ella se usa el almacén en memoria
    pub connection_string: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 300,    // 5 minutos
            max_lifetime_secs: 1800,   // 30 minutos
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

/// Configuración del servidor HTTP
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8086,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid server address {}:{}", self.host, self.port))
    }
}

/// Configuración global de la aplicación
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Locale every translation must have a text in
    pub application_locale: String,
    /// Primer valor de la secuencia de identificadores
    pub identifier_start: i32,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_locale: "en".to_string(),
            identifier_start: 1,
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let application_locale = lookup("APPLICATION_LOCALE").unwrap_or(defaults.application_locale);
        if !is_locale(&application_locale) {
            return Err(anyhow!("APPLICATION_LOCALE is not a valid locale: {:?}", application_locale));
        }

        let config = Self {
            application_locale,
            identifier_start: parse_or(&lookup, "TRANSLATION_IDENTIFIER_START", defaults.identifier_start)?,
            database: DatabaseConfig {
                connection_string: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.database.max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", defaults.database.min_connections)?,
                connect_timeout_secs: parse_or(
                    &lookup,
                    "DATABASE_CONNECT_TIMEOUT_SECS",
                    defaults.database.connect_timeout_secs,
                )?,
                idle_timeout_secs: parse_or(&lookup, "DATABASE_IDLE_TIMEOUT_SECS", defaults.database.idle_timeout_secs)?,
                max_lifetime_secs: parse_or(&lookup, "DATABASE_MAX_LIFETIME_SECS", defaults.database.max_lifetime_secs)?,
            },
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or(&lookup, "SERVER_PORT", defaults.server.port)?,
            },
        };

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, value)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.application_locale, "en");
        assert_eq!(config.identifier_start, 1);
        assert!(config.database.connection_string.is_none());
        assert_eq!(config.server.port, 8086);
    }

    #[test]
    fn test_reads_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APPLICATION_LOCALE", "plPL"),
            ("DATABASE_URL", "postgres://localhost/translations"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("SERVER_PORT", "9000"),
            ("TRANSLATION_IDENTIFIER_START", "1000001"),
        ]))
        .unwrap();

        assert_eq!(config.application_locale, "plPL");
        assert_eq!(config.identifier_start, 1_000_001);
        assert_eq!(config.database.connection_string.as_deref(), Some("postgres://localhost/translations"));
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.server.socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_rejects_invalid_locale() {
        assert!(AppConfig::from_lookup(lookup_from(&[("APPLICATION_LOCALE", "english")])).is_err());
    }

    #[test]
    fn test_rejects_unparsable_number() {
        assert!(AppConfig::from_lookup(lookup_from(&[("SERVER_PORT", "eighty")])).is_err());
    }
}
