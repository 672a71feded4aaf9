use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub debug: bool,
    pub admin_token: String,
    pub enable_swagger: bool,
    pub port: u16,
    pub session_ttl_days: i64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix
            .add_source(Environment::with_prefix("APP"))
            .set_default("database_url", "sqlite://yogi.db?mode=rwc")?
            .set_default("debug", false)?
            .set_default("admin_token", "default-token-change-me")?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("session_ttl_days", 7)?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_defaults() {
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.session_ttl_days, 7);
        assert!(!settings.debug);
        assert!(settings.enable_swagger);
        assert!(settings.database_url.starts_with("sqlite:"));
    }

    #[test]
    #[serial]
    fn test_env_override() {
        unsafe {
            std::env::set_var("APP_PORT", "9090");
            std::env::set_var("APP_ADMIN_TOKEN", "sekrit");
        }
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.admin_token, "sekrit");
        unsafe {
            std::env::remove_var("APP_PORT");
            std::env::remove_var("APP_ADMIN_TOKEN");
        }
    }
}
