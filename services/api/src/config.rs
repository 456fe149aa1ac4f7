use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub menu_api_base_url: String,
    pub school_calendar_path: PathBuf,
    /// Hour of the day after which an unspecified date defaults to tomorrow.
    pub cutoff_hour: u32,
    pub skill_application_id: Option<String>,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let menu_api_base_url = std::env::var("MENU_API_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("MENU_API_BASE_URL".to_string()))?;

        let school_calendar_path = std::env::var("SCHOOL_CALENDAR_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./calendar.json"));

        let cutoff_hour_str = std::env::var("CUTOFF_HOUR").unwrap_or_else(|_| "16".to_string());
        let cutoff_hour = cutoff_hour_str
            .parse::<u32>()
            .ok()
            .filter(|hour| *hour <= 23)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "CUTOFF_HOUR".to_string(),
                    format!("'{}' is not an hour between 0 and 23", cutoff_hour_str),
                )
            })?;

        let skill_application_id = std::env::var("SKILL_APPLICATION_ID").ok();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            menu_api_base_url,
            school_calendar_path,
            cutoff_hour,
            skill_application_id,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("MENU_API_BASE_URL");
            env::remove_var("SCHOOL_CALENDAR_PATH");
            env::remove_var("CUTOFF_HOUR");
            env::remove_var("SKILL_APPLICATION_ID");
            env::remove_var("RUST_LOG");
        }
    }

    fn set_minimal_env() {
        unsafe {
            env::set_var("MENU_API_BASE_URL", "http://menus.example.com/menus");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal() {
        clear_env_vars();
        set_minimal_env();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.menu_api_base_url, "http://menus.example.com/menus");
        assert_eq!(config.school_calendar_path, PathBuf::from("./calendar.json"));
        assert_eq!(config.cutoff_hour, 16);
        assert_eq!(config.skill_application_id, None);
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("MENU_API_BASE_URL", "http://localhost:9000/menus");
            env::set_var("SCHOOL_CALENDAR_PATH", "/etc/menuteller/calendar.json");
            env::set_var("CUTOFF_HOUR", "21");
            env::set_var("SKILL_APPLICATION_ID", "amzn1.ask.skill.test");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.menu_api_base_url, "http://localhost:9000/menus");
        assert_eq!(
            config.school_calendar_path,
            PathBuf::from("/etc/menuteller/calendar.json")
        );
        assert_eq!(config.cutoff_hour, 21);
        assert_eq!(
            config.skill_application_id,
            Some("amzn1.ask.skill.test".to_string())
        );
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_config_missing_base_url() {
        clear_env_vars();

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert_eq!(var, "MENU_API_BASE_URL"),
            _ => panic!("Expected MissingVar for MENU_API_BASE_URL"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_cutoff_hour() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("CUTOFF_HOUR", "25");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "CUTOFF_HOUR"),
            _ => panic!("Expected InvalidValue for CUTOFF_HOUR"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }
}
