use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub openai_api_url: String,
    /// Absent key disables the advice endpoint (503) rather than startup.
    pub openai_api_key: Option<String>,
    pub advice_model: String,
    pub start_balance: f64,
    pub target_balance: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let openai_api_url = env_map
            .get("OPENAI_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        let openai_api_key = env_map
            .get("OPENAI_API_KEY")
            .filter(|s| !s.is_empty())
            .cloned();

        let advice_model = env_map
            .get("ADVICE_MODEL")
            .cloned()
            .unwrap_or_else(|| "gpt-4o".to_string());

        let start_balance = parse_f64(&env_map, "START_BALANCE", 0.0)?;
        let target_balance = parse_f64(&env_map, "TARGET_BALANCE", 0.0)?;

        Ok(Config {
            port,
            database_path,
            openai_api_url,
            openai_api_key,
            advice_model,
            start_balance,
            target_balance,
        })
    }
}

fn parse_f64(
    env_map: &HashMap<String, String>,
    name: &str,
    default: f64,
) -> Result<f64, ConfigError> {
    match env_map.get(name) {
        None => Ok(default),
        Some(raw) => raw.parse::<f64>().map_err(|_| {
            ConfigError::InvalidValue(name.to_string(), "must be a valid number".to_string())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.openai_api_url, "https://api.openai.com");
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.advice_model, "gpt-4o");
        assert_eq!(config.start_balance, 0.0);
        assert_eq!(config.target_balance, 0.0);
    }

    #[test]
    fn test_missing_database_path() {
        let result = Config::from_env_map(HashMap::new());
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_balance() {
        let mut env_map = setup_required_env();
        env_map.insert("START_BALANCE".to_string(), "lots".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "START_BALANCE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_empty_api_key_treated_as_absent() {
        let mut env_map = setup_required_env();
        env_map.insert("OPENAI_API_KEY".to_string(), "".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert!(config.openai_api_key.is_none());
    }
}
