use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_PATH: &str = "data/water.db";

/// Goal shown on the history page for users who never set one.
pub const FALLBACK_GOAL_ML: f64 = 2000.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(env::var("PORT").ok(), env::var("APP_DATABASE_PATH").ok())
    }

    fn from_vars(port: Option<String>, database_path: Option<String>) -> Self {
        let port = port
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let database_path = database_path
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        Self {
            port,
            database_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset_or_invalid() {
        let config = Config::from_vars(Some("not-a-port".to_string()), Some("  ".to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::from_vars(Some("9191".to_string()), Some("/tmp/w.db".to_string()));
        assert_eq!(config.port, 9191);
        assert_eq!(config.database_path, PathBuf::from("/tmp/w.db"));
    }
}
