use std::env;

use crate::utils::AppError;

/// Runtime configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Empty means "no MongoDB": the in-memory store is used instead.
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub allow_mock_storage: bool,
    pub seed_data: bool,
    pub cors_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup so tests don't have to touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port_raw = var("PORT", "5000");
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::Config(format!("PORT must be a port number, got '{}'", port_raw)))?;

        let cors_origins = var("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            mongodb_uri: var("MONGODB_URI", "").trim().to_string(),
            mongodb_db: var("MONGODB_DB", "citizens_eye"),
            allow_mock_storage: parse_flag(&var("ALLOW_MOCK_STORAGE", "true")),
            seed_data: parse_flag(&var("SEED_DATA", "true")),
            cors_origins,
        })
    }

    pub fn uses_mongodb(&self) -> bool {
        !self.mongodb_uri.is_empty()
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            mongodb_uri: String::new(),
            mongodb_db: "citizens_eye".to_string(),
            allow_mock_storage: true,
            seed_data: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

// Only a literal "true" (any case) enables a flag.
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, AppError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.mongodb_db, "citizens_eye");
        assert!(!settings.uses_mongodb());
        assert!(settings.allow_mock_storage);
        assert!(settings.seed_data);
        assert!(settings.allows_any_origin());
    }

    #[test]
    fn test_flags_only_accept_true() {
        let settings = settings_from(&[("SEED_DATA", "TRUE"), ("ALLOW_MOCK_STORAGE", "yes")]).unwrap();
        assert!(settings.seed_data);
        assert!(!settings.allow_mock_storage);
    }

    #[test]
    fn test_mongodb_uri_and_origins() {
        let settings = settings_from(&[
            ("MONGODB_URI", " mongodb://localhost:27017 "),
            ("CORS_ORIGINS", "http://localhost:5173, http://127.0.0.1:5173"),
        ])
        .unwrap();
        assert!(settings.uses_mongodb());
        assert_eq!(settings.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(settings.cors_origins.len(), 2);
        assert!(!settings.allows_any_origin());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(settings_from(&[("PORT", "http")]).is_err());
    }
}
