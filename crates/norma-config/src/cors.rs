use std::env;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let raw =
            env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());
        Self::from_list(&raw)
    }

    /// Parses a comma separated origin list.
    pub fn from_list(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::from_list(DEFAULT_ALLOWED_ORIGINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_origins() {
        let config = CorsConfig::from_list(" https://app.norma.ai , ,http://localhost:5173");
        assert_eq!(
            config.allowed_origins,
            vec!["https://app.norma.ai", "http://localhost:5173"]
        );
    }

    #[test]
    fn default_has_local_frontends() {
        assert_eq!(CorsConfig::default().allowed_origins.len(), 2);
    }
}
