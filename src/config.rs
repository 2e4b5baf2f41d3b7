use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token and cookie lifetime in minutes.
    pub jwt_maxage: i64,
    pub port: u16,
    pub client_url: String,
    pub log_level: String,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;

        let jwt_maxage = match lookup("JWT_MAXAGE") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or(ConfigError::Invalid { name: "JWT_MAXAGE", value })?,
            None => 60 * 24 * 7,
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => 8000,
        };

        let client_url =
            lookup("CLIENT_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "debug".to_string());
        let seed_demo_data = lookup("SEED_DEMO_DATA")
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_maxage,
            port,
            client_url,
            log_level,
            seed_demo_data,
        })
    }
}
