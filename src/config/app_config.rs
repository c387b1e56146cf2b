use crate::error::{AppError, Result};
use std::{env, path::PathBuf, str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole create-product submission, images included.
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

/// Where uploaded files are written and the URL prefix they are served under.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub root: PathBuf,
    pub url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: setting("PORT", 3000)?,
                max_body_size: setting("MAX_BODY_SIZE", 10 * 1024 * 1024)?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: setting("DB_MAX_CONNECTIONS", 20)?,
                acquire_timeout: Duration::from_secs(setting("DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            },
            media: MediaConfig {
                root: media_root(env::var("MEDIA_ROOT").ok().as_deref())?,
                url: normalize_media_url(
                    &env::var("MEDIA_URL").unwrap_or_else(|_| "/media".to_string()),
                )?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn setting<T: FromStr>(name: &str, default: T) -> Result<T> {
    parse_setting(name, env::var(name).ok().as_deref(), default)
}

fn parse_setting<T: FromStr>(name: &str, raw: Option<&str>, default: T) -> Result<T> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| AppError::ConfigError(format!("Invalid {} value: {}", name, value))),
    }
}

fn media_root(raw: Option<&str>) -> Result<PathBuf> {
    match raw.map(str::trim) {
        None => Ok(PathBuf::from("media")),
        Some("") => Err(AppError::ConfigError(
            "MEDIA_ROOT must not be empty".to_string(),
        )),
        Some(root) => Ok(PathBuf::from(root)),
    }
}

// Static files are nested under this prefix, so it has to be a non-root absolute path.
fn normalize_media_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');

    if !trimmed.starts_with('/') || trimmed.len() < 2 {
        return Err(AppError::ConfigError(format!(
            "Invalid MEDIA_URL value: {}",
            raw
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_url_drops_trailing_slash() {
        assert_eq!(normalize_media_url("/media/").unwrap(), "/media");
        assert_eq!(normalize_media_url(" /uploads ").unwrap(), "/uploads");
    }

    #[test]
    fn media_url_must_be_a_nested_absolute_path() {
        assert!(normalize_media_url("/").is_err());
        assert!(normalize_media_url("media").is_err());
        assert!(normalize_media_url("").is_err());
    }

    #[test]
    fn unset_or_blank_settings_fall_back_to_defaults() {
        assert_eq!(parse_setting("PORT", None, 3000u16).unwrap(), 3000);
        assert_eq!(parse_setting("PORT", Some("  "), 3000u16).unwrap(), 3000);
        assert_eq!(parse_setting("PORT", Some(" 8080 "), 3000u16).unwrap(), 8080);
    }

    #[test]
    fn malformed_settings_name_the_variable() {
        let err = parse_setting("MAX_BODY_SIZE", Some("10MB"), 0usize).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid MAX_BODY_SIZE value: 10MB"
        );
        assert!(parse_setting("PORT", Some("70000"), 0u16).is_err());
    }

    #[test]
    fn media_root_defaults_but_is_never_empty() {
        assert_eq!(media_root(None).unwrap(), PathBuf::from("media"));
        assert_eq!(media_root(Some("/srv/uploads")).unwrap(), PathBuf::from("/srv/uploads"));
        assert!(media_root(Some(" ")).is_err());
    }
}
