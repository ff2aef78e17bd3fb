pub mod admin;
pub mod db;
pub mod error;
pub mod markup;
pub mod paginate;
pub use error::Error;
use chrono::{Local, TimeZone};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "blogboards";

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub db_path: String,
    // Any level name the `log` crate understands: off, error, warn, info, debug, trace.
    pub log_level: String,
}

impl ::std::default::Default for BlogConfig {
    fn default() -> Self {
        let data_home = xdg::BaseDirectories::with_prefix(APP_NAME)
            .get_data_home()
            .unwrap_or_else(|| PathBuf::from("."));
        let db_name = Path::new("blogboards.db");

        Self {
            db_path: data_home.join(db_name).to_string_lossy().into_owned(),
            log_level: "info".into(),
        }
    }
}

impl BlogConfig {
    /// Load the configuration from the defaults, then the config file, then the environment.
    ///
    /// An explicitly requested file must exist. The XDG one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let mut builder = Config::builder();
        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(path) =
                    xdg::BaseDirectories::with_prefix(APP_NAME).find_config_file("config.toml")
                {
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }
        Ok(builder
            .add_source(Environment::with_prefix("BLOGBOARDS"))
            .build()?
            .try_deserialize()?)
    }

    /// The configured log level, falling back to `info` for nonsense values.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

/// Format the number of microseconds since the Unix epoch as a local timestamp.
pub fn formatted_useconds(dstamp: i64) -> String {
    match Local.timestamp_micros(dstamp) {
        chrono::LocalResult::Single(stamp) => format!("{}", stamp.format("%Y-%m-%dT%H:%M:%S")),
        _ => "????-??-??T??:??:??".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_into_data_home() {
        let cfg = BlogConfig::default();
        assert!(cfg.db_path.ends_with("blogboards.db"));
        assert_eq!(cfg.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn bad_log_level_falls_back_to_info() {
        let cfg = BlogConfig {
            db_path: ":memory:".into(),
            log_level: "chatty".into(),
        };
        assert_eq!(cfg.level_filter(), log::LevelFilter::Info);

        let cfg = BlogConfig {
            db_path: ":memory:".into(),
            log_level: "DEBUG".into(),
        };
        assert_eq!(cfg.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn formats_the_epoch() {
        // Local time zones shift the hours, but never the shape.
        let formatted = formatted_useconds(0);
        assert_eq!(formatted.len(), "1970-01-01T00:00:00".len());
        assert!(formatted.starts_with("19"));
    }
}
