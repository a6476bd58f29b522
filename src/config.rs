use serde;
use toml;

#[derive(serde::Deserialize, Debug)]
#[serde(default)]
pub struct ApplicationConfig {
    pub receiver: ReceiverConfig,
    pub watch: WatchConfig,
    pub telegram: TelegramConfig,
}

impl ApplicationConfig {
    pub fn construct_from_path(
        path: &std::path::PathBuf,
    ) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        let string =
            std::fs::read_to_string(path).map_err(|error| errors::ApplicationConfigError::Io {
                source: error,
                path: path.clone(),
            })?;

        let config: Result<ApplicationConfig, errors::ApplicationConfigError> =
            toml::from_str(&string).map_err(|error| errors::ApplicationConfigError::Parse {
                source: error,
                path: path.clone(),
            });
        config
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        ApplicationConfig {
            receiver: ReceiverConfig::default(),
            watch: WatchConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

#[derive(serde::Deserialize, Debug)]
#[serde(default)]
pub struct ReceiverConfig {
    pub url: String,
    pub poll_interval_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        ReceiverConfig {
            url: String::from("http://127.0.0.1:8755/data/aircraft.json"),
            poll_interval_seconds: 5,
            timeout_seconds: 10,
        }
    }
}

#[derive(serde::Deserialize, Debug)]
#[serde(default)]
pub struct WatchConfig {
    pub home_latitude: f64,
    pub home_longitude: f64,
    pub max_distance_km: f64,
    pub max_altitude_ft: f64,
    pub notification_window_minutes: i64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            home_latitude: 40.0,
            home_longitude: 10.0,
            max_distance_km: 7.0,
            max_altitude_ft: 35_000.0,
            notification_window_minutes: 10,
        }
    }
}

#[derive(serde::Deserialize, Debug)]
#[serde(default)]
pub struct TelegramConfig {
    pub api_url: String,
    pub chat_id: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        TelegramConfig {
            api_url: String::from("https://api.telegram.org/bot/sendMessage"),
            chat_id: String::new(),
        }
    }
}

pub mod errors {

    #[derive(Debug)]
    pub enum ApplicationConfigError {
        Parse {
            source: toml::de::Error,
            path: std::path::PathBuf,
        },
        Io {
            source: std::io::Error,
            path: std::path::PathBuf,
        },
    }
    impl std::fmt::Display for ApplicationConfigError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ApplicationConfigError::Io {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to read config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Parse {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        error
                    )
                }
            }
        }
    }
    impl std::error::Error for ApplicationConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                ApplicationConfigError::Io { source: error, .. } => Some(error),
                ApplicationConfigError::Parse { source: error, .. } => Some(error),
            }
        }
    }
}
