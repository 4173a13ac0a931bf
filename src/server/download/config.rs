use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";

/// Server settings, read from `VDL_*` environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub default_download_dir: PathBuf,
    pub yt_dlp_path: Option<PathBuf>,
    pub max_concurrent_downloads: usize,
    pub max_records_per_session: usize,
    pub session_ttl: Duration,
    pub socket_timeout_secs: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            yt_dlp_path: None,
            max_concurrent_downloads: 4,
            max_records_per_session: 50,
            session_ttl: Duration::from_secs(30 * 60),
            socket_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            default_download_dir: non_empty("VDL_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.default_download_dir),
            yt_dlp_path: non_empty("VDL_YT_DLP_PATH").map(PathBuf::from),
            max_concurrent_downloads: parse_or(
                &lookup,
                "VDL_MAX_CONCURRENT",
                defaults.max_concurrent_downloads,
            )
            .max(1),
            max_records_per_session: parse_or(
                &lookup,
                "VDL_MAX_RECORDS",
                defaults.max_records_per_session,
            )
            .max(1),
            session_ttl: Duration::from_secs(parse_or(
                &lookup,
                "VDL_SESSION_TTL_SECS",
                defaults.session_ttl.as_secs(),
            )),
            socket_timeout_secs: parse_or(
                &lookup,
                "VDL_SOCKET_TIMEOUT_SECS",
                defaults.socket_timeout_secs,
            ),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid value {:?} for {}", raw, key);
                default
            }
        },
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), ServerConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("VDL_DOWNLOAD_DIR", "/srv/media"),
            ("VDL_YT_DLP_PATH", "/usr/local/bin/yt-dlp"),
            ("VDL_MAX_CONCURRENT", "2"),
            ("VDL_SESSION_TTL_SECS", "60"),
        ]);
        assert_eq!(config.default_download_dir, PathBuf::from("/srv/media"));
        assert_eq!(
            config.yt_dlp_path,
            Some(PathBuf::from("/usr/local/bin/yt-dlp"))
        );
        assert_eq!(config.max_concurrent_downloads, 2);
        assert_eq!(config.session_ttl, Duration::from_secs(60));
    }

    #[test]
    fn invalid_and_zero_values_fall_back() {
        let config = config_from(&[
            ("VDL_MAX_CONCURRENT", "0"),
            ("VDL_MAX_RECORDS", "lots"),
            ("VDL_DOWNLOAD_DIR", "  "),
        ]);
        assert_eq!(config.max_concurrent_downloads, 1);
        assert_eq!(config.max_records_per_session, 50);
        assert_eq!(config.default_download_dir, PathBuf::from(DEFAULT_DOWNLOAD_DIR));
    }
}
