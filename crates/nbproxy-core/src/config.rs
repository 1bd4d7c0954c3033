use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// libcurl transfer limits (optional `[network]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Seconds allowed for the TCP/TLS (or proxy) connect phase.
    pub connect_timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/s ...
    pub low_speed_limit: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
    /// Hard wall-clock cap for a single transfer.
    pub timeout_secs: u64,
    /// Maximum redirects followed per request.
    pub max_redirects: u32,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Hosts reached without a proxy, in libcurl `no_proxy` syntax. When set
    /// it replaces the `no_proxy` environment variable.
    pub no_proxy: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            timeout_secs: 3600,
            max_redirects: 10,
            user_agent: concat!("nbproxy/", env!("CARGO_PKG_VERSION")).to_string(),
            no_proxy: None,
        }
    }
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_time_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration read from `~/.config/nbproxy/config.toml`.
///
/// Only transfer tuning lives here; the cache, server, repository and
/// manifest pattern are fixed by [`crate::request::DownloadRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NbproxyConfig {
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Location of an existing config file, if any.
pub fn config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("nbproxy")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load the config file if one exists, otherwise built-in defaults.
/// Nothing is written to disk.
pub fn load() -> Result<NbproxyConfig> {
    match config_path()? {
        Some(path) => load_from_path(&path),
        None => Ok(NbproxyConfig::default()),
    }
}

pub fn load_from_path(path: &Path) -> Result<NbproxyConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: NbproxyConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_network_values() {
        let net = NetworkConfig::default();
        assert_eq!(net.connect_timeout(), Duration::from_secs(30));
        assert_eq!(net.low_speed_limit, 1024);
        assert_eq!(net.low_speed_time(), Duration::from_secs(60));
        assert_eq!(net.timeout(), Duration::from_secs(3600));
        assert_eq!(net.max_redirects, 10);
        assert!(net.user_agent.starts_with("nbproxy/"));
        assert_eq!(net.no_proxy, None);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: NbproxyConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, NbproxyConfig::default());
    }

    #[test]
    fn partial_network_section_keeps_other_defaults() {
        let toml = r#"
            [network]
            connect_timeout_secs = 5
            user_agent = "proxy-check"
        "#;
        let cfg: NbproxyConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.network.connect_timeout_secs, 5);
        assert_eq!(cfg.network.user_agent, "proxy-check");
        assert_eq!(cfg.network.max_redirects, 10);
        assert_eq!(cfg.network.timeout_secs, 3600);
        assert_eq!(cfg.network.no_proxy, None);
    }

    #[test]
    fn no_proxy_list_is_read() {
        let toml = "[network]\nno_proxy = \"localhost,.internal.example\"\n";
        let cfg: NbproxyConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            cfg.network.no_proxy.as_deref(),
            Some("localhost,.internal.example")
        );
    }

    #[test]
    fn load_from_path_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[network]\nconnect_timeout_secs = \"soon\"\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config"));
    }
}
