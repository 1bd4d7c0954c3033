//! Report of the proxy variables in effect.
//!
//! Routing is left to libcurl, which reads the same variables. This module
//! only parses them so a run logs which proxy it is exercising, with any
//! credentials masked.

use std::fmt;

use crate::context::TaskLog;

/// Variables libcurl consults, in the order they are reported.
/// libcurl ignores upper-case `HTTP_PROXY`.
pub const PROXY_VARIABLES: &[&str] = &[
    "http_proxy",
    "https_proxy",
    "HTTPS_PROXY",
    "all_proxy",
    "ALL_PROXY",
];

pub const NO_PROXY_VARIABLES: &[&str] = &["no_proxy", "NO_PROXY"];

/// A parsed `scheme://[user@]host[:port]/` proxy value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub has_credentials: bool,
}

impl ProxyEndpoint {
    /// A value without a scheme is treated as `http://`, matching libcurl.
    pub fn parse(value: &str) -> Result<Self, url::ParseError> {
        let value = value.trim();
        let parsed = if value.contains("://") {
            url::Url::parse(value)?
        } else {
            url::Url::parse(&format!("http://{}", value))?
        };
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(url::ParseError::EmptyHost)?;
        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host: host.to_string(),
            port: parsed.port_or_known_default(),
            has_credentials: !parsed.username().is_empty() || parsed.password().is_some(),
        })
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme)?;
        if self.has_credentials {
            f.write_str("***@")?;
        }
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        f.write_str("/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyValue {
    Endpoint(ProxyEndpoint),
    /// Comma-separated hosts or domains that bypass the proxy.
    Exclusions(Vec<String>),
    /// Could not be parsed; libcurl gets the last word.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySetting {
    pub variable: &'static str,
    pub value: ProxyValue,
}

/// Collect the set, non-empty proxy variables through `lookup`.
pub fn settings_from<F>(lookup: F) -> Vec<ProxySetting>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Vec::new();
    for &variable in PROXY_VARIABLES {
        if let Some(raw) = lookup(variable).filter(|v| !v.trim().is_empty()) {
            let value = match ProxyEndpoint::parse(&raw) {
                Ok(ep) => ProxyValue::Endpoint(ep),
                Err(e) => ProxyValue::Invalid(e.to_string()),
            };
            settings.push(ProxySetting { variable, value });
        }
    }
    for &variable in NO_PROXY_VARIABLES {
        if let Some(raw) = lookup(variable).filter(|v| !v.trim().is_empty()) {
            let hosts = raw
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .collect();
            settings.push(ProxySetting {
                variable,
                value: ProxyValue::Exclusions(hosts),
            });
        }
    }
    settings
}

/// Proxy settings of the current process environment.
pub fn settings_from_env() -> Vec<ProxySetting> {
    settings_from(|k| std::env::var(k).ok())
}

/// Log the settings on behalf of a task: endpoints at debug, parse
/// failures as warnings.
pub fn report(settings: &[ProxySetting], log: &TaskLog<'_>) {
    if settings.is_empty() {
        log.debug("no proxy variables set; connecting directly");
        return;
    }
    for s in settings {
        match &s.value {
            ProxyValue::Endpoint(ep) => log.debug(format!("{} = {}", s.variable, ep)),
            ProxyValue::Exclusions(hosts) => {
                log.debug(format!("{} = {}", s.variable, hosts.join(",")))
            }
            ProxyValue::Invalid(reason) => {
                log.warn(format!("{} is not a valid proxy URL ({})", s.variable, reason))
            }
        }
    }
}
