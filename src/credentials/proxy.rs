//! Proxy endpoint parsing.
//!
//! Accepted line format: `[scheme://][username:password@]host:port`,
//! where scheme is one of `http`, `https`, `socks5`, `socks5h` (default `http`).

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use url::Url;

use crate::config::loader::{read_file, ConfigError};
use crate::credentials::significant_lines;

/// Supported proxy protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyScheme {
    Http,
    Https,
    Socks5,
    Socks5h,
}

impl ProxyScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyScheme::Http => "http",
            ProxyScheme::Https => "https",
            ProxyScheme::Socks5 => "socks5",
            ProxyScheme::Socks5h => "socks5h",
        }
    }
}

impl FromStr for ProxyScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(ProxyScheme::Http),
            "https" => Ok(ProxyScheme::Https),
            "socks5" => Ok(ProxyScheme::Socks5),
            "socks5h" => Ok(ProxyScheme::Socks5h),
            other => Err(format!("unsupported proxy scheme '{}'", other)),
        }
    }
}

/// Optional username/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProxyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A single outbound proxy, owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub scheme: ProxyScheme,
    pub auth: Option<ProxyAuth>,
    pub host: String,
    pub port: u16,
}

impl ProxyEndpoint {
    /// Proxy URL with credentials embedded, as understood by `reqwest::Proxy`.
    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port))?;
        if let Some(auth) = &self.auth {
            // Only fails for cannot-be-a-base URLs, which the format above excludes.
            let _ = url.set_username(&auth.username);
            let _ = url.set_password(Some(&auth.password));
        }
        Ok(url)
    }
}

/// Log-safe rendering: never includes the password.
impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.auth {
            Some(auth) => write!(
                f,
                "{}://{}:***@{}:{}",
                self.scheme.as_str(),
                auth.username,
                self.host,
                self.port
            ),
            None => write!(f, "{}://{}:{}", self.scheme.as_str(), self.host, self.port),
        }
    }
}

impl FromStr for ProxyEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (scheme, rest) = match s.split_once("://") {
            Some((scheme, rest)) => (scheme.parse::<ProxyScheme>()?, rest),
            None => (ProxyScheme::Http, s),
        };

        let (auth, address) = match rest.rsplit_once('@') {
            Some((credentials, address)) => {
                let (username, password) = credentials
                    .split_once(':')
                    .ok_or_else(|| "credentials must be username:password".to_string())?;
                if username.is_empty() {
                    return Err("empty username".to_string());
                }
                let auth = ProxyAuth {
                    username: username.to_string(),
                    password: password.to_string(),
                };
                (Some(auth), address)
            }
            None => (None, rest),
        };

        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| "missing port".to_string())?;
        if host.is_empty() {
            return Err("empty host".to_string());
        }
        let port: u16 = port
            .parse()
            .map_err(|_| format!("invalid port '{}'", port))?;

        Ok(Self {
            scheme,
            auth,
            host: host.to_string(),
            port,
        })
    }
}

/// Parse proxy file content. Any malformed line fails the whole file.
pub fn parse_proxies(content: &str) -> Result<Vec<ProxyEndpoint>, ConfigError> {
    significant_lines(content)
        .map(|(line, text)| {
            text.parse::<ProxyEndpoint>()
                .map_err(|reason| ConfigError::InvalidProxy { line, reason })
        })
        .collect()
}

/// Load the proxy file. A missing file means every account runs without a proxy.
pub fn load_proxies(path: &Path) -> Result<Vec<ProxyEndpoint>, ConfigError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Proxy file not found, running without proxies");
        return Ok(Vec::new());
    }

    let proxies = parse_proxies(&read_file(path)?)?;
    tracing::info!(path = %path.display(), count = proxies.len(), "Proxies loaded");
    Ok(proxies)
}
