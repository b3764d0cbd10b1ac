//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use algoscope_engine::Speed;

use crate::error::{Error, Result};

/// Settings for [`crate::VisServer`] and the `algoscope` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// Address the HTTP server binds
    pub addr: SocketAddr,
    /// Directory served for every path the API does not claim
    pub assets: PathBuf,
    /// Initial animation speed
    pub speed: Speed,
    /// Base URL of a remote step source, if any
    pub step_source: Option<String>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            assets: PathBuf::from("./static"),
            speed: Speed::default(),
            step_source: None,
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// - `ALGOSCOPE_ADDR` (default `0.0.0.0:8000`)
    /// - `ALGOSCOPE_ASSETS` (default `./static`)
    /// - `ALGOSCOPE_SPEED` (default `50`, clamped to `1..=100`)
    /// - `ALGOSCOPE_STEP_SOURCE` (unset: steps are computed locally)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("ALGOSCOPE_ADDR") {
            config.addr = addr
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid ALGOSCOPE_ADDR '{addr}'")))?;
        }

        if let Some(assets) = lookup("ALGOSCOPE_ASSETS") {
            config.assets = PathBuf::from(assets);
        }

        if let Some(speed) = lookup("ALGOSCOPE_SPEED") {
            let value: u8 = speed
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid ALGOSCOPE_SPEED '{speed}'")))?;
            config.speed = Speed::new(value);
        }

        config.step_source = lookup("ALGOSCOPE_STEP_SOURCE")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        Ok(config)
    }

    /// Same config on a different port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = VisConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, VisConfig::default());
        assert_eq!(config.addr.port(), 8000);
        assert_eq!(config.speed.get(), 50);
    }

    #[test]
    fn overrides_from_environment() {
        let config = VisConfig::from_lookup(lookup(&[
            ("ALGOSCOPE_ADDR", "127.0.0.1:9000"),
            ("ALGOSCOPE_ASSETS", "/srv/www"),
            ("ALGOSCOPE_SPEED", "250"),
            ("ALGOSCOPE_STEP_SOURCE", "http://steps.local/"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.assets, PathBuf::from("/srv/www"));
        assert_eq!(config.speed, Speed::MAX);
        assert_eq!(config.step_source.as_deref(), Some("http://steps.local"));
    }

    #[test]
    fn bad_values_are_reported() {
        assert!(matches!(
            VisConfig::from_lookup(lookup(&[("ALGOSCOPE_ADDR", "nowhere")])),
            Err(Error::Config(_))
        ));
        assert!(VisConfig::from_lookup(lookup(&[("ALGOSCOPE_SPEED", "fast")])).is_err());
    }

    #[test]
    fn port_override() {
        assert_eq!(VisConfig::default().with_port(3000).addr.port(), 3000);
    }
}
