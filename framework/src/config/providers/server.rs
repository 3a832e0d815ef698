use crate::config::env::{env, env_optional};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
/// 10 MiB
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// IP address or hostname to bind
    pub host: String,
    pub port: u16,
    /// Largest accepted request body in bytes; larger bodies get a 413
    pub max_body_size: usize,
}

impl ServerConfig {
    /// Build config from `SERVER_HOST`, `SERVER_PORT` and `SERVER_MAX_BODY_SIZE`
    pub fn from_env() -> Self {
        Self {
            host: env("SERVER_HOST", DEFAULT_HOST.to_string()),
            port: env("SERVER_PORT", DEFAULT_PORT),
            max_body_size: body_limit(env_optional("SERVER_MAX_BODY_SIZE")),
        }
    }

    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Address handed to the listener; hostnames are resolved at bind time
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// A zero limit would reject every request with a body
fn body_limit(configured: Option<usize>) -> usize {
    match configured {
        Some(0) => {
            tracing::warn!(
                default = DEFAULT_MAX_BODY_SIZE,
                "max body size of 0 ignored, using default"
            );
            DEFAULT_MAX_BODY_SIZE
        }
        Some(limit) => limit,
        None => DEFAULT_MAX_BODY_SIZE,
    }
}

/// Builder for ServerConfig; unset fields take the built-in defaults
#[derive(Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    max_body_size: Option<usize>,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Port 0 asks the OS for a free port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = Some(size);
        self
    }

    pub fn build(self) -> ServerConfig {
        ServerConfig {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            max_body_size: body_limit(self.max_body_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_starts_from_defaults() {
        let config = ServerConfig::builder().port(3000).build();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
    }

    #[test]
    fn test_zero_body_limit_uses_default() {
        let config = ServerConfig::builder().max_body_size(0).build();
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert_eq!(body_limit(Some(64)), 64);
        assert_eq!(body_limit(None), DEFAULT_MAX_BODY_SIZE);
    }

    #[tokio::test]
    async fn test_bind_target_accepts_hostnames() {
        let config = ServerConfig::builder().host("localhost").port(0).build();
        assert_eq!(config.bind_target(), ("localhost", 0));
        let listener = tokio::net::TcpListener::bind(config.bind_target())
            .await
            .unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
