use std::collections::HashSet;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_PROCESS_PATH: &str = "/process-data";
pub const DEFAULT_OPERATION_PATH: &str = "/bfhl";
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Origin entry that allows any origin
pub const ANY_ORIGIN: &str = "*";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Host cannot be empty")]
    EmptyHost,
    #[error("Path must start with '/': {0}")]
    InvalidPath(String),
    #[error("Path is routed twice: {0}")]
    DuplicatePath(String),
    #[error("At least one allowed origin is required")]
    NoAllowedOrigins,
    #[error("Maximum body size must be greater than zero")]
    ZeroBodyLimit,
    #[error("Maximum in-flight requests must be greater than zero")]
    ZeroInFlightLimit,
}

/// Settings injected into the server at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub process_path: String,
    pub operation_path: String,
    pub max_body_bytes: usize,
    /// Requests handled concurrently before new ones are refused with 503
    pub max_in_flight: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: vec![ANY_ORIGIN.to_string()],
            process_path: DEFAULT_PROCESS_PATH.to_string(),
            operation_path: DEFAULT_OPERATION_PATH.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<impl Into<String>>) -> Self {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_process_path(mut self, path: impl Into<String>) -> Self {
        self.process_path = path.into();
        self
    }

    pub fn with_operation_path(mut self, path: impl Into<String>) -> Self {
        self.operation_path = path.into();
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = limit;
        self
    }

    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == ANY_ORIGIN)
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allows_any_origin() || self.allowed_origins.iter().any(|o| o == origin)
    }

    /// Checks the settings before the server binds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::NoAllowedOrigins);
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::ZeroBodyLimit);
        }
        if self.max_in_flight == 0 {
            return Err(ConfigError::ZeroInFlightLimit);
        }

        let mut seen = HashSet::from(["/"]);
        for path in [&self.process_path, &self.operation_path] {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidPath(path.clone()));
            }
            if !seen.insert(path.as_str()) {
                return Err(ConfigError::DuplicatePath(path.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.process_path, "/process-data");
        assert_eq!(config.operation_path, "/bfhl");
        assert!(config.allows_any_origin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ServerConfig::new()
            .with_host("127.0.0.1")
            .with_port(0)
            .with_allowed_origins(vec!["http://localhost:8501"])
            .with_process_path("/classify")
            .with_operation_path("/info")
            .with_max_body_bytes(16)
            .with_max_in_flight(2);

        assert_eq!(config.bind_address(), "127.0.0.1:0");
        assert!(!config.allows_any_origin());
        assert!(config.is_origin_allowed("http://localhost:8501"));
        assert!(!config.is_origin_allowed("http://evil.example"));
        assert_eq!(config.max_body_bytes, 16);
        assert_eq!(config.max_in_flight, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            ServerConfig::new().with_host(" ").validate(),
            Err(ConfigError::EmptyHost)
        );
        assert_eq!(
            ServerConfig::new().with_process_path("process").validate(),
            Err(ConfigError::InvalidPath("process".into()))
        );
        assert_eq!(
            ServerConfig::new().with_operation_path("/process-data").validate(),
            Err(ConfigError::DuplicatePath("/process-data".into()))
        );
        assert_eq!(
            ServerConfig::new().with_process_path("/").validate(),
            Err(ConfigError::DuplicatePath("/".into()))
        );
        assert_eq!(
            ServerConfig::new().with_allowed_origins(Vec::<String>::new()).validate(),
            Err(ConfigError::NoAllowedOrigins)
        );
        assert_eq!(
            ServerConfig::new().with_max_body_bytes(0).validate(),
            Err(ConfigError::ZeroBodyLimit)
        );
        assert_eq!(
            ServerConfig::new().with_max_in_flight(0).validate(),
            Err(ConfigError::ZeroInFlightLimit)
        );
    }

    #[test]
    fn test_largest_body_limit_is_valid() {
        assert!(ServerConfig::new().with_max_body_bytes(usize::MAX).validate().is_ok());
    }
}
