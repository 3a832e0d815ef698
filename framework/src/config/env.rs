use std::path::Path;

/// Deployment environment, read from `APP_ENV`
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
    Testing,
    Custom(String),
}

impl Environment {
    /// Detect environment from APP_ENV or default to Local
    pub fn detect() -> Self {
        Self::parse(std::env::var("APP_ENV").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            Some("staging") => Self::Staging,
            Some("development") => Self::Development,
            Some("testing") => Self::Testing,
            Some("local") | None => Self::Local,
            Some(other) => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Testing => "testing",
            Self::Custom(name) => name.as_str(),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Local or development
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Local | Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load environment variables from .env files with proper precedence
///
/// Precedence (later entries win):
/// 1. .env
/// 2. .env.local
/// 3. .env.{environment}
/// 4. .env.{environment}.local
/// 5. Actual process environment variables
pub fn load_dotenv(project_root: &Path) -> Environment {
    let env = Environment::detect();

    // dotenvy never overwrites a variable that is already set, so the most
    // specific file is loaded first.
    let files = [
        format!(".env.{}.local", env),
        format!(".env.{}", env),
        ".env.local".to_string(),
        ".env".to_string(),
    ];
    for file in files {
        let path = project_root.join(&file);
        if dotenvy::from_path(&path).is_ok() {
            tracing::debug!(file = %path.display(), "loaded env file");
        }
    }

    env
}

/// Get an environment variable with a default value
///
/// # Example
/// ```
/// use kit::config::env;
///
/// let port: u16 = env("SERVER_PORT", 8080);
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_optional(key).unwrap_or(default)
}

/// Get an optional environment variable
///
/// Unset and unparseable values both yield `None`.
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
