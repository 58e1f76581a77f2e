//! Gateway configuration.
//!
//! One explicit, immutable value built at startup and threaded into the
//! dispatcher. There are no module-level defaults to mutate.

/// CORS policy. The headers derived from it are attached to every response,
/// success or error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Allowed origins; `["*"]` means any. Multiple entries are emitted as a
    /// single joined header value.
    pub allow_origin: Vec<String>,
    pub allow_headers: Vec<String>,
    pub allow_methods: Vec<String>,
    /// Preflight cache lifetime in seconds, when set.
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: vec!["*".to_string()],
            allow_headers: vec![
                "content-type".to_string(),
                "authorization".to_string(),
                "x-request-id".to_string(),
            ],
            allow_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "PATCH".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            max_age: None,
        }
    }
}

/// Immutable gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Prefix applied to every route template and to the reserved health path.
    pub base_path: String,
    pub cors: CorsConfig,
    /// Enables structured per-request logging. No behavioral effect.
    pub debug: bool,
}

impl GatewayConfig {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: normalize_base_path(&base_path.into()),
            ..Self::default()
        }
    }

    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Normalize a base path: empty stays empty, otherwise exactly one leading
/// slash and no trailing slash.
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
