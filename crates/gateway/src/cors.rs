//! CORS header computation.
//!
//! The header set is computed once from configuration and shared read-only
//! across requests; per-request work is a plain header copy.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};

use crate::config::CorsConfig;

/// Precomputed CORS headers, applied to every response.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl CorsHeaders {
    pub fn from_config(config: &CorsConfig) -> Self {
        let mut headers = vec![
            (
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                join_values(&config.allow_origin),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                join_values(&config.allow_headers),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                join_values(&config.allow_methods),
            ),
        ];
        if let Some(max_age) = config.max_age {
            headers.push((header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(max_age)));
        }
        Self { headers }
    }

    /// Copy the computed headers into a response header map.
    pub fn apply(&self, target: &mut HeaderMap) {
        for (name, value) in &self.headers {
            target.insert(name.clone(), value.clone());
        }
    }
}

fn join_values(values: &[String]) -> HeaderValue {
    HeaderValue::from_str(&values.join(", ")).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_produces_wildcard_origin() {
        let cors = CorsHeaders::from_config(&CorsConfig::default());
        let mut headers = HeaderMap::new();
        cors.apply(&mut headers);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, PATCH, DELETE, OPTIONS"
        );
        assert!(!headers.contains_key(header::ACCESS_CONTROL_MAX_AGE));
    }

    #[test]
    fn multiple_origins_are_joined() {
        let config = CorsConfig {
            allow_origin: vec!["https://a.example".to_string(), "https://b.example".to_string()],
            ..CorsConfig::default()
        };
        let cors = CorsHeaders::from_config(&config);
        let mut headers = HeaderMap::new();
        cors.apply(&mut headers);
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://a.example, https://b.example"
        );
    }

    #[test]
    fn max_age_is_emitted_when_configured() {
        let config = CorsConfig {
            max_age: Some(600),
            ..CorsConfig::default()
        };
        let cors = CorsHeaders::from_config(&config);
        let mut headers = HeaderMap::new();
        cors.apply(&mut headers);
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "600");
    }
}
