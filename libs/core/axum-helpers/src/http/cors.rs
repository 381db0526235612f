use axum::http::{HeaderValue, Method, header};
use core_config::{Environment, server::ServerConfig};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Creates a CORS layer restricted to `allowed_origins`.
///
/// - Methods used by the resource routes (GET, POST, PATCH, DELETE, OPTIONS)
/// - Headers: Content-Type, Authorization, Accept
/// - Credentials allowed
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Creates a permissive CORS layer for development.
///
/// Allows any origin - **DO NOT USE IN PRODUCTION**.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Picks the CORS layer for the configured origins.
///
/// Production requires at least one origin; development falls back to the
/// permissive layer when none are configured.
pub fn cors_layer_for(config: &ServerConfig, environment: &Environment) -> io::Result<CorsLayer> {
    if config.cors_allowed_origins.is_empty() {
        if environment.is_production() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "CORS_ALLOWED_ORIGIN is required in production. Example: CORS_ALLOWED_ORIGIN=https://example.com",
            ));
        }
        warn!("CORS_ALLOWED_ORIGIN not set, allowing any origin");
        return Ok(create_permissive_cors_layer());
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    info!(
        "CORS configured with allowed origins: {}",
        config.cors_allowed_origins.join(",")
    );
    Ok(create_cors_layer(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_requires_origins() {
        let config = ServerConfig::default();
        assert!(cors_layer_for(&config, &Environment::Production).is_err());
    }

    #[test]
    fn test_development_falls_back_to_permissive() {
        let config = ServerConfig::default();
        assert!(cors_layer_for(&config, &Environment::Development).is_ok());
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let config = ServerConfig {
            cors_allowed_origins: vec!["http://bad\norigin".to_string()],
            ..ServerConfig::default()
        };
        assert!(cors_layer_for(&config, &Environment::Production).is_err());
    }
}
