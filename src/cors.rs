use axum::{
    http::{header, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::AppState;

/// Cross-origin rules for one endpoint. Every response, including errors and
/// the OPTIONS acknowledgement, carries all three headers; pre-flights are
/// answered by the route's own OPTIONS handler.
#[derive(Debug, Clone, Copy)]
pub struct CorsPolicy {
    pub methods: &'static [&'static str],
    pub headers: &'static [&'static str],
}

pub const AUTH: CorsPolicy = CorsPolicy {
    methods: &["POST", "OPTIONS"],
    headers: &["Content-Type"],
};

/// PUT is advertised for existing browser clients but no handler serves it.
pub const ENTRIES: CorsPolicy = CorsPolicy {
    methods: &["GET", "POST", "PUT", "DELETE", "OPTIONS"],
    headers: &["Content-Type", "Authorization"],
};

impl CorsPolicy {
    pub fn allow_methods_value(&self) -> HeaderValue {
        join_header_value(self.methods)
    }

    pub fn allow_headers_value(&self) -> HeaderValue {
        join_header_value(self.headers)
    }

    pub fn apply(&self, router: Router<AppState>) -> Router<AppState> {
        router
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                self.allow_methods_value(),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                self.allow_headers_value(),
            ))
    }
}

fn join_header_value(parts: &[&str]) -> HeaderValue {
    // Method and header names are always valid header value characters.
    HeaderValue::from_str(&parts.join(", ")).unwrap_or_else(|_| HeaderValue::from_static(""))
}
