//! Response negotiation.
//!
//! Clients signal fragment rendering with the `HX-Request` header; everything
//! else gets full documents and real redirects. Redirects in fragment mode
//! come back as `200` with an `HX-Redirect` header so the client can swap
//! location itself.

use axum::http::{HeaderMap, StatusCode, header::LOCATION};
use axum::response::{Html, IntoResponse, Response};

/// How the client wants the response rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Full HTML document, redirects via `303 Location`.
    Document,
    /// Form fragment only, redirects via `HX-Redirect`.
    Fragment,
}

impl ResponseFormat {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        if headers
            .get("hx-request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            ResponseFormat::Fragment
        } else {
            ResponseFormat::Document
        }
    }

    /// A redirect in the appropriate dialect.
    pub fn redirect(self, url: &str) -> Response {
        match self {
            ResponseFormat::Document => {
                (StatusCode::SEE_OTHER, [(LOCATION, url.to_string())]).into_response()
            }
            ResponseFormat::Fragment => {
                (StatusCode::OK, [("hx-redirect", url.to_string())]).into_response()
            }
        }
    }

    /// An HTML page or fragment, depending on the format.
    pub fn html(self, status: StatusCode, document: String, fragment: String) -> Response {
        match self {
            ResponseFormat::Document => (status, Html(document)).into_response(),
            ResponseFormat::Fragment => (status, Html(fragment)).into_response(),
        }
    }
}
