use std::fmt;

use serde::Serialize;

use crate::inference::PredictionResponse;

/// Path prefix of the per-disease result pages.
pub const DISEASE_ROUTE_PREFIX: &str = "/diseases/";

/// A route the presentation layer should navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavigationTarget(String);

impl NavigationTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier segment after `/diseases/`.
    pub fn disease_id(&self) -> &str {
        self.0.strip_prefix(DISEASE_ROUTE_PREFIX).unwrap_or(&self.0)
    }

    /// The route with its identifier percent-encoded, safe for a `Location`
    /// header or an `href`.
    pub fn href(&self) -> String {
        format!("{}{}", DISEASE_ROUTE_PREFIX, encode_segment(self.disease_id()))
    }
}

/// Percent-encodes every byte outside the RFC 3986 unreserved set, so the
/// result is plain ASCII and holds no `/`, `?` or `#`.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds `/diseases/{id}` from element 0 of the response.
///
/// The identifier is used verbatim; whether it names a known disease is up to
/// the page that renders the route.
pub fn route(response: &PredictionResponse) -> NavigationTarget {
    NavigationTarget(format!("{}{}", DISEASE_ROUTE_PREFIX, response.top_id()))
}
