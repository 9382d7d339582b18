//! Response envelope returned alongside every decoded value.

use chrono::DateTime;

use crate::http::HttpResponse;
use crate::scalar::Timestamp;

pub const HEADER_RATE_LIMIT: &str = "X-Ratelimit-Limit";
pub const HEADER_RATE_REMAINING: &str = "X-Ratelimit-Remaining";
pub const HEADER_RATE_RESET: &str = "X-Ratelimit-Reset";
pub const HEADER_NEXT_CURSOR: &str = "X-Next-Cursor";

/// Rate-limit counters reported by the server.
///
/// Each field is zero (or unset) when its header is missing or unparseable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rate {
    pub limit: u64,
    pub remaining: u64,
    pub reset: Timestamp,
}

impl Rate {
    pub fn from_headers(response: &HttpResponse) -> Self {
        let counter = |name: &str| {
            response
                .header(name)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(0)
        };
        let reset = response
            .header(HEADER_RATE_RESET)
            .and_then(|value| DateTime::parse_from_rfc3339(value.trim()).ok())
            .map(Timestamp::new)
            .unwrap_or_default();

        Self {
            limit: counter(HEADER_RATE_LIMIT),
            remaining: counter(HEADER_RATE_REMAINING),
            reset,
        }
    }
}

/// Status and headers of a completed call, plus the derived cursor and
/// rate-limit counters.
///
/// `next_cursor` comes from `X-Next-Cursor` on endpoints that page by header
/// and is overwritten by the body's `nextCursor` on endpoints that page in
/// the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub next_cursor: Option<String>,
    pub rate: Rate,
}

impl Response {
    pub fn from_http(http: &HttpResponse) -> Self {
        let next_cursor = http
            .header(HEADER_NEXT_CURSOR)
            .map(str::trim)
            .filter(|cursor| !cursor.is_empty())
            .map(str::to_string);

        Self {
            status: http.status,
            headers: http.headers.clone(),
            next_cursor,
            rate: Rate::from_headers(http),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
