//! Request-side options shared by the resource services.

use url::form_urlencoded;

/// Query parameters accepted by the list endpoints.
///
/// `include_pagination` switches the response from a bare array to the
/// `{ "<items>": [...], "nextCursor": ... }` envelope; the client decodes
/// both, so it only matters for which cursor source is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub include_pagination: bool,
    pub include_inactive: bool,
    pub tags: Vec<String>,
    pub team_id: Option<String>,
    pub visibility: Option<String>,
}

impl ListOptions {
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn paginated(mut self) -> Self {
        self.include_pagination = true;
        self
    }

    /// Encoded query string without the leading `?`; `None` when empty.
    pub fn query(&self) -> Option<String> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(cursor) = &self.cursor {
            query.append_pair("cursor", cursor);
        }
        if self.include_pagination {
            query.append_pair("include_pagination", "true");
        }
        if self.include_inactive {
            query.append_pair("include_inactive", "true");
        }
        if !self.tags.is_empty() {
            query.append_pair("tags", &self.tags.join(","));
        }
        if let Some(team_id) = &self.team_id {
            query.append_pair("team_id", team_id);
        }
        if let Some(visibility) = &self.visibility {
            query.append_pair("visibility", visibility);
        }
        let query = query.finish();
        (!query.is_empty()).then_some(query)
    }
}

/// Ownership fields sent next to a wrapped create body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub team_id: Option<String>,
    pub visibility: Option<String>,
}

/// Append an optional query string to a relative path.
pub(crate) fn with_query(path: &str, query: Option<String>) -> String {
    match query {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    }
}

/// `base/<id>` with `id` escaped as a single path segment.
pub(crate) fn item_path(base: &str, id: &str) -> String {
    format!("{base}/{}", urlencoding::encode(id))
}
