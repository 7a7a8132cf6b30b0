//! Cursor-based "infinite scroll" pagination
//!
//! The server owns ordering and cursor semantics. The client only assembles
//! the query and hands `next_cursor` back verbatim as `after_id`.

use crate::endpoints::{Domain, DomainClient};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters of a list call; each maps 1:1 onto a URL parameter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub name: Option<String>,
    pub after_id: Option<String>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
}

impl PageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn after_id(mut self, after_id: impl Into<String>) -> Self {
        self.after_id = Some(after_id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Form-encoded query string without the leading `?`.
    ///
    /// Absent fields are left out entirely, as are empty strings and a
    /// zero limit. Parameter order is fixed: name, after_id, limit,
    /// sort_by, order.
    pub fn to_query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());

        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);

        if let Some(name) = present(&self.name) {
            query.append_pair("name", &name);
        }
        if let Some(after_id) = present(&self.after_id) {
            query.append_pair("after_id", &after_id);
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(sort_by) = present(&self.sort_by) {
            query.append_pair("sort_by", &sort_by);
        }
        if let Some(order) = self.order {
            query.append_pair("order", order.as_str());
        }

        query.finish()
    }

    /// `path` with the query appended only when there is one
    pub fn apply_to(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

/// One page of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub limit: u32,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// `next_cursor` is the sole authoritative end-of-list signal
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }

    /// `has_more` agrees with the cursor and the page respects its limit
    pub fn is_consistent(&self) -> bool {
        self.has_more == self.next_cursor.is_some() && self.items.len() <= self.limit as usize
    }
}

/// Walks a domain list page by page
pub struct Paginator<'a, D: Domain> {
    endpoints: DomainClient<'a, D>,
    query: PageQuery,
    cursor: Option<String>,
    exhausted: bool,
}

impl<'a, D: Domain> Paginator<'a, D> {
    /// Start from the first page; any `after_id` in `query` is dropped
    pub fn new(endpoints: DomainClient<'a, D>, query: PageQuery) -> Self {
        let mut paginator = Self {
            endpoints,
            query,
            cursor: None,
            exhausted: false,
        };
        paginator.restart();
        paginator
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Fetch the next page, or `None` once the server reported no (or an empty) cursor
    pub async fn next_page(&mut self) -> Result<Option<Page<D>>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut query = self.query.clone();
        query.after_id = self.cursor.clone();

        let page = self.endpoints.list(&query).await?;

        if !page.is_consistent() {
            warn!(
                domain = D::PATH,
                has_more = page.has_more,
                next_cursor = ?page.next_cursor,
                items = page.items.len(),
                limit = page.limit,
                "Inconsistent page envelope"
            );
        }

        // an empty cursor cannot be sent back, so it ends the listing
        if page.next_cursor.as_deref() == Some("") {
            warn!(domain = D::PATH, "Server returned an empty cursor, treating as last page");
        }
        self.cursor = page.next_cursor.clone().filter(|cursor| !cursor.is_empty());
        self.exhausted = self.cursor.is_none();
        debug!(domain = D::PATH, items = page.items.len(), exhausted = self.exhausted, "Fetched page");

        Ok(Some(page))
    }

    /// Change the name filter; outstanding cursors are discarded
    pub fn search(&mut self, name: Option<String>) {
        self.query.name = name;
        self.restart();
    }

    /// Change the sort; outstanding cursors are discarded
    pub fn sort(&mut self, sort_by: Option<String>, order: Option<SortOrder>) {
        self.query.sort_by = sort_by;
        self.query.order = order;
        self.restart();
    }

    pub fn restart(&mut self) {
        self.query.after_id = None;
        self.cursor = None;
        self.exhausted = false;
    }

    /// Drain every remaining page
    pub async fn collect_all(&mut self) -> Result<Vec<D>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page.items);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        let query = PageQuery::new();
        assert_eq!(query.to_query_string(), "");
        assert_eq!(query.apply_to("/curriculum"), "/curriculum");
    }

    #[test]
    fn test_only_present_fields() {
        let query = PageQuery::new().name("test");
        assert_eq!(query.apply_to("/curriculum"), "/curriculum?name=test");

        let query = PageQuery::new()
            .name("a&b c")
            .after_id("65f0")
            .limit(20)
            .sort_by("name")
            .order(SortOrder::Desc);
        assert_eq!(
            query.to_query_string(),
            "name=a%26b+c&after_id=65f0&limit=20&sort_by=name&order=desc"
        );
    }

    #[test]
    fn test_blank_values_are_omitted() {
        let query = PageQuery::new().name("").limit(0).sort_by("");
        assert_eq!(query.to_query_string(), "");
    }

    #[test]
    fn test_page_consistency() {
        let page = Page {
            items: vec![1, 2],
            limit: 2,
            has_more: true,
            next_cursor: Some("c2".to_string()),
        };
        assert!(page.is_consistent());
        assert!(!page.is_last());

        let page = Page {
            items: vec![1, 2, 3],
            limit: 2,
            has_more: false,
            next_cursor: None,
        };
        assert!(!page.is_consistent());
        assert!(page.is_last());

        let page: Page<u8> = Page {
            items: vec![],
            limit: 20,
            has_more: true,
            next_cursor: None,
        };
        assert!(!page.is_consistent());
    }

    #[test]
    fn test_page_from_wire() {
        let page: Page<serde_json::Value> =
            serde_json::from_str(r#"{"items":[],"limit":20,"has_more":false,"next_cursor":null}"#).unwrap();
        assert!(page.is_last());
        assert!(page.is_consistent());
    }
}
