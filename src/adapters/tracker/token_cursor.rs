//! Token-cursor fetch strategy (the tracker's newer search API).
//!
//! Search pages return only issue ids, so every issue costs one extra detail
//! request. A failed detail request drops that issue and the fetch carries
//! on; a failed search request fails the whole strategy.

use async_trait::async_trait;
use std::sync::Arc;

use super::events::{FetchEventCallback, IssueSkipped, NoOpEventCallback};
use super::executor::ResilientExecutor;
use super::wire::{
    decode, TokenPage, TrackerEndpoints, WireIssue, CHANGELOG_EXPAND, ISSUE_FIELDS,
};
use crate::domain::issue::IssueSnapshot;
use crate::ports::{FetchError, HttpRequest, IssueQuery, IssueSource};

/// Largest page the search endpoint accepts.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Fetches issues through `/rest/api/3/search/jql`.
pub struct TokenCursorSource {
    executor: Arc<ResilientExecutor>,
    endpoints: TrackerEndpoints,
    page_size: usize,
    callback: Arc<dyn FetchEventCallback>,
}

impl TokenCursorSource {
    pub fn new(executor: Arc<ResilientExecutor>, endpoints: TrackerEndpoints) -> Self {
        Self {
            executor,
            endpoints,
            page_size: DEFAULT_PAGE_SIZE,
            callback: Arc::new(NoOpEventCallback),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_event_callback(mut self, callback: Arc<dyn FetchEventCallback>) -> Self {
        self.callback = callback;
        self
    }

    fn search_request(&self, jql: &str, page_size: usize, token: Option<&str>) -> HttpRequest {
        let request = HttpRequest::get(self.endpoints.search_jql())
            .with_param("jql", jql)
            .with_param("maxResults", page_size)
            .with_param("expand", CHANGELOG_EXPAND)
            .with_param("fields", ISSUE_FIELDS);
        match token {
            Some(token) => request.with_param("nextPageToken", token),
            None => request,
        }
    }

    async fn fetch_detail(&self, id: &str) -> Result<IssueSnapshot, FetchError> {
        let request = HttpRequest::get(self.endpoints.issue(id))
            .with_param("expand", CHANGELOG_EXPAND)
            .with_param("fields", ISSUE_FIELDS);
        let value = self.executor.execute(&request).await?;
        let wire: WireIssue = decode(value, "issue detail")?;
        Ok(wire.into())
    }
}

#[async_trait]
impl IssueSource for TokenCursorSource {
    async fn fetch(&self, query: &IssueQuery) -> Result<Vec<IssueSnapshot>, FetchError> {
        let mut issues = Vec::new();
        let mut token: Option<String> = None;

        while issues.len() < query.max_results {
            let page_size = (query.max_results - issues.len()).min(self.page_size);
            let request = self.search_request(&query.jql, page_size, token.as_deref());

            let value = self.executor.execute(&request).await?;
            let page: TokenPage = decode(value, "search page")?;
            let page_len = page.issues.len();

            for issue_ref in &page.issues {
                if issues.len() >= query.max_results {
                    break;
                }
                match self.fetch_detail(&issue_ref.id).await {
                    Ok(snapshot) => issues.push(snapshot),
                    Err(e) => {
                        tracing::warn!("Skipping issue {}: {}", issue_ref.id, e);
                        self.callback
                            .on_issue_skipped(IssueSkipped::new(issue_ref.id.clone(), e.to_string()));
                    }
                }
            }

            tracing::info!(
                "Fetched {} issues so far ({} on this page)",
                issues.len(),
                page_len
            );

            if page_len == 0 || page.is_final() {
                break;
            }
            token = page.next_page_token;
        }

        Ok(issues)
    }

    fn name(&self) -> &'static str {
        "token_cursor"
    }
}
