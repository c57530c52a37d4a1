//! Offset fetch strategy (the tracker's older search API).
//!
//! Pages already carry full issues with changelogs, so no detail requests
//! are needed.

use async_trait::async_trait;
use std::sync::Arc;

use super::executor::ResilientExecutor;
use super::token_cursor::DEFAULT_PAGE_SIZE;
use super::wire::{decode, OffsetPage, TrackerEndpoints, CHANGELOG_EXPAND, ISSUE_FIELDS};
use crate::domain::issue::IssueSnapshot;
use crate::ports::{FetchError, HttpRequest, IssueQuery, IssueSource};

/// Fetches issues through `/rest/api/3/search` with `startAt` paging.
pub struct OffsetSource {
    executor: Arc<ResilientExecutor>,
    endpoints: TrackerEndpoints,
    page_size: usize,
}

impl OffsetSource {
    pub fn new(executor: Arc<ResilientExecutor>, endpoints: TrackerEndpoints) -> Self {
        Self {
            executor,
            endpoints,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[async_trait]
impl IssueSource for OffsetSource {
    async fn fetch(&self, query: &IssueQuery) -> Result<Vec<IssueSnapshot>, FetchError> {
        let mut issues: Vec<IssueSnapshot> = Vec::new();
        let mut start_at = 0usize;

        while issues.len() < query.max_results {
            let remaining = query.max_results - issues.len();
            let request = HttpRequest::get(self.endpoints.search())
                .with_param("jql", &query.jql)
                .with_param("maxResults", remaining.min(self.page_size))
                .with_param("startAt", start_at)
                .with_param("expand", CHANGELOG_EXPAND)
                .with_param("fields", ISSUE_FIELDS);

            let value = self.executor.execute(&request).await?;
            let page: OffsetPage = decode(value, "search page")?;
            let page_len = page.issues.len();

            issues.extend(page.issues.into_iter().take(remaining).map(IssueSnapshot::from));
            tracing::info!("Fetched {} of {} issues", issues.len(), page.total);

            if page_len == 0 || page.total <= issues.len() {
                break;
            }
            start_at += page_len;
        }

        Ok(issues)
    }

    fn name(&self) -> &'static str {
        "offset"
    }
}
