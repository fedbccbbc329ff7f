//! Query clients for mqli.
//!
//! Provides a trait-based interface for running MQL queries, so the shell can
//! be driven by the real API or by canned responses.

mod http;
mod mock;

pub use http::MonitoringClient;
pub use mock::MockQueryClient;

use crate::error::Result;
use crate::monitoring::QueryResponse;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Trait defining the interface for query clients.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Fetches one page of results.
    async fn query_page(&self, query: &str, page_token: Option<&str>) -> Result<QueryResponse>;
}

/// Runs a query to completion, following continuation tokens.
///
/// The descriptor comes from the first page and series from every page are
/// appended in order. Stops after `max_pages` pages.
pub async fn query_all(
    client: &dyn QueryClient,
    query: &str,
    max_pages: usize,
) -> Result<QueryResponse> {
    let max_pages = max_pages.max(1);
    let mut response = client.query_page(query, None).await?;
    log_partial_errors(&response);
    let mut pages = 1;

    while let Some(token) = response.page_token().map(String::from) {
        if pages >= max_pages {
            warn!(
                "Result truncated after {} pages; raise max_pages to fetch more",
                pages
            );
            break;
        }

        debug!("Fetching page {} of query results", pages + 1);
        let page = client.query_page(query, Some(&token)).await?;
        log_partial_errors(&page);
        pages += 1;

        response.time_series_data.extend(page.time_series_data);
        response.partial_errors.extend(page.partial_errors);
        response.next_page_token = page.next_page_token;
    }

    response.next_page_token = None;
    Ok(response)
}

fn log_partial_errors(page: &QueryResponse) {
    for err in &page.partial_errors {
        warn!("Partial error in query response: {}", err);
    }
}
