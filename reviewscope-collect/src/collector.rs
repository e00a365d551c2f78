//! Pagination-following review collection.
//!
//! The provider exposes reviews only in bounded pages joined by opaque
//! continuation tokens. The collector drives the fetch page -> extract
//! continuation -> follow or stop loop until the descriptor runs dry,
//! appending every page's results in retrieval order.

use crate::client::{Params, SerpApiClient};
use crate::CollectResult;
use reviewscope_core::Review;

/// Drives complete review collection for one place.
///
/// Collection is all-or-nothing: a provider error on any page aborts the
/// whole run with nothing returned, and no page is retried. The collector
/// holds no state across calls; callers that need resumability must persist
/// the collected reviews and the last cursor themselves.
pub struct ReviewCollector {
    client: SerpApiClient,
}

impl ReviewCollector {
    /// Create a collector over an existing provider client
    pub fn new(client: SerpApiClient) -> Self {
        Self { client }
    }

    /// The underlying provider client
    pub fn client(&self) -> &SerpApiClient {
        &self.client
    }

    /// Fetch every available review for the place, in retrieval order.
    ///
    /// Issues exactly one request per page. Continues only while the
    /// response carries a complete continuation pair; when it does, the
    /// query parameters embedded in the next-page reference are merged into
    /// the next request's parameters, overwriting duplicates.
    pub async fn collect(&self, place_id: &str) -> CollectResult<Vec<Review>> {
        let mut params = self.initial_params(place_id);
        let mut reviews: Vec<Review> = Vec::new();
        let mut page = 0usize;

        loop {
            let response = self.client.search(&params).await?;
            page += 1;
            tracing::debug!(page, new = response.reviews.len(), "collected review page");
            reviews.extend(response.reviews);

            match response.serpapi_pagination.cursor() {
                Some(cursor) => cursor.merge_into(&mut params)?,
                None => break,
            }
        }

        tracing::info!(place_id, pages = page, total = reviews.len(), "review collection finished");
        Ok(reviews)
    }

    fn initial_params(&self, place_id: &str) -> Params {
        let mut params = self.client.base_params("google_maps_reviews");
        params.insert("place_id".to_string(), place_id.to_string());
        params.insert("sort_by".to_string(), self.client.sort_by().to_string());
        params
    }
}
