//! HTTP client for the SerpApi-shaped search provider.
//!
//! Every call goes through [`SerpApiClient::search`], which applies the
//! provider's error convention: an `error` field in an otherwise well-formed
//! response is a terminal failure, never an empty-but-successful page.

use crate::{CollectError, CollectResult};
use reqwest::Url;
use reviewscope_core::{Branch, PlaceInfo, Review, SerpApiSettings};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Request parameter set for one provider call
pub type Params = BTreeMap<String, String>;

/// Pagination descriptor attached to a provider response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    /// Next-page reference (a URL whose query encodes the follow-up request)
    #[serde(default)]
    pub next: Option<String>,
    /// Opaque continuation token
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A consumable continuation point. Only exists when the provider supplied
/// both halves of the pair; a lone reference or a lone token means the
/// result set is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    /// Next-page reference URL
    pub next: String,
    /// Continuation token that travels with it
    pub next_page_token: String,
}

impl Pagination {
    /// The continuation point, if the provider supplied a complete one
    pub fn cursor(&self) -> Option<PageCursor> {
        match (&self.next, &self.next_page_token) {
            (Some(next), Some(token)) if !next.is_empty() && !token.is_empty() => {
                Some(PageCursor {
                    next: next.clone(),
                    next_page_token: token.clone(),
                })
            }
            _ => None,
        }
    }
}

impl PageCursor {
    /// Merge the query parameters embedded in the next-page reference into
    /// `params`, overwriting duplicates. This is how the provider tells the
    /// follow-up call which result cursor to continue from.
    pub fn merge_into(&self, params: &mut Params) -> CollectResult<()> {
        let resolved = parse_reference(&self.next)?;
        for (key, value) in resolved.query_pairs() {
            params.insert(key.into_owned(), value.into_owned());
        }
        Ok(())
    }
}

/// Parse a next-page reference, tolerating both absolute URLs and bare
/// path-and-query fragments.
fn parse_reference(next: &str) -> CollectResult<Url> {
    match Url::parse(next) {
        Ok(url) => Ok(url),
        Err(_) => Url::parse("http://continuation.invalid/")
            .and_then(|base| base.join(next))
            .map_err(|e| {
                CollectError::Provider(format!("malformed next-page reference {:?}: {}", next, e))
            }),
    }
}

/// Place details as the provider shapes them in `place_results`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceResults {
    #[serde(default)]
    title: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    reviews: Option<u64>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    hours: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    place_type: Option<String>,
}

impl PlaceResults {
    fn into_place_info(self, place_id: &str) -> PlaceInfo {
        PlaceInfo {
            place_id: place_id.to_string(),
            title: self.title,
            address: self.address,
            rating: self.rating,
            reviews_count: self.reviews,
            phone: self.phone,
            website: self.website,
            hours: self.hours,
            place_type: self.place_type,
        }
    }
}

/// One provider response, covering the result shapes the pipelines read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Provider-reported error; presence is a terminal failure
    #[serde(default)]
    pub error: Option<String>,
    /// Place details (place-lookup queries)
    #[serde(default)]
    pub place_results: Option<PlaceResults>,
    /// Search hits (branch-search queries)
    #[serde(default)]
    pub local_results: Vec<Branch>,
    /// Review records (review queries)
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Continuation descriptor
    #[serde(default)]
    pub serpapi_pagination: Pagination,
}

/// Client for the search/place provider. Holds the settings read-only for
/// the life of the process.
pub struct SerpApiClient {
    settings: SerpApiSettings,
    http: reqwest::Client,
}

impl SerpApiClient {
    /// Create a client from provider settings
    pub fn new(settings: SerpApiSettings) -> CollectResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { settings, http })
    }

    /// Starting parameter set for a query against the given engine
    pub fn base_params(&self, engine: &str) -> Params {
        let mut params = Params::new();
        params.insert("engine".to_string(), engine.to_string());
        params.insert("api_key".to_string(), self.settings.api_key.clone());
        params.insert("hl".to_string(), self.settings.language.clone());
        params
    }

    /// Review sort order from the settings
    pub fn sort_by(&self) -> &str {
        &self.settings.sort_by
    }

    /// Issue one provider request with the given parameter set.
    ///
    /// Fails on transport errors, non-success statuses, and on a provider
    /// `error` field in the response body.
    pub async fn search(&self, params: &Params) -> CollectResult<SearchResponse> {
        let url = format!("{}/search.json", self.settings.base_url);
        tracing::debug!(
            engine = params.get("engine").map(String::as_str).unwrap_or("?"),
            "issuing provider request"
        );

        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollectError::Provider(format!(
                "provider returned {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        if let Some(error) = parsed.error {
            return Err(CollectError::Provider(error));
        }
        Ok(parsed)
    }

    /// Validate the API key with a minimal test query
    pub async fn validate_key(&self) -> CollectResult<()> {
        let mut params = self.base_params("google_maps");
        params.insert("q".to_string(), "Test".to_string());
        self.search(&params).await?;
        Ok(())
    }

    /// Retrieve basic place information for a place ID. Returns `None` when
    /// the provider has no `place_results` for the ID.
    pub async fn place_info(&self, place_id: &str) -> CollectResult<Option<PlaceInfo>> {
        if place_id.trim().is_empty() {
            return Err(CollectError::Input("place_id must not be empty".to_string()));
        }
        let mut params = self.base_params("google_maps");
        params.insert("place_id".to_string(), place_id.to_string());

        let response = self.search(&params).await?;
        Ok(response
            .place_results
            .filter(|place| !place.title.is_empty())
            .map(|place| place.into_place_info(place_id)))
    }

    /// Search for places matching a free-text query, optionally biased to a
    /// latitude/longitude
    pub async fn search_places(
        &self,
        query: &str,
        location_ll: Option<&str>,
    ) -> CollectResult<Vec<Branch>> {
        let mut params = self.base_params("google_maps");
        params.insert("q".to_string(), query.to_string());
        params.insert("type".to_string(), "search".to_string());
        if let Some(ll) = location_ll {
            params.insert("ll".to_string(), ll.to_string());
        }

        let response = self.search(&params).await?;
        Ok(response.local_results)
    }
}
