//! Provider review records, place metadata and the persisted collection
//! document.
//!
//! Review records stay deliberately loose: the provider defines the field set,
//! so anything beyond the handful of fields the pipelines read is preserved
//! verbatim in `extra` rather than dropped.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Basic information about a place, as returned by the place-lookup call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaceInfo {
    /// Provider place identifier
    pub place_id: String,
    /// Display name of the place
    #[serde(default)]
    pub title: String,
    /// Street address
    #[serde(default)]
    pub address: String,
    /// Aggregate star rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// Total review count reported by the provider
    #[serde(default)]
    pub reviews_count: Option<u64>,
    /// Contact phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Website URL
    #[serde(default)]
    pub website: Option<String>,
    /// Opening hours, provider-shaped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<serde_json::Value>,
    /// Place category (e.g. "Restaurant")
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
}

/// Author identity attached to a review
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReviewUser {
    /// Display name of the reviewer
    #[serde(default)]
    pub name: Option<String>,
    /// Profile link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Avatar thumbnail URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// One review record as fetched from the provider.
///
/// Immutable once fetched. Ordering across pages is retrieval order, not
/// guaranteed chronological. Unknown provider fields are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Review {
    /// Star rating given by the reviewer
    #[serde(default)]
    pub rating: Option<f64>,
    /// Review date as the provider formats it (e.g. "2 months ago")
    #[serde(default)]
    pub date: Option<String>,
    /// Free-text review body
    #[serde(default)]
    pub snippet: Option<String>,
    /// Reviewer identity
    #[serde(default)]
    pub user: Option<ReviewUser>,
    /// Like count on the review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    /// Any remaining provider-defined fields, preserved verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Review {
    /// The review body, if present and non-empty
    pub fn text(&self) -> Option<&str> {
        self.snippet.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Compact record for one place returned by a branch search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Branch {
    /// Provider place identifier
    pub place_id: Option<String>,
    /// Display name
    #[serde(default)]
    pub title: String,
    /// Street address
    #[serde(default)]
    pub address: String,
    /// Aggregate star rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// Review count
    #[serde(default)]
    pub reviews: Option<u64>,
}

/// The persisted result of one collection run: place metadata, the ordered
/// review list, and a count. This is the interchange format between the
/// collector and the summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionDocument {
    /// Place the reviews belong to
    pub place_info: PlaceInfo,
    /// Reviews in retrieval order
    pub reviews: Vec<Review>,
    /// Number of reviews collected
    pub total_reviews: usize,
    /// When the collection run finished
    #[serde(default = "chrono::Utc::now")]
    pub collected_at: chrono::DateTime<chrono::Utc>,
}

impl CollectionDocument {
    /// Build a document from a finished collection run
    pub fn new(place_info: PlaceInfo, reviews: Vec<Review>) -> Self {
        let total_reviews = reviews.len();
        Self {
            place_info,
            reviews,
            total_reviews,
            collected_at: chrono::Utc::now(),
        }
    }

    /// Default output file name, derived from the place title
    pub fn file_name(&self) -> String {
        let slug = self
            .place_info
            .title
            .replace([' ', '/'], "_")
            .to_lowercase();
        format!("{}_reviews.json", slug)
    }

    /// Write the document as pretty-printed JSON
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a document back from a JSON file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let doc: Self = serde_json::from_str(&content)?;
        Ok(doc)
    }
}

/// Load collection documents from a JSON file or a directory of JSON files.
///
/// Directories are read in file-name order so repeated runs see the same
/// review ordering.
pub fn load_collection_inputs(path: &Path) -> CoreResult<Vec<CollectionDocument>> {
    if path.is_dir() {
        let mut files: Vec<_> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(CoreError::Input(format!(
                "no .json files found in {}",
                path.display()
            )));
        }

        let mut docs = Vec::with_capacity(files.len());
        for file in &files {
            tracing::debug!(file = %file.display(), "loading collection document");
            docs.push(CollectionDocument::load(file)?);
        }
        Ok(docs)
    } else {
        Ok(vec![CollectionDocument::load(path)?])
    }
}

/// Extract the non-empty review texts from a set of documents, in document
/// order then review order. Fails if no document contributes any text.
pub fn review_texts(docs: &[CollectionDocument]) -> CoreResult<Vec<String>> {
    let texts: Vec<String> = docs
        .iter()
        .flat_map(|doc| doc.reviews.iter())
        .filter_map(|review| review.text().map(str::to_string))
        .collect();

    if texts.is_empty() {
        return Err(CoreError::Input(
            "no review text found in the supplied documents".to_string(),
        ));
    }
    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(snippet: &str) -> Review {
        Review {
            snippet: Some(snippet.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn file_name_is_slug_of_title() {
        let doc = CollectionDocument::new(
            PlaceInfo {
                title: "Honest Restaurant / CG Road".to_string(),
                ..Default::default()
            },
            vec![],
        );
        assert_eq!(doc.file_name(), "honest_restaurant___cg_road_reviews.json");
    }

    #[test]
    fn review_keeps_unknown_provider_fields() {
        let raw = serde_json::json!({
            "rating": 5.0,
            "snippet": "Great food",
            "contributor_id": "abc123",
            "images": ["a.jpg"]
        });
        let parsed: Review = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.text(), Some("Great food"));
        assert_eq!(parsed.extra["contributor_id"], "abc123");

        // Round-trips back out with the opaque fields intact
        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["images"], raw["images"]);
    }

    #[test]
    fn review_texts_skips_blank_and_missing_bodies() {
        let doc = CollectionDocument::new(
            PlaceInfo::default(),
            vec![review("first"), review("   "), Review::default(), review("second")],
        );
        let texts = review_texts(&[doc]).unwrap();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn review_texts_rejects_textless_input() {
        let doc = CollectionDocument::new(PlaceInfo::default(), vec![Review::default()]);
        let err = review_texts(&[doc]).unwrap_err();
        assert!(matches!(err, CoreError::Input(_)));
    }

    #[test]
    fn document_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let doc = CollectionDocument::new(
            PlaceInfo {
                place_id: "ChIJtest".to_string(),
                title: "Test Place".to_string(),
                ..Default::default()
            },
            vec![review("nice"), review("okay")],
        );

        let path = dir.path().join(doc.file_name());
        doc.save(&path).unwrap();

        let loaded = CollectionDocument::load(&path).unwrap();
        assert_eq!(loaded.total_reviews, 2);
        assert_eq!(loaded.place_info.place_id, "ChIJtest");

        let all = load_collection_inputs(dir.path()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].reviews[1].text(), Some("okay"));
    }
}
