//! Persisted record types

use serde::{Deserialize, Serialize};

/// Placeholder written for every field that could not be extracted
pub const NOT_AVAILABLE: &str = "N/A";

/// Column names of the items file, in order
pub const ITEM_COLUMNS: [&str; 19] = [
    "Name",
    "URL",
    "Rating",
    "RatingVotes",
    "Developer",
    "ReleaseDate",
    "LastUpdated",
    "Technology",
    "Platforms",
    "Classification",
    "WikiPages",
    "Iframe",
    "Description",
    "Features",
    "Controls",
    "FAQ",
    "GameplayVideo",
    "HoverVideo",
    "ThumbnailURL",
];

/// Column names of the tags file, in order
pub const TAG_COLUMNS: [&str; 4] = ["Group", "Tag Name", "Tag Count", "Tag URL"];

/// Returns the trimmed value, or the sentinel if it is missing or blank
pub fn or_not_available(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// One extracted game, as written to the items file
///
/// Field order is column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Rating")]
    pub rating: String,
    #[serde(rename = "RatingVotes")]
    pub rating_votes: String,
    #[serde(rename = "Developer")]
    pub developer: String,
    #[serde(rename = "ReleaseDate")]
    pub release_date: String,
    #[serde(rename = "LastUpdated")]
    pub last_updated: String,
    #[serde(rename = "Technology")]
    pub technology: String,
    #[serde(rename = "Platforms")]
    pub platforms: String,
    #[serde(rename = "Classification")]
    pub classification: String,
    #[serde(rename = "WikiPages")]
    pub wiki_pages: String,
    #[serde(rename = "Iframe")]
    pub iframe: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Features")]
    pub features: String,
    #[serde(rename = "Controls")]
    pub controls: String,
    #[serde(rename = "FAQ")]
    pub faq: String,
    #[serde(rename = "GameplayVideo")]
    pub gameplay_video: String,
    #[serde(rename = "HoverVideo")]
    pub hover_video: String,
    #[serde(rename = "ThumbnailURL")]
    pub thumbnail_url: String,
}

impl Default for ItemRecord {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            name: na(),
            url: na(),
            rating: na(),
            rating_votes: na(),
            developer: na(),
            release_date: na(),
            last_updated: na(),
            technology: na(),
            platforms: na(),
            classification: na(),
            wiki_pages: na(),
            iframe: na(),
            description: na(),
            features: na(),
            controls: na(),
            faq: na(),
            gameplay_video: na(),
            hover_video: na(),
            thumbnail_url: na(),
        }
    }
}

impl ItemRecord {
    /// All field values in column order
    pub fn fields(&self) -> [&str; 19] {
        [
            &self.name,
            &self.url,
            &self.rating,
            &self.rating_votes,
            &self.developer,
            &self.release_date,
            &self.last_updated,
            &self.technology,
            &self.platforms,
            &self.classification,
            &self.wiki_pages,
            &self.iframe,
            &self.description,
            &self.features,
            &self.controls,
            &self.faq,
            &self.gameplay_video,
            &self.hover_video,
            &self.thumbnail_url,
        ]
    }

    /// Replaces every blank field with the sentinel
    pub fn fill_missing(&mut self) {
        for field in [
            &mut self.name,
            &mut self.url,
            &mut self.rating,
            &mut self.rating_votes,
            &mut self.developer,
            &mut self.release_date,
            &mut self.last_updated,
            &mut self.technology,
            &mut self.platforms,
            &mut self.classification,
            &mut self.wiki_pages,
            &mut self.iframe,
            &mut self.description,
            &mut self.features,
            &mut self.controls,
            &mut self.faq,
            &mut self.gameplay_video,
            &mut self.hover_video,
            &mut self.thumbnail_url,
        ] {
            if field.trim().is_empty() {
                *field = NOT_AVAILABLE.to_string();
            }
        }
    }
}

/// One tag within a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub name: String,
    pub count: String,
    pub url: String,
}

/// Tags listed under one heading of the tags page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroup {
    pub group: String,
    pub tags: Vec<TagEntry>,
}
