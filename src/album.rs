//! Photoset payloads as Flickr returns them and the trimmed album records we
//! hand back to callers.

use serde::{Deserialize, Serialize};

/// Photo counts arrive as strings from `flickr.photosets.getList` but as
/// numbers from some other endpoints; either is copied through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhotoCount {
    Text(String),
    Number(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub photos: PhotoCount,
    pub thumbnail_url: String,
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotosetListResponse {
    pub stat: String,
    #[serde(default)]
    pub photosets: Option<Photosets>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photosets {
    #[serde(default)]
    pub photoset: Vec<RawPhotoset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPhotoset {
    pub id: String,
    pub photos: PhotoCount,
    pub title: Content,
    pub primary_photo_extras: PrimaryPhotoExtras,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(rename = "_content")]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryPhotoExtras {
    pub url_q: String,
}

impl PhotosetListResponse {
    pub fn is_ok(&self) -> bool {
        self.stat == "ok"
    }

    /// Maps every raw photoset to an album record, preserving order.
    ///
    /// Returns `None` when `stat` is not `"ok"` or the `photosets` envelope is
    /// absent.
    pub fn into_albums(self) -> Option<Vec<AlbumRecord>> {
        if !self.is_ok() {
            return None;
        }
        let photosets = self.photosets?;
        Some(
            photosets
                .photoset
                .into_iter()
                .map(AlbumRecord::from)
                .collect(),
        )
    }
}

impl From<RawPhotoset> for AlbumRecord {
    fn from(raw: RawPhotoset) -> Self {
        Self {
            photos: raw.photos,
            thumbnail_url: raw.primary_photo_extras.url_q,
            id: raw.id,
            title: raw.title.content,
        }
    }
}
