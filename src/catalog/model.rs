//! Catalog track model and the wire records it is built from.
//!
//! `Track` is the immutable value the rest of the crate works with;
//! `TrackRecord` mirrors the Jamendo field shape and only exists long
//! enough to be converted.

use std::time::Duration;

use serde::Deserialize;

/// A single catalog track. Immutable once fetched; display fields may be
/// absent and are resolved to placeholders at render time.
#[derive(Debug, Clone)]
pub struct Track {
    /// Opaque catalog identifier, unique within a result set.
    pub id: String,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Nominal duration as reported by the catalog; `None` when unknown.
    pub duration: Option<Duration>,
    /// Locator of the playable resource.
    pub audio_url: String,
    pub image_url: Option<String>,
    pub license_url: Option<String>,
    pub share_url: Option<String>,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub lyrics: Option<String>,
}

impl Track {
    /// Track name, or a fixed placeholder when the catalog left it empty.
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Track")
    }

    /// Artist name, or a fixed placeholder when the catalog left it empty.
    pub fn artist_label(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown Artist")
    }

    pub fn display(&self) -> String {
        format!("{} - {}", self.artist_label(), self.title())
    }
}

/// Result ordering understood by the catalog API.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Order {
    /// The API's own default ranking; no `order` parameter is sent.
    Relevance,
    Popular,
    Latest,
}

impl Default for Order {
    fn default() -> Self {
        Self::Relevance
    }
}

impl Order {
    /// The `order` query parameter value, or `None` for the API default.
    pub fn api_value(self) -> Option<&'static str> {
        match self {
            Order::Relevance => None,
            Order::Popular => Some("popularity_total"),
            Order::Latest => Some("releasedate_desc"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Order::Relevance => "relevance",
            Order::Popular => "popular",
            Order::Latest => "latest",
        }
    }

    /// Cycle `relevance -> popular -> latest`.
    pub fn next(self) -> Self {
        match self {
            Order::Relevance => Order::Popular,
            Order::Popular => Order::Latest,
            Order::Latest => Order::Relevance,
        }
    }
}

/// Convert an empty or whitespace-only string to None.
fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TrackRecord {
    pub(super) id: String,
    #[serde(default)]
    pub(super) name: String,
    /// Seconds; the catalog reports 0 when unknown.
    #[serde(default)]
    pub(super) duration: u64,
    #[serde(default)]
    pub(super) artist_name: String,
    #[serde(default)]
    pub(super) album_name: String,
    #[serde(default)]
    pub(super) license_ccurl: String,
    #[serde(default)]
    pub(super) image: String,
    #[serde(default)]
    pub(super) audio: String,
    #[serde(default)]
    pub(super) audiodownload: String,
    #[serde(default)]
    pub(super) shareurl: String,
    #[serde(default)]
    pub(super) releasedate: String,
    #[serde(default)]
    pub(super) lyrics: String,
    #[serde(default)]
    pub(super) musicinfo: MusicInfo,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MusicInfo {
    #[serde(default)]
    pub(super) tags: MusicTags,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MusicTags {
    #[serde(default)]
    pub(super) genres: Vec<String>,
}

impl From<TrackRecord> for Track {
    fn from(rec: TrackRecord) -> Self {
        // Prefer the streaming URL, fall back to the download URL.
        let audio_url = if rec.audio.trim().is_empty() {
            rec.audiodownload.trim().to_string()
        } else {
            rec.audio.trim().to_string()
        };

        let duration = if rec.duration == 0 {
            None
        } else {
            Some(Duration::from_secs(rec.duration))
        };

        let genres: Vec<String> = rec
            .musicinfo
            .tags
            .genres
            .iter()
            .filter_map(|g| non_empty(g))
            .collect();

        Track {
            id: rec.id,
            name: non_empty(&rec.name),
            artist: non_empty(&rec.artist_name),
            album: non_empty(&rec.album_name),
            duration,
            audio_url,
            image_url: non_empty(&rec.image),
            license_url: non_empty(&rec.license_ccurl),
            share_url: non_empty(&rec.shareurl),
            release_date: non_empty(&rec.releasedate),
            genres,
            lyrics: non_empty(&rec.lyrics),
        }
    }
}
