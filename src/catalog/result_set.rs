//! The page of catalog results a surface is currently showing.

use super::model::Track;

/// One loaded page of results. Browse and import keep independent sets;
/// identifiers are only meaningful within the set they came from.
#[derive(Debug, Clone)]
pub struct ResultSet {
    tracks: Vec<Track>,
    page: usize,
    page_size: usize,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            page: 1,
            page_size: 0,
        }
    }
}

impl ResultSet {
    pub fn new(tracks: Vec<Track>, page: usize, page_size: usize) -> Self {
        Self {
            tracks,
            page: page.max(1),
            page_size,
        }
    }

    /// Resolve an identifier within this set. A stale id (from a page that
    /// is no longer displayed) is simply not found.
    pub fn find(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// The API does not report totals reliably; a full page is the only
    /// signal that another page may exist.
    pub fn may_have_next(&self) -> bool {
        !self.tracks.is_empty() && self.tracks.len() == self.page_size
    }
}
