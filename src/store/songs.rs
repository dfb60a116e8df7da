use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Track;

const EXTERNAL_SOURCE: &str = "jamendo";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read song library {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write song library {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("song library {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode song library: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One imported song. Keeps the catalog identity so re-imports can be
/// detected and the source attributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u64>,
    pub audio_url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
    pub external_source: String,
    pub external_id: String,
}

impl Song {
    pub fn from_track(track: &Track) -> Self {
        Self {
            title: track.title().to_string(),
            artist: track.artist_label().to_string(),
            album: track.album.clone(),
            duration_secs: track.duration.map(|d| d.as_secs()),
            audio_url: track.audio_url.clone(),
            image_url: track.image_url.clone(),
            license_url: track.license_url.clone(),
            genre: track.genres.first().cloned(),
            lyrics: track.lyrics.clone(),
            external_source: EXTERNAL_SOURCE.to_string(),
            external_id: track.id.clone(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Added,
    Duplicate,
}

/// JSON-backed song collection. Loaded once at startup and rewritten after
/// every successful import.
#[derive(Debug)]
pub struct SongLibrary {
    path: PathBuf,
    songs: Vec<Song>,
}

impl SongLibrary {
    /// Load the library at `path`. A missing file is an empty library.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let songs = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        Ok(Self { path, songs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// True when a song imported from the same catalog id already exists.
    pub fn contains(&self, external_id: &str) -> bool {
        self.songs
            .iter()
            .any(|s| s.external_source == EXTERNAL_SOURCE && s.external_id == external_id)
    }

    /// Import `track`, deduplicating on its catalog identity. The file is
    /// rewritten on success; a failed write rolls the in-memory set back.
    pub fn import(&mut self, track: &Track) -> Result<ImportOutcome, StoreError> {
        if self.contains(&track.id) {
            return Ok(ImportOutcome::Duplicate);
        }

        self.songs.push(Song::from_track(track));
        if let Err(e) = self.save() {
            self.songs.pop();
            return Err(e);
        }
        Ok(ImportOutcome::Added)
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let raw = serde_json::to_string_pretty(&self.songs)?;
        fs::write(&self.path, raw).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
