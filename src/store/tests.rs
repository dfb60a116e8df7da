use std::fs;
use std::time::Duration;

use crate::catalog::Track;

use super::*;

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: Some(format!("Track {id}")),
        artist: Some("Artist".to_string()),
        album: Some("Album".to_string()),
        duration: Some(Duration::from_secs(183)),
        audio_url: format!("https://cdn.example.org/{id}.mp3"),
        image_url: Some("https://cdn.example.org/cover.jpg".to_string()),
        license_url: Some("https://creativecommons.org/licenses/by-sa/3.0/".to_string()),
        share_url: None,
        release_date: Some("2024-03-01".to_string()),
        genres: vec!["electronic".to_string(), "ambient".to_string()],
        lyrics: None,
    }
}

#[test]
fn open_without_a_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let library = SongLibrary::open(dir.path().join("songs.json")).unwrap();
    assert!(library.is_empty());
    assert!(!library.contains("1234"));
}

#[test]
fn import_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.json");

    let mut library = SongLibrary::open(&path).unwrap();
    let outcome = library.import(&track("1234")).unwrap();
    assert_eq!(outcome, ImportOutcome::Added);
    assert!(library.contains("1234"));
    assert_eq!(library.len(), 1);

    let reloaded = SongLibrary::open(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    let song = &reloaded.songs()[0];
    assert_eq!(song.title, "Track 1234");
    assert_eq!(song.artist, "Artist");
    assert_eq!(song.duration_secs, Some(183));
    assert_eq!(song.external_source, "jamendo");
    assert_eq!(song.external_id, "1234");
    // Only the first genre is kept.
    assert_eq!(song.genre.as_deref(), Some("electronic"));
}

#[test]
fn reimport_is_a_duplicate_not_a_second_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.json");

    let mut library = SongLibrary::open(&path).unwrap();
    assert_eq!(library.import(&track("1234")).unwrap(), ImportOutcome::Added);
    assert_eq!(
        library.import(&track("1234")).unwrap(),
        ImportOutcome::Duplicate
    );
    assert_eq!(library.len(), 1);

    let reloaded = SongLibrary::open(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn imports_create_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aria").join("songs.json");

    let mut library = SongLibrary::open(&path).unwrap();
    library.import(&track("1")).unwrap();
    assert!(path.exists());
}

#[test]
fn malformed_library_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.json");
    fs::write(&path, "{ not json").unwrap();

    let err = SongLibrary::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Malformed { .. }));
    assert!(err.to_string().contains("songs.json"));
}

#[test]
fn failed_write_rolls_the_library_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.json");

    let mut library = SongLibrary::open(&path).unwrap();
    library.import(&track("1")).unwrap();

    // Turn the library path into a directory so the next save fails.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    let err = library.import(&track("2")).unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }));
    assert_eq!(library.len(), 1);
    assert!(!library.contains("2"));
}

#[test]
fn song_from_track_resolves_placeholders() {
    let mut bare = track("9");
    bare.name = None;
    bare.artist = None;
    bare.genres.clear();
    bare.duration = None;

    let song = Song::from_track(&bare);
    assert_eq!(song.title, "Unknown Track");
    assert_eq!(song.artist, "Unknown Artist");
    assert_eq!(song.genre, None);
    assert_eq!(song.duration_secs, None);
}
