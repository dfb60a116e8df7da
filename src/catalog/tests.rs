use std::time::Duration;

use super::client::{CatalogClient, TrackEnvelope, TrackQuery};
use super::model::{Order, Track, TrackRecord};
use super::result_set::ResultSet;
use crate::config::CatalogSettings;

fn track(id: &str) -> Track {
    Track {
        id: id.into(),
        name: Some(format!("Track {id}")),
        artist: Some("Artist".into()),
        album: None,
        duration: Some(Duration::from_secs(60)),
        audio_url: format!("https://cdn.example.com/{id}.mp3"),
        image_url: None,
        license_url: None,
        share_url: None,
        release_date: None,
        genres: Vec::new(),
        lyrics: None,
    }
}

fn client_with_id(id: &str) -> CatalogClient {
    let settings = CatalogSettings {
        client_id: id.to_string(),
        ..CatalogSettings::default()
    };
    CatalogClient::new(&settings).unwrap()
}

#[test]
fn order_api_values_and_cycle() {
    assert_eq!(Order::Relevance.api_value(), None);
    assert_eq!(Order::Popular.api_value(), Some("popularity_total"));
    assert_eq!(Order::Latest.api_value(), Some("releasedate_desc"));

    assert_eq!(Order::Relevance.next(), Order::Popular);
    assert_eq!(Order::Popular.next(), Order::Latest);
    assert_eq!(Order::Latest.next(), Order::Relevance);
}

#[test]
fn track_display_falls_back_to_placeholders() {
    let mut t = track("1");
    t.name = None;
    t.artist = None;
    assert_eq!(t.title(), "Unknown Track");
    assert_eq!(t.artist_label(), "Unknown Artist");
    assert_eq!(t.display(), "Unknown Artist - Unknown Track");

    t.name = Some("Aria".into());
    t.artist = Some("Ensemble".into());
    assert_eq!(t.display(), "Ensemble - Aria");
}

#[test]
fn record_conversion_maps_blanks_and_zero_duration_to_none() {
    let json = r#"{
        "id": "42",
        "name": "  ",
        "duration": 0,
        "artist_name": "",
        "album_name": "Album",
        "audio": "",
        "audiodownload": "https://cdn.example.com/42.mp3",
        "musicinfo": {"tags": {"genres": ["pop", " ", "rock"]}}
    }"#;
    let rec: TrackRecord = serde_json::from_str(json).unwrap();
    let t = Track::from(rec);

    assert_eq!(t.id, "42");
    assert_eq!(t.name, None);
    assert_eq!(t.artist, None);
    assert_eq!(t.album.as_deref(), Some("Album"));
    assert_eq!(t.duration, None);
    // Empty streaming URL falls back to the download URL.
    assert_eq!(t.audio_url, "https://cdn.example.com/42.mp3");
    assert_eq!(t.genres, vec!["pop".to_string(), "rock".to_string()]);
}

#[test]
fn record_conversion_prefers_streaming_url_and_keeps_duration() {
    let json = r#"{
        "id": "7",
        "name": "Song",
        "duration": 183,
        "artist_name": "Band",
        "audio": "https://stream.example.com/7?format=mp32",
        "audiodownload": "https://cdn.example.com/7.mp3"
    }"#;
    let rec: TrackRecord = serde_json::from_str(json).unwrap();
    let t = Track::from(rec);

    assert_eq!(t.duration, Some(Duration::from_secs(183)));
    assert_eq!(t.audio_url, "https://stream.example.com/7?format=mp32");
}

#[test]
fn envelope_parses_success_payload_with_unknown_fields() {
    let json = r#"{
        "headers": {
            "status": "success",
            "code": 0,
            "error_message": "",
            "results_count": 1
        },
        "results": [
            {
                "id": "168",
                "name": "J'm'e FPM",
                "duration": 183,
                "artist_id": "7",
                "artist_name": "TriFace",
                "album_name": "Premiers Jets",
                "license_ccurl": "http://creativecommons.org/licenses/by-nc-sa/3.0/",
                "image": "https://usercontent.example.com?type=album&id=24",
                "audio": "https://stream.example.com/?trackid=168&format=mp32",
                "audiodownload": "https://cdn.example.com/track/168/mp32/",
                "shareurl": "https://www.example.com/track/168",
                "releasedate": "2004-12-17",
                "musicinfo": {
                    "vocalinstrumental": "vocal",
                    "tags": {"genres": ["pop"], "instruments": [], "vartags": ["engage"]}
                }
            }
        ]
    }"#;
    let envelope: TrackEnvelope = serde_json::from_str(json).unwrap();

    assert_eq!(envelope.headers.status, "success");
    assert_eq!(envelope.results.len(), 1);
    let t = Track::from(envelope.results.into_iter().next().unwrap());
    assert_eq!(t.title(), "J'm'e FPM");
    assert_eq!(t.artist_label(), "TriFace");
    assert_eq!(t.release_date.as_deref(), Some("2004-12-17"));
}

#[test]
fn envelope_parses_error_payload() {
    let json = r#"{
        "headers": {"status": "failed", "code": 5, "error_message": "Suspended application"},
        "results": []
    }"#;
    let envelope: TrackEnvelope = serde_json::from_str(json).unwrap();
    assert_eq!(envelope.headers.status, "failed");
    assert_eq!(envelope.headers.error_message, "Suspended application");
    assert!(envelope.results.is_empty());
}

#[test]
fn query_params_cover_pagination_and_optional_filters() {
    let client = client_with_id("abc123");

    let mut query = TrackQuery::new(Order::Popular, 3, 20);
    query.search = Some("  vivaldi  ".into());
    query.tags = Some("classical".into());

    let params = client.query_params(&query);
    let find = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(find("client_id"), Some("abc123"));
    assert_eq!(find("format"), Some("json"));
    assert_eq!(find("limit"), Some("20"));
    assert_eq!(find("offset"), Some("40"));
    assert_eq!(find("audioformat"), Some("mp32"));
    assert_eq!(find("include"), Some("musicinfo"));
    assert_eq!(find("search"), Some("vivaldi"));
    assert_eq!(find("tags"), Some("classical"));
    assert_eq!(find("fuzzytags"), None);
    assert_eq!(find("order"), Some("popularity_total"));
}

#[test]
fn query_params_omit_order_for_relevance_and_blank_search() {
    let client = client_with_id("abc123");

    let mut query = TrackQuery::new(Order::Relevance, 1, 20);
    query.search = Some("   ".into());

    let params = client.query_params(&query);
    assert!(params.iter().all(|(k, _)| k != "order"));
    assert!(params.iter().all(|(k, _)| k != "search"));
    assert_eq!(
        params.iter().find(|(k, _)| k == "offset").map(|(_, v)| v.as_str()),
        Some("0")
    );
}

#[test]
fn fetch_without_client_id_fails_before_any_request() {
    let client = client_with_id("");
    let query = TrackQuery::new(Order::Popular, 1, 20);
    let err = client.fetch(&query).unwrap_err();
    assert!(matches!(err, super::client::ClientError::MissingClientId));
}

#[test]
fn result_set_finds_ids_only_in_current_page() {
    let set = ResultSet::new(vec![track("a"), track("b")], 2, 2);

    assert!(set.find("a").is_some());
    assert!(set.find("missing").is_none());
    assert_eq!(set.len(), 2);
    assert_eq!(set.page(), 2);
    assert!(set.has_prev());
    // Full page: another page may exist.
    assert!(set.may_have_next());
}

#[test]
fn result_set_partial_or_empty_page_has_no_next() {
    let partial = ResultSet::new(vec![track("a")], 1, 20);
    assert!(!partial.has_prev());
    assert!(!partial.may_have_next());

    let empty = ResultSet::default();
    assert!(empty.is_empty());
    assert!(!empty.may_have_next());
    assert_eq!(empty.page(), 1);
}
