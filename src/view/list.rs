use std::time::Duration;

use crate::catalog::ResultSet;
use crate::player::PlaybackSession;
use crate::store::SongLibrary;

/// Everything a surface needs to draw one result row.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    /// Nominal track length, `--:--` when the catalog does not know it.
    pub duration_label: String,
    /// This row is the session's current track.
    pub active: bool,
    pub playing: bool,
    /// Fraction played, 0.0 while the duration is unknown.
    pub progress: f64,
    /// `elapsed / total`, only present on the active row.
    pub time_label: Option<String>,
    pub imported: bool,
}

/// Project one result page against the live session and the local library.
pub fn track_rows(
    results: &ResultSet,
    session: &PlaybackSession,
    library: &SongLibrary,
) -> Vec<TrackRow> {
    results
        .tracks()
        .iter()
        .map(|track| {
            let active = session.is_current(&track.id);
            let time_label = if active {
                let total = session.duration().or(track.duration);
                Some(format!(
                    "{} / {}",
                    format_mmss(Some(session.position())),
                    format_mmss(total)
                ))
            } else {
                None
            };

            TrackRow {
                id: track.id.clone(),
                title: track.title().to_string(),
                artist: track.artist_label().to_string(),
                album: track.album.clone(),
                duration_label: format_mmss(track.duration),
                active,
                playing: active && session.is_playing(),
                progress: if active { progress_fraction(session) } else { 0.0 },
                time_label,
                imported: library.contains(&track.id),
            }
        })
        .collect()
}

/// `position / duration`, or 0.0 while the duration is unknown.
pub fn progress_fraction(session: &PlaybackSession) -> f64 {
    match session.duration() {
        Some(duration) => {
            (session.position().as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
        }
        None => 0.0,
    }
}

/// Format a duration as `mm:ss`, or `--:--` when unknown.
pub fn format_mmss(duration: Option<Duration>) -> String {
    match duration {
        Some(duration) => {
            let secs = duration.as_secs();
            format!("{:02}:{:02}", secs / 60, secs % 60)
        }
        None => "--:--".to_string(),
    }
}

/// Render `fraction` as a fixed-width bar.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = ((fraction * width as f64).round() as usize).min(width);

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..width {
        bar.push('─');
    }
    bar
}
