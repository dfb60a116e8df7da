use std::path::PathBuf;

use serde::Deserialize;

use crate::catalog::Order;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/aria/config.toml` or `~/.config/aria/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ARIA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub player: PlayerSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings::default(),
            player: PlayerSettings::default(),
            library: LibrarySettings::default(),
            ui: UiSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Base URL of the catalog API.
    pub base_url: String,
    /// Application client id. Fetches are disabled while this is empty;
    /// get one at <https://devportal.jamendo.com/>.
    pub client_id: String,
    /// Results per page (1..=200, the API maximum).
    pub page_size: usize,
    /// Encoding requested for the playable stream (`mp31`, `mp32`, `ogg`, `flac`).
    pub audio_format: String,
    /// Ordering applied to the initial fetch of both surfaces.
    pub default_order: OrderSetting,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.jamendo.com/v3.0".to_string(),
            client_id: String::new(),
            page_size: 20,
            audio_format: "mp32".to_string(),
            default_order: OrderSetting::Popular,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Playback volume (0.0..=1.0).
    pub volume: f32,
    /// Progress ticker interval in milliseconds (>= 10).
    pub tick_interval_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            tick_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Where imported songs are stored. Defaults to
    /// `$XDG_DATA_HOME/aria/songs.json` when unset.
    pub path: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self { path: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top "aria" header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ aria: listen first, import second ~ ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderSetting {
    #[serde(alias = "default")]
    Relevance,
    #[serde(alias = "popularity", alias = "popularity_total")]
    Popular,
    #[serde(alias = "newest", alias = "releasedate_desc")]
    Latest,
}

impl From<OrderSetting> for Order {
    fn from(setting: OrderSetting) -> Self {
        match setting {
            OrderSetting::Relevance => Order::Relevance,
            OrderSetting::Popular => Order::Popular,
            OrderSetting::Latest => Order::Latest,
        }
    }
}
