use std::path::PathBuf;

/// Main configuration for a notifier run.
pub struct Config {
    /// Path of the JSON file holding the API key and webhook URL.
    pub credentials_path: PathBuf,
    /// How far ahead to look for releases, in days.
    pub window_days: i64,
    /// Maximum number of games to request from the catalog.
    pub page_size: u32,
    /// Attach a screenshot embed per game (caps the message at 9 games).
    pub include_screenshots: bool,
}

impl Config {
    /// Default configuration: 180-day window, 20 games, digest message.
    pub fn default_upcoming() -> Self {
        Self {
            credentials_path: PathBuf::from("games_discord_config.json"),
            window_days: 180,
            page_size: 20,
            include_screenshots: false,
        }
    }
}
