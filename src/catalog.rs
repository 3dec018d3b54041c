use crate::events::{EventSink, UiEvent};
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const RAWG_API_BASE: &str = "https://api.rawg.io/api";

/// One game from the catalog. Every field the API may omit or null out is
/// optional here; display defaults are applied by the accessors.
#[derive(Debug, Clone, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub platforms: Option<Vec<PlatformEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformEntry {
    #[serde(default)]
    pub platform: Option<PlatformInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformInfo {
    #[serde(default)]
    pub name: String,
}

impl GameRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Title")
    }

    pub fn release_label(&self) -> &str {
        self.released.as_deref().unwrap_or("TBA")
    }

    /// Comma-joined platform names. Empty when the list is absent or null.
    pub fn platform_list(&self) -> String {
        let Some(entries) = &self.platforms else {
            return String::new();
        };
        entries
            .iter()
            .filter_map(|e| e.platform.as_ref())
            .map(|p| p.name.as_str())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Both catalog endpoints wrap their payload in a `results` array.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ResultsPage<T> {
    #[serde(default)]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Screenshot {
    #[serde(default)]
    image: Option<String>,
}

/// Blocking client for the RAWG.io catalog API.
pub struct CatalogClient {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl CatalogClient {
    pub fn new(api_key: String) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build()
            .new_agent();
        Self {
            agent,
            api_key,
            base_url: RAWG_API_BASE.to_string(),
        }
    }

    /// Fetch up to `page_size` games releasing within the next `window_days`
    /// days, ordered by release date ascending. Any transport, status, or
    /// decode failure is reported through `sink` and yields an empty list.
    pub fn fetch_upcoming(
        &self,
        window_days: i64,
        page_size: u32,
        sink: &dyn EventSink,
    ) -> Vec<GameRecord> {
        let url = format!("{}/games", self.base_url);
        let dates = release_window(chrono::Local::now().date_naive(), window_days);
        let query = [
            ("key", self.api_key.as_str()),
            ("dates", dates.as_str()),
            ("ordering", "released"),
            ("page_size", &page_size.to_string()),
        ];

        match self.get_json::<ResultsPage<GameRecord>>(&url, &query) {
            Ok(page) => page.results,
            Err(e) => {
                sink.send(UiEvent::Error(format!(
                    "Error fetching games from RAWG.io: {}",
                    e
                )));
                Vec::new()
            }
        }
    }

    /// First available screenshot URL for a game. Absence is not an error;
    /// failures are reported and collapse to None as well.
    pub fn fetch_screenshot(&self, game_id: i64, sink: &dyn EventSink) -> Option<String> {
        let url = format!("{}/games/{}/screenshots", self.base_url, game_id);
        let query = [("key", self.api_key.as_str())];

        match self.get_json::<ResultsPage<Screenshot>>(&url, &query) {
            Ok(page) => page.results.into_iter().next().and_then(|s| s.image),
            Err(e) => {
                sink.send(UiEvent::Error(format!(
                    "Error fetching screenshot for game {}: {}",
                    game_id, e
                )));
                None
            }
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ureq::Error> {
        let mut req = self.agent.get(url);
        for (key, value) in query {
            req = req.query(*key, *value);
        }
        let mut resp = req.call()?;
        resp.body_mut().read_json::<T>()
    }
}

/// `today,today+window` formatted the way the catalog's `dates` filter wants.
fn release_window(today: NaiveDate, window_days: i64) -> String {
    let until = today + chrono::Duration::days(window_days);
    format!(
        "{},{}",
        today.format("%Y-%m-%d"),
        until.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    struct NullSink;
    impl EventSink for NullSink {
        fn send(&self, _: UiEvent) {}
    }

    /// Serve one canned HTTP response on a loopback port, return the base URL.
    fn serve_once(status_line: &str, body: &str) -> String {
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String) -> CatalogClient {
        CatalogClient {
            agent: ureq::Agent::new_with_defaults(),
            api_key: "test".into(),
            base_url,
        }
    }

    const SAMPLE_PAGE: &str = r#"{
        "count": 2,
        "results": [
            {
                "id": 1,
                "name": "Foo",
                "released": "2025-03-01",
                "platforms": [{"platform": {"id": 4, "name": "PC", "slug": "pc"}}]
            },
            {
                "id": 2,
                "name": "Bar",
                "released": null,
                "platforms": null
            }
        ]
    }"#;

    #[test]
    fn test_fetch_upcoming_parses_results() {
        let base = serve_once("200 OK", SAMPLE_PAGE);
        let games = client(base).fetch_upcoming(180, 20, &NullSink);

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].display_name(), "Foo");
        assert_eq!(games[0].platform_list(), "PC");
        assert_eq!(games[1].release_label(), "TBA");
        assert_eq!(games[1].platform_list(), "");
    }

    #[test]
    fn test_fetch_upcoming_returns_empty_on_http_error() {
        let base = serve_once("500 Internal Server Error", "{}");
        let games = client(base).fetch_upcoming(180, 20, &NullSink);
        assert!(games.is_empty());
    }

    #[test]
    fn test_fetch_screenshot_returns_first_image() {
        let body = r#"{"results": [{"id": 9, "image": "https://media.rawg.io/a.jpg"}, {"id": 10, "image": "https://media.rawg.io/b.jpg"}]}"#;
        let base = serve_once("200 OK", body);
        let url = client(base).fetch_screenshot(1, &NullSink);
        assert_eq!(url.as_deref(), Some("https://media.rawg.io/a.jpg"));
    }

    #[test]
    fn test_fetch_screenshot_none_when_empty() {
        let base = serve_once("200 OK", r#"{"results": []}"#);
        let url = client(base).fetch_screenshot(1, &NullSink);
        assert!(url.is_none());
    }

    #[test]
    fn test_record_defaults_when_fields_missing() {
        let record: GameRecord = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(record.display_name(), "Unknown Title");
        assert_eq!(record.release_label(), "TBA");
        assert_eq!(record.platform_list(), "");
    }

    #[test]
    fn test_platform_list_skips_malformed_entries() {
        let record: GameRecord = serde_json::from_str(
            r#"{
                "id": 7,
                "platforms": [
                    {"platform": {"name": "PC"}},
                    {"platform": null},
                    {"platform": {"name": ""}},
                    {"platform": {"name": "Xbox One"}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(record.platform_list(), "PC, Xbox One");
    }

    #[test]
    fn test_release_window_formatting() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(release_window(today, 180), "2025-01-01,2025-06-30");
        assert_eq!(release_window(today, 0), "2025-01-01,2025-01-01");
    }
}
