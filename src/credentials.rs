use crate::events::{EventSink, UiEvent};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// API credentials persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub rawg_api_key: String,
    pub discord_webhook_url: String,
}

impl Credentials {
    /// Both fields present and non-empty. No format validation.
    pub fn is_complete(&self) -> bool {
        !self.rawg_api_key.is_empty() && !self.discord_webhook_url.is_empty()
    }
}

/// Where credentials come from when no usable file exists.
pub trait CredentialSource {
    fn obtain(&self) -> Result<Credentials>;
}

/// Interactive source: prompts on stdout, reads trimmed lines from stdin.
pub struct StdinSource;

impl CredentialSource for StdinSource {
    fn obtain(&self) -> Result<Credentials> {
        Ok(Credentials {
            rawg_api_key: prompt("Enter your RAWG.io API key: ")?,
            discord_webhook_url: prompt("Enter your Discord webhook URL: ")?,
        })
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Non-interactive override: both RAWG_API_KEY and DISCORD_WEBHOOK_URL set
/// and non-empty. Env-supplied credentials are never written to disk.
pub fn from_env() -> Option<Credentials> {
    let creds = Credentials {
        rawg_api_key: std::env::var("RAWG_API_KEY").unwrap_or_default(),
        discord_webhook_url: std::env::var("DISCORD_WEBHOOK_URL").unwrap_or_default(),
    };
    creds.is_complete().then_some(creds)
}

/// Load credentials from `path`, or create the file from `source`.
/// A file that exists but does not parse is reported and replaced.
pub fn load_or_create(
    path: &Path,
    source: &dyn CredentialSource,
    sink: &dyn EventSink,
) -> Result<Credentials> {
    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        match serde_json::from_str::<Credentials>(&raw) {
            Ok(creds) => return Ok(creds),
            Err(_) => sink.send(UiEvent::Log(format!(
                "Error: {} is corrupted. Creating a new one.",
                path.display()
            ))),
        }
    }

    let creds = source.obtain()?;
    save(path, &creds)?;
    Ok(creds)
}

fn save(path: &Path, creds: &Credentials) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(creds)?;
    fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct NullSink;
    impl EventSink for NullSink {
        fn send(&self, _: UiEvent) {}
    }

    struct FixedSource(Credentials);
    impl CredentialSource for FixedSource {
        fn obtain(&self) -> Result<Credentials> {
            Ok(self.0.clone())
        }
    }

    fn sample() -> Credentials {
        Credentials {
            rawg_api_key: "test-key".into(),
            discord_webhook_url: "https://discord.com/api/webhooks/1/abc".into(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("release_radar_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_obtains_and_persists() {
        let path = temp_path("missing");
        fs::remove_file(&path).ok();

        let creds = load_or_create(&path, &FixedSource(sample()), &NullSink).unwrap();
        assert_eq!(creds.rawg_api_key, "test-key");

        let reloaded: Credentials =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.discord_webhook_url, sample().discord_webhook_url);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_corrupt_file_falls_back_to_source() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not valid json").unwrap();

        let creds = load_or_create(&path, &FixedSource(sample()), &NullSink).unwrap();
        assert_eq!(creds.rawg_api_key, "test-key");

        // The corrupted file was replaced with a parseable one.
        let reloaded: Credentials =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.rawg_api_key, "test-key");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_existing_file_wins_over_source() {
        let path = temp_path("existing");
        fs::write(&path, serde_json::to_string_pretty(&sample()).unwrap()).unwrap();

        let other = Credentials {
            rawg_api_key: "other".into(),
            discord_webhook_url: "https://example.com".into(),
        };
        let creds = load_or_create(&path, &FixedSource(other), &NullSink).unwrap();
        assert_eq!(creds.rawg_api_key, "test-key");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_blank_fields_are_incomplete() {
        let creds = Credentials {
            rawg_api_key: String::new(),
            discord_webhook_url: "https://example.com".into(),
        };
        assert!(!creds.is_complete());
        assert!(sample().is_complete());
    }
}
