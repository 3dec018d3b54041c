use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::credentials::{self, StdinSource};
use crate::events::{ConsoleSink, EventSink, UiEvent};
use crate::message;
use crate::webhook;
use anyhow::Result;
use chrono::Local;
use std::collections::HashMap;

/// Run the notifier in console mode.
pub fn run(config: &Config) -> Result<()> {
    let sink = ConsoleSink::new();
    sink.send(UiEvent::Log(format!(
        "Release window: next {} days",
        config.window_days
    )));
    sink.send(UiEvent::Log(format!(
        "Fetching up to {} games",
        config.page_size
    )));
    if config.include_screenshots {
        sink.send(UiEvent::Log("Screenshots: enabled".to_string()));
    }
    run_with_sink(config, &sink)
}

/// Run the full pipeline, reporting progress through `sink`.
///
/// Degraded stages (empty fetch, failed publish) end the run with a printed
/// message, not an error; the process still exits 0.
pub fn run_with_sink(config: &Config, sink: &dyn EventSink) -> Result<()> {
    let creds = match credentials::from_env() {
        Some(creds) => creds,
        None => credentials::load_or_create(&config.credentials_path, &StdinSource, sink)?,
    };
    if !creds.is_complete() {
        sink.send(UiEvent::Error(
            "Missing API key or webhook URL. Please update the configuration.".to_string(),
        ));
        return Ok(());
    }

    sink.send(UiEvent::FetchStarted);
    let client = CatalogClient::new(creds.rawg_api_key.clone());
    let games = client.fetch_upcoming(config.window_days, config.page_size, sink);
    if games.is_empty() {
        sink.send(UiEvent::Log("No games found or error occurred.".to_string()));
        return Ok(());
    }
    sink.send(UiEvent::FetchComplete { count: games.len() });

    // One blocking lookup per game, in record order. The formatter only
    // renders the first 9, but the whole list is looked up.
    let screenshots = if config.include_screenshots {
        let mut found = HashMap::new();
        sink.send(UiEvent::ScreenshotsStarted {
            total: games.len() as u64,
        });
        for game in &games {
            let url = client.fetch_screenshot(game.id, sink);
            sink.send(UiEvent::ScreenshotFetched {
                name: game.display_name().to_string(),
                found: url.is_some(),
            });
            if let Some(url) = url {
                found.insert(game.id, url);
            }
        }
        sink.send(UiEvent::ScreenshotsComplete {
            found: found.len(),
            total: games.len(),
        });
        Some(found)
    } else {
        None
    };

    sink.send(UiEvent::Formatting);
    let payload = message::format_message(&games, screenshots.as_ref(), Local::now());

    sink.send(UiEvent::PublishStarted);
    let success = webhook::publish(&creds.discord_webhook_url, &payload, sink);
    sink.send(UiEvent::PublishComplete { success });

    Ok(())
}
