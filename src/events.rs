use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

// ── Events from pipeline to UI ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum UiEvent {
    Log(String),

    FetchStarted,
    FetchComplete { count: usize },

    ScreenshotsStarted { total: u64 },
    ScreenshotFetched { name: String, found: bool },
    ScreenshotsComplete { found: usize, total: usize },

    Formatting,
    PublishStarted,
    PublishComplete { success: bool },

    Error(String),
}

// ── EventSink trait ─────────────────────────────────────────────────────────

/// Abstraction for reporting run progress.
pub trait EventSink {
    fn send(&self, event: UiEvent);
}

// ── Console sink ────────────────────────────────────────────────────────────

pub struct ConsoleSink {
    pb: Mutex<Option<ProgressBar>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            pb: Mutex::new(None),
        }
    }

    fn make_pb(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    }
}

impl EventSink for ConsoleSink {
    fn send(&self, event: UiEvent) {
        match event {
            UiEvent::Log(msg) => println!("  {}", msg),

            UiEvent::FetchStarted => println!("Fetching upcoming games..."),
            UiEvent::FetchComplete { count } => println!("Found {} upcoming games.", count),

            UiEvent::ScreenshotsStarted { total } => {
                println!("Fetching screenshots for games...");
                *self.pb.lock().unwrap() = Some(Self::make_pb(total));
            }
            UiEvent::ScreenshotFetched { name, found } => {
                if let Some(pb) = self.pb.lock().unwrap().as_ref() {
                    if found {
                        pb.set_message(name);
                    } else {
                        pb.set_message(format!("{} (no screenshot)", name));
                    }
                    pb.inc(1);
                }
            }
            UiEvent::ScreenshotsComplete { found, total } => {
                if let Some(pb) = self.pb.lock().unwrap().take() {
                    pb.finish_and_clear();
                }
                println!("Found screenshots for {} out of {} games.", found, total);
            }

            UiEvent::Formatting => println!("Formatting message for Discord..."),
            UiEvent::PublishStarted => println!("Sending message to Discord..."),
            UiEvent::PublishComplete { success } => {
                if success {
                    println!("Success! Message sent to Discord.");
                } else {
                    println!("Failed to send message to Discord.");
                }
            }

            UiEvent::Error(msg) => eprintln!("  ERROR: {}", msg),
        }
    }
}
