use crate::catalog::GameRecord;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashMap;

/// Discord rejects messages with more than 10 embeds, so the screenshot
/// variant spends 1 on the header and at most 9 on games.
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;
const MAX_GAME_EMBEDS: usize = MAX_EMBEDS_PER_MESSAGE - 1;

pub const NO_GAMES_CONTENT: &str = "No upcoming games found!";

const HEADER_TITLE: &str = "🎮 Upcoming Game Releases 🎮";
const HEADER_COLOR: u32 = 0x7289DA; // Discord blurple
const GAME_COLOR: u32 = 0x3498DB;

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

// ── Formatter ───────────────────────────────────────────────────────────────

/// Build the webhook payload for a list of games.
///
/// `screenshots` selects the variant: `None` renders one digest embed with a
/// field per game; `Some(map)` renders a header embed plus one embed per game
/// (first 9 only), attaching `map[game.id]` as the image where present.
pub fn format_message(
    games: &[GameRecord],
    screenshots: Option<&HashMap<i64, String>>,
    now: DateTime<Local>,
) -> WebhookMessage {
    if games.is_empty() {
        return WebhookMessage {
            content: Some(NO_GAMES_CONTENT.to_string()),
            embeds: Vec::new(),
        };
    }

    match screenshots {
        None => digest_message(games, now),
        Some(shots) => screenshot_message(games, shots, now),
    }
}

fn footer_text(now: DateTime<Local>) -> String {
    format!(
        "Data from RAWG.io • Generated on {}",
        now.format("%Y-%m-%d %H:%M:%S")
    )
}

/// One embed, one field per game.
fn digest_message(games: &[GameRecord], now: DateTime<Local>) -> WebhookMessage {
    let fields = games
        .iter()
        .map(|game| {
            let mut value = format!("📅 Release Date: **{}**\n", game.release_label());
            let platforms = game.platform_list();
            if !platforms.is_empty() {
                value.push_str(&format!("🎮 Platforms: {}", platforms));
            }
            EmbedField {
                name: format!("**{}**", game.display_name()),
                value,
                inline: false,
            }
        })
        .collect();

    WebhookMessage {
        content: None,
        embeds: vec![Embed {
            title: HEADER_TITLE.to_string(),
            color: HEADER_COLOR,
            description: Some("Here are the upcoming game releases:".to_string()),
            fields,
            image: None,
            footer: Some(EmbedFooter {
                text: footer_text(now),
            }),
        }],
    }
}

/// Header embed plus one embed per game, capped at 9 games.
fn screenshot_message(
    games: &[GameRecord],
    screenshots: &HashMap<i64, String>,
    now: DateTime<Local>,
) -> WebhookMessage {
    let mut embeds = Vec::with_capacity(MAX_EMBEDS_PER_MESSAGE);

    embeds.push(Embed {
        title: HEADER_TITLE.to_string(),
        color: HEADER_COLOR,
        description: Some("Here are the upcoming game releases with screenshots:".to_string()),
        fields: Vec::new(),
        image: None,
        footer: Some(EmbedFooter {
            text: footer_text(now),
        }),
    });

    for game in games.iter().take(MAX_GAME_EMBEDS) {
        let mut fields = vec![EmbedField {
            name: "Release Date".to_string(),
            value: format!("📅 **{}**", game.release_label()),
            inline: true,
        }];
        let platforms = game.platform_list();
        if !platforms.is_empty() {
            fields.push(EmbedField {
                name: "Platforms".to_string(),
                value: format!("🎮 {}", platforms),
                inline: true,
            });
        }

        let image = screenshots.get(&game.id);
        embeds.push(Embed {
            title: game.display_name().to_string(),
            color: GAME_COLOR,
            description: None,
            fields,
            image: image.map(|url| EmbedImage { url: url.clone() }),
            footer: if image.is_none() {
                Some(EmbedFooter {
                    text: "No screenshot available for this game".to_string(),
                })
            } else {
                None
            },
        });
    }

    WebhookMessage {
        content: None,
        embeds,
    }
}
