mod catalog;
mod config;
mod credentials;
mod events;
mod message;
mod pipeline;
mod webhook;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = config::Config::default_upcoming();
    if args.iter().any(|a| a == "--screenshots") {
        config.include_screenshots = true;
    }
    pipeline::run(&config)
}
