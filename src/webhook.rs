use crate::events::{EventSink, UiEvent};
use crate::message::WebhookMessage;
use std::time::Duration;

/// POST `message` as JSON to the webhook `url`. Best effort: any transport
/// or status failure is reported through `sink` and collapses to `false`.
pub fn publish(url: &str, message: &WebhookMessage, sink: &dyn EventSink) -> bool {
    let agent = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(30)))
        .build()
        .new_agent();

    match agent.post(url).send_json(message) {
        Ok(_) => true,
        Err(e) => {
            sink.send(UiEvent::Error(format!(
                "Error sending message to Discord: {}",
                e
            )));
            false
        }
    }
}
