//! Platform Request and Response Envelopes
//!
//! This module defines the JSON shapes exchanged with the voice platform:
//! the inbound request envelope (launch, intent, session-end) and the
//! outbound response envelope (ask / tell / tell-with-card). The same types
//! feed the OpenAPI documentation via `utoipa`.

use menuteller_core::dialog::{DialogResponse, SessionAttributes, SlotValues};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Inbound request envelope posted by the voice platform for each turn.
#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,
    pub session: SessionEnvelope,
    pub request: Request,
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionEnvelope {
    pub session_id: String,
    /// True on the first request of a session.
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub application: Option<Application>,
    /// Dialog state carried across turns. Absent on a fresh session.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attributes: SessionAttributes,
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

/// The event kinds the platform can deliver, discriminated by `type`.
#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "LaunchRequest")]
    Launch {
        #[serde(default, rename = "requestId")]
        request_id: String,
    },
    #[serde(rename = "IntentRequest")]
    Intent {
        #[serde(default, rename = "requestId")]
        request_id: String,
        intent: Intent,
    },
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded {
        #[serde(default)]
        reason: Option<String>,
    },
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

/// A slot can be missing entirely, or present with no value. Both count as
/// "not provided".
#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct Slot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl Intent {
    /// Extracts the two well-known slots by name.
    pub fn slot_values(&self) -> SlotValues {
        SlotValues {
            course: self.slot_value("Course"),
            date: self.slot_value("Date"),
        }
    }

    fn slot_value(&self, name: &str) -> Option<String> {
        self.slots.get(name).and_then(|slot| slot.value.clone())
    }
}

/// Outbound response envelope. A `SessionEndedRequest` gets an empty one.
#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub session_attributes: Option<SessionAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseBody>,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub output_speech: OutputSpeech,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: String,
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            speech_type: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct Card {
    #[serde(rename = "type")]
    pub card_type: String,
    pub title: String,
    pub content: String,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl ResponseEnvelope {
    /// Maps a dialog turn result to the wire shape, echoing the session
    /// attributes so the platform carries them into the next turn.
    pub fn from_dialog(response: DialogResponse, attributes: SessionAttributes) -> Self {
        let body = match response {
            DialogResponse::Ask { speech, reprompt } => ResponseBody {
                output_speech: OutputSpeech::plain(speech),
                card: None,
                reprompt: Some(Reprompt {
                    output_speech: OutputSpeech::plain(reprompt),
                }),
                should_end_session: false,
            },
            DialogResponse::Tell { speech } => ResponseBody {
                output_speech: OutputSpeech::plain(speech),
                card: None,
                reprompt: None,
                should_end_session: true,
            },
            DialogResponse::TellWithCard {
                speech,
                card_title,
                card_content,
            } => ResponseBody {
                output_speech: OutputSpeech::plain(speech),
                card: Some(Card {
                    card_type: "Simple".to_string(),
                    title: card_title,
                    content: card_content,
                }),
                reprompt: None,
                should_end_session: true,
            },
        };
        Self {
            version: "1.0".to_string(),
            session_attributes: Some(attributes),
            response: Some(body),
        }
    }

    pub fn empty() -> Self {
        Self {
            version: "1.0".to_string(),
            session_attributes: None,
            response: None,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use menuteller_core::course::CourseSelection;

    #[test]
    fn intent_request_deserializes() {
        let json = r#"{
            "version": "1.0",
            "session": {
                "sessionId": "session-1234",
                "new": false,
                "application": {"applicationId": "app-1"},
                "attributes": {"course": {"course": "soup"}}
            },
            "request": {
                "type": "IntentRequest",
                "requestId": "request-5678",
                "intent": {
                    "name": "DialogMenuIntent",
                    "slots": {
                        "Date": {"name": "Date", "value": "2016-11-14"},
                        "Course": {"name": "Course"}
                    }
                }
            }
        }"#;
        let envelope: RequestEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.session.session_id, "session-1234");
        assert_eq!(
            envelope.session.attributes.course,
            Some(CourseSelection::new("soup"))
        );

        match envelope.request {
            Request::Intent { intent, .. } => {
                let slots = intent.slot_values();
                assert_eq!(slots.date.as_deref(), Some("2016-11-14"));
                // Slot present with no value counts as not provided.
                assert_eq!(slots.course, None);
            }
            other => panic!("expected an IntentRequest, got {other:?}"),
        }
    }

    #[test]
    fn launch_request_deserializes_with_empty_attributes() {
        let json = r#"{
            "version": "1.0",
            "session": {"sessionId": "session-1", "new": true},
            "request": {"type": "LaunchRequest", "requestId": "request-1"}
        }"#;
        let envelope: RequestEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.session.new);
        assert_eq!(envelope.session.attributes, SessionAttributes::default());
        assert!(matches!(envelope.request, Request::Launch { .. }));
    }

    #[test]
    fn session_ended_request_deserializes() {
        let json = r#"{
            "session": {"sessionId": "session-1"},
            "request": {"type": "SessionEndedRequest", "reason": "USER_INITIATED"}
        }"#;
        let envelope: RequestEnvelope = serde_json::from_str(json).unwrap();
        match envelope.request {
            Request::SessionEnded { reason } => {
                assert_eq!(reason.as_deref(), Some("USER_INITIATED"));
            }
            other => panic!("expected a SessionEndedRequest, got {other:?}"),
        }
    }

    #[test]
    fn unknown_request_type_is_rejected() {
        let json = r#"{
            "session": {"sessionId": "session-1"},
            "request": {"type": "AudioPlayerRequest"}
        }"#;
        assert!(serde_json::from_str::<RequestEnvelope>(json).is_err());
    }

    #[test]
    fn ask_response_serializes_with_reprompt_and_open_session() {
        let envelope = ResponseEnvelope::from_dialog(
            DialogResponse::Ask {
                speech: "For which date?".to_string(),
                reprompt: "For which date would you like the soup menu?".to_string(),
            },
            SessionAttributes {
                course: Some(CourseSelection::new("soup")),
                date: None,
            },
        );
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""shouldEndSession":false"#));
        assert!(json.contains(r#""outputSpeech":{"type":"PlainText","text":"For which date?"}"#));
        assert!(json.contains(r#""reprompt""#));
        assert!(json.contains(r#""sessionAttributes":{"course":{"course":"soup"}}"#));
        assert!(!json.contains("card"));
    }

    #[test]
    fn tell_with_card_serializes_closed_session_and_card() {
        let envelope = ResponseEnvelope::from_dialog(
            DialogResponse::TellWithCard {
                speech: "Monday November 14th is Day 1. The entree is Beef.".to_string(),
                card_title: "MenuTeller".to_string(),
                card_content: "Monday November 14th is Day 1. The entree is Beef.".to_string(),
            },
            SessionAttributes::default(),
        );
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""shouldEndSession":true"#));
        assert!(json.contains(r#""card":{"type":"Simple","title":"MenuTeller""#));
        assert!(!json.contains("reprompt"));
    }

    #[test]
    fn empty_envelope_has_no_response() {
        let json = serde_json::to_string(&ResponseEnvelope::empty()).unwrap();
        assert_eq!(json, r#"{"version":"1.0"}"#);
    }
}
