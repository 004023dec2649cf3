//! Inbound event shapes from `/sync`

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

pub const MSGTYPE_TEXT: &str = "m.text";
pub const MSGTYPE_NOTICE: &str = "m.notice";

/// A `m.room.message` event delivered to the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMessage {
    pub room_id: String,
    pub event_id: String,
    pub sender: String,
    pub msgtype: Option<String>,
    pub body: Option<String>,
}

impl RoomMessage {
    /// Plain text body, if this is a non-empty `m.text` message
    pub fn text_body(&self) -> Option<&str> {
        if self.msgtype.as_deref() != Some(MSGTYPE_TEXT) {
            return None;
        }
        self.body.as_deref().filter(|b| !b.is_empty())
    }
}

/// One long-poll result
#[derive(Debug, Clone, Default)]
pub struct SyncBatch {
    pub next_batch: String,
    pub messages: Vec<RoomMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SyncResponse {
    pub next_batch: String,
    #[serde(default)]
    pub rooms: SyncRooms,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SyncRooms {
    #[serde(default)]
    pub join: HashMap<String, JoinedRoom>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct JoinedRoom {
    #[serde(default)]
    pub timeline: Timeline,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Timeline {
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub content: Value,
}

impl SyncResponse {
    /// Flatten joined-room timelines into room messages, keeping timeline order per room
    pub fn into_batch(self) -> SyncBatch {
        let mut messages = Vec::new();
        for (room_id, room) in self.rooms.join {
            for event in room.timeline.events {
                if event.kind != "m.room.message" {
                    continue;
                }
                let field = |name: &str| {
                    event
                        .content
                        .get(name)
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                messages.push(RoomMessage {
                    room_id: room_id.clone(),
                    msgtype: field("msgtype"),
                    body: field("body"),
                    event_id: event.event_id,
                    sender: event.sender,
                });
            }
        }

        SyncBatch {
            next_batch: self.next_batch,
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sync_response_keeps_only_room_messages() {
        let raw = json!({
            "next_batch": "s72595_4483_1934",
            "rooms": {
                "join": {
                    "!room:example.org": {
                        "timeline": {
                            "events": [
                                {
                                    "type": "m.room.member",
                                    "sender": "@alice:example.org",
                                    "event_id": "$member",
                                    "content": { "membership": "join" }
                                },
                                {
                                    "type": "m.room.message",
                                    "sender": "@alice:example.org",
                                    "event_id": "$msg",
                                    "content": { "msgtype": "m.text", "body": "!feature status" }
                                }
                            ]
                        }
                    }
                }
            }
        });

        let batch = serde_json::from_value::<SyncResponse>(raw).unwrap().into_batch();
        assert_eq!(batch.next_batch, "s72595_4483_1934");
        assert_eq!(
            batch.messages,
            vec![RoomMessage {
                room_id: "!room:example.org".to_string(),
                event_id: "$msg".to_string(),
                sender: "@alice:example.org".to_string(),
                msgtype: Some("m.text".to_string()),
                body: Some("!feature status".to_string()),
            }]
        );
    }

    #[test]
    fn test_sync_response_without_rooms() {
        let batch = serde_json::from_value::<SyncResponse>(json!({ "next_batch": "abc" }))
            .unwrap()
            .into_batch();
        assert_eq!(batch.next_batch, "abc");
        assert!(batch.messages.is_empty());
    }

    #[test]
    fn test_text_body_filters_non_text() {
        let mut message = RoomMessage {
            room_id: "!r:x".to_string(),
            event_id: "$e".to_string(),
            sender: "@a:x".to_string(),
            msgtype: Some(MSGTYPE_NOTICE.to_string()),
            body: Some("!feature status".to_string()),
        };
        assert_eq!(message.text_body(), None);

        message.msgtype = Some(MSGTYPE_TEXT.to_string());
        assert_eq!(message.text_body(), Some("!feature status"));

        message.body = Some(String::new());
        assert_eq!(message.text_body(), None);
    }
}
