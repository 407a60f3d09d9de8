use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::DocumentStatus;

/// A status change observed for one document. The timestamp is internal
/// metadata (logs, tests); the wire payload is [`StatusEventPayload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub document_id: Uuid,
    pub status: DocumentStatus,
    pub occurred_at: DateTime<Utc>,
}

impl StatusEvent {
    pub fn now(document_id: Uuid, status: DocumentStatus) -> Self {
        StatusEvent {
            document_id,
            status,
            occurred_at: Utc::now(),
        }
    }
}

/// Wire form of a status event as seen by SSE subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusEventPayload {
    pub document_id: Uuid,
    pub status: DocumentStatus,
}

impl From<&StatusEvent> for StatusEventPayload {
    fn from(event: &StatusEvent) -> Self {
        StatusEventPayload {
            document_id: event.document_id,
            status: event.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_shape() {
        let event = StatusEvent::now(Uuid::new_v4(), DocumentStatus::Ingesting);
        let payload = StatusEventPayload::from(&event);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["documentId"], event.document_id.to_string());
        assert_eq!(json["status"], "ingesting");
        // Exactly two fields; the timestamp never leaves the process.
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
