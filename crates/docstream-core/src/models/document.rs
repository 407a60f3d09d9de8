use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Ingestion status of a document.
///
/// Wire and database representation is snake_case (`un_ingested`). The legal
/// transitions form a straight line with one retry edge:
///
/// ```text
/// pending -> un_ingested -> ingesting -> ingested
///                              ^    \--> failed
///                              |__________/
/// ```
///
/// `ingested` and `failed` are terminal for the status channel lifecycle;
/// `failed` documents may re-enter `ingesting` when retried.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "document_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    UnIngested,
    Ingesting,
    Ingested,
    Failed,
}

impl DocumentStatus {
    /// Terminal statuses end the status channel lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Ingested | DocumentStatus::Failed)
    }

    /// Statuses from which the predecessor set of `to` may come. Includes `to`
    /// itself: same-status updates are idempotent no-ops, so a redelivered
    /// terminal webhook acks cleanly instead of failing.
    pub fn allowed_predecessors(to: DocumentStatus) -> &'static [DocumentStatus] {
        match to {
            DocumentStatus::Pending => &[DocumentStatus::Pending],
            DocumentStatus::UnIngested => &[DocumentStatus::UnIngested, DocumentStatus::Pending],
            DocumentStatus::Ingesting => &[
                DocumentStatus::Ingesting,
                DocumentStatus::UnIngested,
                DocumentStatus::Failed,
            ],
            DocumentStatus::Ingested => &[DocumentStatus::Ingested, DocumentStatus::Ingesting],
            DocumentStatus::Failed => &[DocumentStatus::Failed, DocumentStatus::Ingesting],
        }
    }

    /// Whether the edge `self -> to` is legal.
    pub fn can_transition_to(&self, to: DocumentStatus) -> bool {
        Self::allowed_predecessors(to).contains(self)
    }

    /// Whether ingestion may be triggered from this status. Rejected while a
    /// run is already in flight (`ingesting`), after terminal success, and
    /// before the document is ready (`pending`).
    pub fn can_trigger_ingestion(&self) -> bool {
        matches!(self, DocumentStatus::UnIngested | DocumentStatus::Failed)
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Pending => write!(f, "pending"),
            DocumentStatus::UnIngested => write!(f, "un_ingested"),
            DocumentStatus::Ingesting => write!(f, "ingesting"),
            DocumentStatus::Ingested => write!(f, "ingested"),
            DocumentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DocumentStatus::Pending),
            "un_ingested" => Ok(DocumentStatus::UnIngested),
            "ingesting" => Ok(DocumentStatus::Ingesting),
            "ingested" => Ok(DocumentStatus::Ingested),
            "failed" => Ok(DocumentStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid document status: {}", s)),
        }
    }
}

/// A stored document row. `deleted_at` is the soft-delete tombstone; reads
/// exclude tombstoned rows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub status: DocumentStatus,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Client-facing document metadata. The tombstone is never serialized.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub status: DocumentStatus,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            file_name: doc.file_name,
            mime_type: doc.mime_type,
            status: doc.status,
            owner_id: doc.owner_id,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn test_document(status: DocumentStatus) -> Document {
        Document {
            id: Uuid::new_v4(),
            file_name: "invoice.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            status,
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_status_serde_is_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::UnIngested).unwrap();
        assert_eq!(json, "\"un_ingested\"");

        let status: DocumentStatus = serde_json::from_str("\"ingesting\"").unwrap();
        assert_eq!(status, DocumentStatus::Ingesting);

        assert!(serde_json::from_str::<DocumentStatus>("\"UN_INGESTED\"").is_err());
    }

    #[test]
    fn test_status_display_from_str_round_trip() {
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::UnIngested,
            DocumentStatus::Ingesting,
            DocumentStatus::Ingested,
            DocumentStatus::Failed,
        ] {
            let parsed = DocumentStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(DocumentStatus::from_str("done").is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(DocumentStatus::Ingested.is_terminal());
        assert!(DocumentStatus::Failed.is_terminal());
        assert!(!DocumentStatus::Pending.is_terminal());
        assert!(!DocumentStatus::UnIngested.is_terminal());
        assert!(!DocumentStatus::Ingesting.is_terminal());
    }

    #[test]
    fn test_forward_transitions_are_legal() {
        assert!(DocumentStatus::Pending.can_transition_to(DocumentStatus::UnIngested));
        assert!(DocumentStatus::UnIngested.can_transition_to(DocumentStatus::Ingesting));
        assert!(DocumentStatus::Ingesting.can_transition_to(DocumentStatus::Ingested));
        assert!(DocumentStatus::Ingesting.can_transition_to(DocumentStatus::Failed));
        // Retry edge.
        assert!(DocumentStatus::Failed.can_transition_to(DocumentStatus::Ingesting));
    }

    #[test]
    fn test_illegal_transitions_are_rejected() {
        assert!(!DocumentStatus::Ingested.can_transition_to(DocumentStatus::Ingesting));
        assert!(!DocumentStatus::Ingested.can_transition_to(DocumentStatus::Failed));
        assert!(!DocumentStatus::Pending.can_transition_to(DocumentStatus::Ingesting));
        assert!(!DocumentStatus::UnIngested.can_transition_to(DocumentStatus::Ingested));
        assert!(!DocumentStatus::Failed.can_transition_to(DocumentStatus::Pending));
        assert!(!DocumentStatus::Ingesting.can_transition_to(DocumentStatus::UnIngested));
    }

    #[test]
    fn test_same_status_updates_are_idempotent() {
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::UnIngested,
            DocumentStatus::Ingesting,
            DocumentStatus::Ingested,
            DocumentStatus::Failed,
        ] {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_trigger_gate() {
        assert!(DocumentStatus::UnIngested.can_trigger_ingestion());
        assert!(DocumentStatus::Failed.can_trigger_ingestion());
        assert!(!DocumentStatus::Pending.can_trigger_ingestion());
        assert!(!DocumentStatus::Ingesting.can_trigger_ingestion());
        assert!(!DocumentStatus::Ingested.can_trigger_ingestion());
    }

    #[test]
    fn test_document_response_hides_tombstone() {
        let mut doc = test_document(DocumentStatus::UnIngested);
        doc.deleted_at = Some(Utc::now());

        let response = DocumentResponse::from(doc.clone());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["fileName"], "invoice.pdf");
        assert_eq!(json["mimeType"], "application/pdf");
        assert_eq!(json["status"], "un_ingested");
        assert_eq!(json["ownerId"], doc.owner_id.to_string());
        assert!(json.get("deletedAt").is_none());
        assert!(json.get("deleted_at").is_none());
    }
}
