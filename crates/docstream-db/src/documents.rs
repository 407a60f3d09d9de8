use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use docstream_core::models::{Document, DocumentStatus};
use docstream_core::AppError;

/// Repository for document metadata rows.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "insert", db.record_id = %id)
    )]
    pub async fn insert(
        &self,
        id: Uuid,
        file_name: &str,
        mime_type: &str,
        status: DocumentStatus,
        owner_id: Uuid,
    ) -> Result<Document, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(
            r#"
            INSERT INTO documents (id, file_name, mime_type, status, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(file_name)
        .bind(mime_type)
        .bind(status)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "select", db.record_id = %id)
    )]
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(
            "SELECT * FROM documents WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<Postgres, Document>(
            "SELECT * FROM documents WHERE deleted_at IS NULL ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    /// Persists a status transition. The legal predecessor set rides in the
    /// WHERE clause, so an illegal edge never writes even when callers race;
    /// same-status updates pass through as idempotent no-ops.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "update", db.record_id = %id, status = %status)
    )]
    pub async fn update_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<Document, AppError> {
        let allowed = DocumentStatus::allowed_predecessors(status);

        let updated = sqlx::query_as::<Postgres, Document>(
            r#"
            UPDATE documents
            SET status = $2, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL AND status = ANY($3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(allowed.to_vec())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(document) = updated {
            return Ok(document);
        }

        // No row matched: either the document is gone or the edge is illegal.
        match self.find_by_id(id).await? {
            Some(current) => Err(AppError::InvalidTransition {
                from: current.status,
                to: status,
            }),
            None => Err(AppError::NotFound("Document not found".to_string())),
        }
    }

    /// Sets the tombstone; the row stays for audit but disappears from reads.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "update", db.record_id = %id)
    )]
    pub async fn soft_delete(&self, id: Uuid) -> Result<Document, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(
            r#"
            UPDATE documents
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        document.ok_or_else(|| AppError::NotFound("Document not found".to_string()))
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "documents", db.operation = "delete", db.record_id = %id)
    )]
    pub async fn hard_delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Document not found".to_string()));
        }

        Ok(())
    }
}
