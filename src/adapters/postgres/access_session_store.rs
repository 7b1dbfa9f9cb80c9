//! PostgreSQL implementation of AccessSessionStore.
//!
//! Persists ephemeral access sessions keyed by (proposal_id, email).
//! The upsert in `put` gives the replace semantics the port requires:
//! issuing a new code overwrites the old one in a single statement.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::access::{AccessSession, CodeDigest};
use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, ProposalId, Timestamp};
use crate::ports::AccessSessionStore;

/// PostgreSQL implementation of AccessSessionStore.
#[derive(Clone)]
pub struct PostgresAccessSessionStore {
    pool: PgPool,
}

impl PostgresAccessSessionStore {
    /// Creates a new PostgresAccessSessionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessSessionStore for PostgresAccessSessionStore {
    async fn put(&self, session: &AccessSession) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO access_sessions (
                proposal_id, email, code_digest, issued_at, expires_at, attempts
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (proposal_id, email) DO UPDATE SET
                code_digest = EXCLUDED.code_digest,
                issued_at = EXCLUDED.issued_at,
                expires_at = EXCLUDED.expires_at,
                attempts = EXCLUDED.attempts
            "#,
        )
        .bind(session.proposal_id().as_uuid())
        .bind(session.email().as_str())
        .bind(session.code_digest().as_bytes())
        .bind(session.issued_at().as_datetime())
        .bind(session.expires_at().as_datetime())
        .bind(session.attempts() as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to store access session: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find(
        &self,
        proposal_id: &ProposalId,
        email: &EmailAddress,
    ) -> Result<Option<AccessSession>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT proposal_id, email, code_digest, issued_at, expires_at, attempts
            FROM access_sessions
            WHERE proposal_id = $1 AND email = $2
            "#,
        )
        .bind(proposal_id.as_uuid())
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch access session: {}", e),
            )
        })?;

        match row {
            Some(row) => {
                let session = row_to_session(row)?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn delete(
        &self,
        proposal_id: &ProposalId,
        email: &EmailAddress,
    ) -> Result<(), DomainError> {
        // Deleting an absent session is fine, so rows_affected is not
        // checked.
        sqlx::query("DELETE FROM access_sessions WHERE proposal_id = $1 AND email = $2")
            .bind(proposal_id.as_uuid())
            .bind(email.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete access session: {}", e),
                )
            })?;

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<AccessSession, DomainError> {
    let proposal_id: uuid::Uuid = row.try_get("proposal_id").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get proposal_id: {}", e),
        )
    })?;

    let email: String = row.try_get("email").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get email: {}", e),
        )
    })?;

    let code_digest: Vec<u8> = row.try_get("code_digest").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get code_digest: {}", e),
        )
    })?;

    let issued_at: chrono::DateTime<chrono::Utc> = row.try_get("issued_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get issued_at: {}", e),
        )
    })?;

    let expires_at: chrono::DateTime<chrono::Utc> = row.try_get("expires_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get expires_at: {}", e),
        )
    })?;

    let attempts: i32 = row.try_get("attempts").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get attempts: {}", e),
        )
    })?;

    Ok(AccessSession::reconstitute(
        ProposalId::from_uuid(proposal_id),
        EmailAddress::try_new(&email).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid session email: {}", e),
            )
        })?,
        CodeDigest::from_bytes(code_digest),
        Timestamp::from_datetime(issued_at),
        Timestamp::from_datetime(expires_at),
        attempts as u32,
    ))
}
