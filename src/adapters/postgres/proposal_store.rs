//! PostgreSQL implementation of ProposalStore.
//!
//! Reads proposal rows and performs the conditional countersign write.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, ProposalId, Timestamp};
use crate::domain::proposal::{Proposal, ProposalSnapshot, ProposalStatus};
use crate::ports::ProposalStore;

/// PostgreSQL implementation of ProposalStore.
#[derive(Clone)]
pub struct PostgresProposalStore {
    pool: PgPool,
}

impl PostgresProposalStore {
    /// Creates a new PostgresProposalStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProposalStore for PostgresProposalStore {
    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<Proposal>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, content, counterparty_email, status, counterparty_signature_ref,
                   signed_at, serial_number, client_name, proposal_number, created_at
            FROM proposals
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch proposal: {}", e),
            )
        })?;

        match row {
            Some(row) => {
                let proposal = row_to_proposal(row)?;
                Ok(Some(proposal))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, proposal: &Proposal) -> Result<(), DomainError> {
        // The status guard makes this the linearization point: only one
        // write can move a row out of 'sent'.
        let result = sqlx::query(
            r#"
            UPDATE proposals SET
                content = $2,
                status = $3,
                counterparty_signature_ref = $4,
                signed_at = $5
            WHERE id = $1 AND status <> 'signed'
            "#,
        )
        .bind(proposal.id().as_uuid())
        .bind(proposal.content().as_value())
        .bind(proposal_status_to_str(proposal.status()))
        .bind(proposal.counterparty_signature_ref())
        .bind(proposal.signed_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update proposal: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            // Zero rows means the guard failed: the row is either gone
            // or was signed concurrently. Re-read to tell which.
            let existing = sqlx::query("SELECT status FROM proposals WHERE id = $1")
                .bind(proposal.id().as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to check proposal status: {}", e),
                    )
                })?;

            return Err(match existing {
                Some(_) => DomainError::new(
                    ErrorCode::AlreadySigned,
                    format!("Proposal already signed: {}", proposal.id()),
                ),
                None => DomainError::new(
                    ErrorCode::ProposalNotFound,
                    format!("Proposal not found: {}", proposal.id()),
                ),
            });
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn proposal_status_to_str(status: ProposalStatus) -> &'static str {
    match status {
        ProposalStatus::Sent => "sent",
        ProposalStatus::Signed => "signed",
    }
}

fn str_to_proposal_status(s: &str) -> Result<ProposalStatus, DomainError> {
    match s {
        "sent" => Ok(ProposalStatus::Sent),
        "signed" => Ok(ProposalStatus::Signed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid proposal status: {}", s),
        )),
    }
}

fn row_to_proposal(row: sqlx::postgres::PgRow) -> Result<Proposal, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to get id: {}", e))
    })?;

    let content: serde_json::Value = row.try_get("content").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get content: {}", e),
        )
    })?;

    let counterparty_email: String = row.try_get("counterparty_email").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get counterparty_email: {}", e),
        )
    })?;

    let status_str: String = row.try_get("status").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get status: {}", e),
        )
    })?;
    let status = str_to_proposal_status(&status_str)?;

    let counterparty_signature_ref: Option<String> =
        row.try_get("counterparty_signature_ref").map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get counterparty_signature_ref: {}", e),
            )
        })?;

    let signed_at: Option<chrono::DateTime<chrono::Utc>> =
        row.try_get("signed_at").map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get signed_at: {}", e),
            )
        })?;

    let serial_number: Option<i64> = row.try_get("serial_number").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get serial_number: {}", e),
        )
    })?;

    let client_name: Option<String> = row.try_get("client_name").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get client_name: {}", e),
        )
    })?;

    let proposal_number: Option<String> = row.try_get("proposal_number").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get proposal_number: {}", e),
        )
    })?;

    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get created_at: {}", e),
        )
    })?;

    Ok(Proposal::reconstitute(
        ProposalId::from_uuid(id),
        ProposalSnapshot::new(content),
        EmailAddress::try_new(&counterparty_email).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid counterparty_email: {}", e),
            )
        })?,
        status,
        counterparty_signature_ref,
        signed_at.map(Timestamp::from_datetime),
        serial_number,
        client_name,
        proposal_number,
        Timestamp::from_datetime(created_at),
    ))
}
