//! Proposal aggregate entity.
//!
//! A proposal is the shared business document a counterparty unlocks,
//! views, and countersigns. The editing flow creates it; this module
//! only models the read-and-countersign side.
//!
//! # Invariants
//!
//! - `status == Signed` iff `counterparty_signature_ref` is set
//!   iff `signed_at` is set. All three change together, exactly once,
//!   inside [`countersign`].
//!
//! [`countersign`]: Proposal::countersign

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

use super::snapshot::ProposalSnapshot;
use super::status::ProposalStatus;

/// Proposal aggregate - a shared document awaiting countersignature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique identifier for this proposal.
    id: ProposalId,

    /// Content snapshot produced by the editing flow.
    content: ProposalSnapshot,

    /// The single address authorized to unlock this proposal.
    counterparty_email: EmailAddress,

    /// Current status (Sent or Signed).
    status: ProposalStatus,

    /// Storage path of the counterparty's signature image.
    counterparty_signature_ref: Option<String>,

    /// When the counterparty signed.
    signed_at: Option<Timestamp>,

    /// Sequential number assigned by the owning account.
    serial_number: Option<i64>,

    /// Counterparty display name captured at creation.
    client_name: Option<String>,

    /// Human-facing proposal number (e.g. "2026-0042").
    proposal_number: Option<String>,

    /// When the proposal was created.
    created_at: Timestamp,
}

impl Proposal {
    /// Create a new proposal in the `Sent` state.
    pub fn new(id: ProposalId, content: ProposalSnapshot, counterparty_email: EmailAddress) -> Self {
        Self {
            id,
            content,
            counterparty_email,
            status: ProposalStatus::Sent,
            counterparty_signature_ref: None,
            signed_at: None,
            serial_number: None,
            client_name: None,
            proposal_number: None,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitute a proposal from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ProposalId,
        content: ProposalSnapshot,
        counterparty_email: EmailAddress,
        status: ProposalStatus,
        counterparty_signature_ref: Option<String>,
        signed_at: Option<Timestamp>,
        serial_number: Option<i64>,
        client_name: Option<String>,
        proposal_number: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            content,
            counterparty_email,
            status,
            counterparty_signature_ref,
            signed_at,
            serial_number,
            client_name,
            proposal_number,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the proposal ID.
    pub fn id(&self) -> &ProposalId {
        &self.id
    }

    /// Returns the content snapshot.
    pub fn content(&self) -> &ProposalSnapshot {
        &self.content
    }

    /// Returns the authorized counterparty address.
    pub fn counterparty_email(&self) -> &EmailAddress {
        &self.counterparty_email
    }

    /// Returns the current status.
    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    /// Returns the counterparty signature storage path, if signed.
    pub fn counterparty_signature_ref(&self) -> Option<&str> {
        self.counterparty_signature_ref.as_deref()
    }

    /// Returns when the counterparty signed, if signed.
    pub fn signed_at(&self) -> Option<&Timestamp> {
        self.signed_at.as_ref()
    }

    /// Returns the account-scoped serial number.
    pub fn serial_number(&self) -> Option<i64> {
        self.serial_number
    }

    /// Returns the counterparty display name.
    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    /// Returns the human-facing proposal number.
    pub fn proposal_number(&self) -> Option<&str> {
        self.proposal_number.as_deref()
    }

    /// Returns when the proposal was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks if the given address is the authorized counterparty.
    pub fn is_counterparty(&self, email: &EmailAddress) -> bool {
        &self.counterparty_email == email
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record the counterparty's signature.
    ///
    /// Patches the snapshot, sets the top-level signature reference,
    /// status, and signing time in one step so the aggregate never
    /// holds a partial transition.
    ///
    /// # Errors
    ///
    /// - `AlreadySigned` if the proposal has already been signed
    pub fn countersign(
        &mut self,
        signature_path: String,
        signed_at: Timestamp,
    ) -> Result<(), DomainError> {
        self.ensure_mutable()?;

        self.content = self.content.merge_signature(&signature_path);
        self.counterparty_signature_ref = Some(signature_path);
        self.signed_at = Some(signed_at);
        self.status = ProposalStatus::Signed;
        Ok(())
    }

    /// Checks the signing invariant: status, signature reference, and
    /// signing time are either all set or all absent.
    pub fn invariant_holds(&self) -> bool {
        let signed = self.status == ProposalStatus::Signed;
        signed == self.counterparty_signature_ref.is_some() && signed == self.signed_at.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates that the proposal can still be countersigned.
    fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::AlreadySigned,
                "Proposal has already been signed",
            ))
        }
    }
}
