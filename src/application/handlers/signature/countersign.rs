//! CountersignHandler - records a recipient signature and signs the proposal.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::asset_urls::AssetUrlService;
use crate::domain::access::AccessError;
use crate::domain::asset::SignatureImage;
use crate::domain::foundation::{EmailAddress, ErrorCode, ProposalId, Timestamp};
use crate::domain::proposal::{Proposal, ProposalStatus};
use crate::ports::{ObjectStore, ProposalStore};

/// Command to countersign a proposal with a drawn signature image.
#[derive(Debug, Clone)]
pub struct CountersignCommand {
    pub proposal_id: ProposalId,
    /// The verified recipient address, as typed.
    pub email: String,
    /// Raw PNG bytes of the rendered signature canvas.
    pub image_bytes: Vec<u8>,
}

/// Result of a successful countersignature.
#[derive(Debug, Clone)]
pub struct CountersignResult {
    /// The proposal after the signing transition.
    pub proposal: Proposal,
    /// Fresh signed URL for the stored signature, for immediate display.
    /// `None` when issuance failed; the stored reference still exists.
    pub signature_url: Option<String>,
}

/// Handler for the countersignature step.
pub struct CountersignHandler {
    proposals: Arc<dyn ProposalStore>,
    object_store: Arc<dyn ObjectStore>,
    asset_urls: Arc<AssetUrlService>,
    signatures_bucket: String,
}

impl CountersignHandler {
    pub fn new(
        proposals: Arc<dyn ProposalStore>,
        object_store: Arc<dyn ObjectStore>,
        asset_urls: Arc<AssetUrlService>,
        signatures_bucket: impl Into<String>,
    ) -> Self {
        Self {
            proposals,
            object_store,
            asset_urls,
            signatures_bucket: signatures_bucket.into(),
        }
    }

    pub async fn handle(&self, cmd: CountersignCommand) -> Result<CountersignResult, AccessError> {
        // 1. Authorize against the current row. Anything but the
        //    recipient's own address is turned away before any write.
        let email =
            EmailAddress::try_new(&cmd.email).map_err(|_| AccessError::not_verified())?;
        let current = self
            .proposals
            .find_by_id(&cmd.proposal_id)
            .await?
            .ok_or(AccessError::ProposalNotFound(cmd.proposal_id))?;
        if !current.is_counterparty(&email) {
            return Err(AccessError::not_verified());
        }
        if current.status() == ProposalStatus::Signed {
            return Err(AccessError::already_signed());
        }

        // 2. Validate the capture. Blank or non-PNG input never reaches
        //    the store.
        let image = SignatureImage::from_bytes(cmd.image_bytes)?;

        // 3. Upload under a fresh name scoped to the proposal. Failure
        //    here aborts with no state change.
        let file_name = format!("client_{}_{}.png", cmd.proposal_id, Uuid::new_v4());
        self.object_store
            .upload(
                &self.signatures_bucket,
                &file_name,
                image.as_bytes().to_vec(),
                image.content_type(),
            )
            .await
            .map_err(|err| {
                tracing::error!(
                    proposal_id = %cmd.proposal_id,
                    error = %err,
                    "Signature upload failed"
                );
                AccessError::upstream(err.to_string())
            })?;
        let signature_path = format!("{}/{}", self.signatures_bucket, file_name);

        // 4. Re-read the snapshot so concurrent edits to unrelated
        //    fields are not clobbered, then apply the transition.
        let mut proposal = self
            .proposals
            .find_by_id(&cmd.proposal_id)
            .await?
            .ok_or(AccessError::ProposalNotFound(cmd.proposal_id))?;
        proposal.countersign(signature_path.clone(), Timestamp::now())?;

        // 5. One conditional update is the only linearization point. If
        //    it loses a race the uploaded object stays behind as an
        //    orphan and the row is untouched.
        self.proposals
            .update(&proposal)
            .await
            .map_err(|err| match err.code {
                ErrorCode::AlreadySigned => AccessError::already_signed(),
                ErrorCode::ProposalNotFound => AccessError::ProposalNotFound(cmd.proposal_id),
                _ => AccessError::from(err),
            })?;

        // 6. Fresh signed URL for the confirmation view.
        let signature_url = self.asset_urls.display_url(Some(&signature_path)).await;

        Ok(CountersignResult {
            proposal,
            signature_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use crate::domain::proposal::ProposalSnapshot;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockProposalStore {
        proposals: Mutex<Vec<Proposal>>,
        updates: Mutex<Vec<Proposal>>,
        fail_update_code: Option<ErrorCode>,
    }

    impl MockProposalStore {
        fn with(proposals: Vec<Proposal>) -> Self {
            Self {
                proposals: Mutex::new(proposals),
                updates: Mutex::new(Vec::new()),
                fail_update_code: None,
            }
        }

        fn losing_the_race(proposals: Vec<Proposal>) -> Self {
            Self {
                proposals: Mutex::new(proposals),
                updates: Mutex::new(Vec::new()),
                fail_update_code: Some(ErrorCode::AlreadySigned),
            }
        }

        fn updates(&self) -> Vec<Proposal> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProposalStore for MockProposalStore {
        async fn find_by_id(&self, id: &ProposalId) -> Result<Option<Proposal>, DomainError> {
            Ok(self
                .proposals
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id() == id)
                .cloned())
        }

        async fn update(&self, proposal: &Proposal) -> Result<(), DomainError> {
            if let Some(code) = self.fail_update_code {
                return Err(DomainError::new(code, "Simulated update refusal"));
            }
            self.updates.lock().unwrap().push(proposal.clone());
            let mut proposals = self.proposals.lock().unwrap();
            proposals.retain(|p| p.id() != proposal.id());
            proposals.push(proposal.clone());
            Ok(())
        }
    }

    struct MockObjectStore {
        uploads: Mutex<Vec<(String, String, usize, String)>>,
        fail_upload: bool,
    }

    impl MockObjectStore {
        fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail_upload: false,
            }
        }

        fn failing() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail_upload: true,
            }
        }

        fn uploads(&self) -> Vec<(String, String, usize, String)> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStore for MockObjectStore {
        async fn upload(
            &self,
            bucket: &str,
            key: &str,
            bytes: Vec<u8>,
            content_type: &str,
        ) -> Result<(), DomainError> {
            if self.fail_upload {
                return Err(DomainError::new(
                    ErrorCode::StorageError,
                    "Simulated upload failure",
                ));
            }
            self.uploads.lock().unwrap().push((
                bucket.to_string(),
                key.to_string(),
                bytes.len(),
                content_type.to_string(),
            ));
            Ok(())
        }

        async fn create_signed_url(
            &self,
            bucket: &str,
            key: &str,
            _ttl_secs: u64,
        ) -> Result<String, DomainError> {
            Ok(format!("https://store.test/signed/{bucket}/{key}?token=t"))
        }
    }

    fn test_email() -> EmailAddress {
        EmailAddress::try_new("client@example.com").unwrap()
    }

    fn test_proposal() -> Proposal {
        Proposal::new(
            ProposalId::new(),
            ProposalSnapshot::new(json!({ "businessName": "Acme Ltd" })),
            test_email(),
        )
    }

    fn signed_proposal() -> Proposal {
        let mut proposal = test_proposal();
        proposal
            .countersign("signatures/earlier.png".to_string(), Timestamp::now())
            .unwrap();
        proposal
    }

    fn drawn_signature() -> Vec<u8> {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.resize(4096, 0xAB);
        bytes
    }

    struct Fixture {
        proposals: Arc<MockProposalStore>,
        object_store: Arc<MockObjectStore>,
    }

    impl Fixture {
        fn new(proposals: MockProposalStore, object_store: MockObjectStore) -> Self {
            Self {
                proposals: Arc::new(proposals),
                object_store: Arc::new(object_store),
            }
        }

        fn handler(&self) -> CountersignHandler {
            let asset_urls = Arc::new(AssetUrlService::new(
                self.object_store.clone(),
                "signatures",
                60,
            ));
            CountersignHandler::new(
                self.proposals.clone(),
                self.object_store.clone(),
                asset_urls,
                "signatures",
            )
        }
    }

    fn command(proposal_id: ProposalId, image_bytes: Vec<u8>) -> CountersignCommand {
        CountersignCommand {
            proposal_id,
            email: "client@example.com".to_string(),
            image_bytes,
        }
    }

    #[tokio::test]
    async fn countersigns_and_returns_fresh_url() {
        let proposal = test_proposal();
        let proposal_id = *proposal.id();
        let fx = Fixture::new(
            MockProposalStore::with(vec![proposal]),
            MockObjectStore::new(),
        );
        let handler = fx.handler();

        let result = handler
            .handle(command(proposal_id, drawn_signature()))
            .await
            .unwrap();

        assert_eq!(result.proposal.status(), ProposalStatus::Signed);
        assert!(result.proposal.invariant_holds());
        assert!(result.proposal.signed_at().is_some());

        let stored_ref = result.proposal.counterparty_signature_ref().unwrap();
        assert!(stored_ref.starts_with(&format!("signatures/client_{proposal_id}_")));
        assert!(stored_ref.ends_with(".png"));
        // The snapshot carries the store path, not a transient URL.
        assert_eq!(
            result.proposal.content().counterparty_signature_ref(),
            Some(stored_ref)
        );

        let uploads = fx.object_store.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "signatures");
        assert_eq!(uploads[0].2, 4096);
        assert_eq!(uploads[0].3, "image/png");

        let url = result.signature_url.unwrap();
        assert!(url.starts_with("https://store.test/signed/signatures/client_"));
    }

    #[tokio::test]
    async fn each_attempt_uploads_under_a_fresh_name() {
        let first = test_proposal();
        let second = Proposal::new(
            ProposalId::from_uuid(*first.id().as_uuid()),
            ProposalSnapshot::empty(),
            test_email(),
        );
        let proposal_id = *first.id();

        let fx_a = Fixture::new(MockProposalStore::with(vec![first]), MockObjectStore::new());
        let fx_b = Fixture::new(MockProposalStore::with(vec![second]), MockObjectStore::new());

        fx_a.handler()
            .handle(command(proposal_id, drawn_signature()))
            .await
            .unwrap();
        fx_b.handler()
            .handle(command(proposal_id, drawn_signature()))
            .await
            .unwrap();

        let key_a = fx_a.object_store.uploads()[0].1.clone();
        let key_b = fx_b.object_store.uploads()[0].1.clone();
        assert_ne!(key_a, key_b);
    }

    #[tokio::test]
    async fn rejects_unverified_email_before_any_write() {
        let proposal = test_proposal();
        let proposal_id = *proposal.id();
        let fx = Fixture::new(
            MockProposalStore::with(vec![proposal]),
            MockObjectStore::new(),
        );
        let handler = fx.handler();

        let result = handler
            .handle(CountersignCommand {
                proposal_id,
                email: "intruder@example.com".to_string(),
                image_bytes: drawn_signature(),
            })
            .await;

        assert!(matches!(result, Err(AccessError::NotVerified)));
        assert!(fx.object_store.uploads().is_empty());
        assert!(fx.proposals.updates().is_empty());
    }

    #[tokio::test]
    async fn rejects_already_signed_before_upload() {
        let proposal = signed_proposal();
        let proposal_id = *proposal.id();
        let fx = Fixture::new(
            MockProposalStore::with(vec![proposal]),
            MockObjectStore::new(),
        );
        let handler = fx.handler();

        let result = handler.handle(command(proposal_id, drawn_signature())).await;

        assert!(matches!(result, Err(AccessError::AlreadySigned)));
        assert!(fx.object_store.uploads().is_empty());
    }

    #[tokio::test]
    async fn rejects_blank_capture_before_upload() {
        let proposal = test_proposal();
        let proposal_id = *proposal.id();
        let fx = Fixture::new(
            MockProposalStore::with(vec![proposal]),
            MockObjectStore::new(),
        );
        let handler = fx.handler();

        // PNG magic but under the blank-capture floor.
        let mut blank = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        blank.resize(200, 0x00);
        let result = handler.handle(command(proposal_id, blank)).await;

        assert!(matches!(result, Err(AccessError::InvalidSignature { .. })));
        assert!(fx.object_store.uploads().is_empty());
        assert!(fx.proposals.updates().is_empty());
    }

    #[tokio::test]
    async fn upload_failure_leaves_the_proposal_untouched() {
        let proposal = test_proposal();
        let proposal_id = *proposal.id();
        let fx = Fixture::new(
            MockProposalStore::with(vec![proposal]),
            MockObjectStore::failing(),
        );
        let handler = fx.handler();

        let result = handler.handle(command(proposal_id, drawn_signature())).await;

        assert!(matches!(result, Err(AccessError::Upstream(_))));
        assert!(fx.proposals.updates().is_empty());
    }

    #[tokio::test]
    async fn losing_the_update_race_surfaces_already_signed() {
        let proposal = test_proposal();
        let proposal_id = *proposal.id();
        let fx = Fixture::new(
            MockProposalStore::losing_the_race(vec![proposal]),
            MockObjectStore::new(),
        );
        let handler = fx.handler();

        let result = handler.handle(command(proposal_id, drawn_signature())).await;

        // The upload went through; the orphaned object is acceptable.
        assert!(matches!(result, Err(AccessError::AlreadySigned)));
        assert_eq!(fx.object_store.uploads().len(), 1);
    }

    #[tokio::test]
    async fn missing_proposal_surfaces_not_found() {
        let fx = Fixture::new(MockProposalStore::with(vec![]), MockObjectStore::new());
        let handler = fx.handler();

        let result = handler
            .handle(command(ProposalId::new(), drawn_signature()))
            .await;

        assert!(matches!(result, Err(AccessError::ProposalNotFound(_))));
        assert!(fx.object_store.uploads().is_empty());
    }
}
