//! Integration tests for the vault service, wired against the in-memory
//! metadata stores and a tempdir-rooted local storage backend.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use uuid::Uuid;

use vault_core::config::quota::QuotaConfig;
use vault_core::config::upload::UploadConfig;
use vault_core::error::ErrorKind;
use vault_entity::file::FileVersion;
use vault_entity::owner::Owner;
use vault_entity::store::OwnerStore;
use vault_service::{UploadRequest, VaultService};
use vault_storage::LocalStorageBackend;
use vault_store::{MemoryOwnerStore, MemoryVersionStore};

struct TestVault {
    service: VaultService,
    owners: Arc<MemoryOwnerStore>,
    _root: tempfile::TempDir,
}

impl TestVault {
    async fn new() -> Self {
        Self::with_upload_config(UploadConfig::default()).await
    }

    async fn with_upload_config(upload_config: UploadConfig) -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let storage = Arc::new(
            LocalStorageBackend::new(root.path().to_str().unwrap())
                .await
                .expect("local backend"),
        );
        let owners = Arc::new(MemoryOwnerStore::new());
        let service = VaultService::new(
            Arc::new(MemoryVersionStore::new()),
            owners.clone(),
            storage,
            upload_config,
            QuotaConfig::default(),
        );
        Self {
            service,
            owners,
            _root: root,
        }
    }

    async fn seed_owner(&self, id: &str, credits: i32, limit_bytes: i64) {
        self.owners
            .save(&Owner::new(id, credits, limit_bytes))
            .await
            .expect("seed owner");
    }

    async fn used_bytes(&self, id: &str) -> i64 {
        self.service.get_owner(id).await.expect("owner").used_bytes
    }
}

fn request(filename: &str, content_type: &str, data: &[u8]) -> UploadRequest {
    UploadRequest {
        original_filename: filename.to_string(),
        content_type: content_type.to_string(),
        data: Bytes::copy_from_slice(data),
    }
}

fn payload(size: usize) -> Vec<u8> {
    vec![b'x'; size]
}

async fn collect(mut stream: vault_core::traits::storage::ByteStream) -> Vec<u8> {
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        buf.extend_from_slice(&chunk.expect("stream chunk"));
    }
    buf
}

/// One live latest per lineage, as long as the lineage has live records.
fn assert_single_latest(lineage: &[FileVersion]) {
    let live: Vec<&FileVersion> = lineage.iter().filter(|r| !r.deleted).collect();
    if !live.is_empty() {
        let latest_count = live.iter().filter(|r| r.is_latest).count();
        assert_eq!(latest_count, 1, "lineage must have exactly one live latest");
    }
}

#[tokio::test]
async fn test_upload_download_round_trip() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1_000_000).await;

    let content = b"dear hiring manager";
    let record = vault
        .service
        .upload("alice", request("resume.pdf", "application/pdf", content))
        .await
        .unwrap();

    assert_eq!(record.version, 1);
    assert!(record.is_latest);
    assert_eq!(record.size_bytes, content.len() as i64);

    let download = vault.service.download("alice", record.id).await.unwrap();
    assert_eq!(download.original_filename, "resume.pdf");
    assert_eq!(download.content_type, "application/pdf");
    assert_eq!(collect(download.stream).await, content);
}

#[tokio::test]
async fn test_versioning_chain() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1_000_000).await;

    let mut last = None;
    for round in 1..=3 {
        let record = vault
            .service
            .upload(
                "alice",
                request("a.txt", "text/plain", format!("round {round}").as_bytes()),
            )
            .await
            .unwrap();
        assert_eq!(record.version, round);
        last = Some(record);
    }
    let last = last.unwrap();

    let lineage = vault.service.get_versions("alice", last.id).await.unwrap();
    assert_eq!(lineage.len(), 3);

    let versions: Vec<i32> = lineage.iter().map(|r| r.version).collect();
    assert_eq!(versions, vec![3, 2, 1]);

    for record in &lineage {
        assert_eq!(record.is_latest, record.version == 3);
        assert!(!record.deleted);
    }
    assert_single_latest(&lineage);

    // Download resolves the latest version's content.
    let download = vault.service.download("alice", last.id).await.unwrap();
    assert_eq!(collect(download.stream).await, b"round 3");
}

#[tokio::test]
async fn test_quota_scenario() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1000).await;

    let v1 = vault
        .service
        .upload("alice", request("r.pdf", "application/pdf", &payload(600)))
        .await
        .unwrap();
    assert_eq!(v1.version, 1);
    assert!(v1.is_latest);
    assert_eq!(vault.used_bytes("alice").await, 600);

    let v2 = vault
        .service
        .upload("alice", request("r.pdf", "application/pdf", &payload(300)))
        .await
        .unwrap();
    assert_eq!(v2.version, 2);
    assert!(v2.is_latest);
    assert_eq!(vault.used_bytes("alice").await, 900);

    let lineage = vault.service.get_versions("alice", v2.id).await.unwrap();
    assert!(!lineage.iter().find(|r| r.version == 1).unwrap().is_latest);

    let err = vault
        .service
        .upload("alice", request("r.pdf", "application/pdf", &payload(200)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::QuotaExceeded);

    // The rejection left everything untouched.
    assert_eq!(vault.used_bytes("alice").await, 900);
    let lineage = vault.service.get_versions("alice", v2.id).await.unwrap();
    assert_eq!(lineage.len(), 2);
    assert!(lineage.iter().find(|r| r.version == 2).unwrap().is_latest);
}

#[tokio::test]
async fn test_soft_delete_promotes_previous_version() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1_000_000).await;

    let mut records = Vec::new();
    for round in 1..=3 {
        records.push(
            vault
                .service
                .upload(
                    "alice",
                    request("a.txt", "text/plain", &payload(10 * round)),
                )
                .await
                .unwrap(),
        );
    }
    let used_before = vault.used_bytes("alice").await;

    vault.service.soft_delete("alice", records[2].id).await.unwrap();

    let lineage = vault
        .service
        .get_versions("alice", records[2].id)
        .await
        .unwrap();
    let v3 = lineage.iter().find(|r| r.version == 3).unwrap();
    let v2 = lineage.iter().find(|r| r.version == 2).unwrap();
    assert!(v3.deleted);
    assert!(!v3.is_latest);
    assert!(v3.deleted_at.is_some());
    assert!(v2.is_latest);
    assert_single_latest(&lineage);

    assert_eq!(
        vault.used_bytes("alice").await,
        used_before - records[2].size_bytes
    );

    // A non-latest record is not directly deletable.
    let err = vault
        .service
        .soft_delete("alice", records[0].id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_soft_delete_last_live_version_empties_lineage() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1_000_000).await;

    let record = vault
        .service
        .upload("alice", request("only.txt", "text/plain", b"once"))
        .await
        .unwrap();

    vault.service.soft_delete("alice", record.id).await.unwrap();

    assert!(vault.service.list_files("alice").await.unwrap().is_empty());
    assert_eq!(vault.used_bytes("alice").await, 0);

    let lineage = vault.service.get_versions("alice", record.id).await.unwrap();
    assert_eq!(lineage.len(), 1);
    assert!(lineage[0].deleted);

    // Deleting it again resolves nothing.
    let err = vault
        .service
        .soft_delete("alice", record.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_restore_reinstates_as_sole_latest() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1_000_000).await;

    let v1 = vault
        .service
        .upload("alice", request("a.txt", "text/plain", &payload(100)))
        .await
        .unwrap();
    let v2 = vault
        .service
        .upload("alice", request("a.txt", "text/plain", &payload(40)))
        .await
        .unwrap();

    // Delete v2; v1 gets promoted.
    vault.service.soft_delete("alice", v2.id).await.unwrap();
    let used_after_delete = vault.used_bytes("alice").await;
    assert_eq!(used_after_delete, 100);

    // Restore v2; it becomes the sole latest again and its bytes count.
    let restored = vault.service.restore("alice", v2.id).await.unwrap();
    assert_eq!(restored.version, 2);
    assert!(restored.is_latest);
    assert!(!restored.deleted);
    assert!(restored.deleted_at.is_none());

    let lineage = vault.service.get_versions("alice", v2.id).await.unwrap();
    assert_single_latest(&lineage);
    assert!(!lineage.iter().find(|r| r.version == 1).unwrap().is_latest);
    assert_eq!(vault.used_bytes("alice").await, 140);

    // Restored versions download normally again.
    let download = vault.service.download("alice", v2.id).await.unwrap();
    assert_eq!(collect(download.stream).await.len(), 40);

    // v1 is live but no longer latest, so it is not restorable.
    let err = vault.service.restore("alice", v1.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_download_requires_live_latest_owned_record() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1_000_000).await;
    vault.seed_owner("mallory", 10, 1_000_000).await;

    let v1 = vault
        .service
        .upload("alice", request("a.txt", "text/plain", b"one"))
        .await
        .unwrap();
    let v2 = vault
        .service
        .upload("alice", request("a.txt", "text/plain", b"two"))
        .await
        .unwrap();

    // Superseded version.
    let err = vault.service.download("alice", v1.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Someone else's file.
    let err = vault.service.download("mallory", v2.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Unknown id.
    let err = vault
        .service
        .download("alice", Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Deleted latest.
    vault.service.soft_delete("alice", v2.id).await.unwrap();
    let err = vault.service.download("alice", v2.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_upload_validation() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1_000_000).await;

    let err = vault
        .service
        .upload("alice", request("a.txt", "text/plain", b""))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .service
        .upload("alice", request("   ", "text/plain", b"data"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .service
        .upload("nobody", request("a.txt", "text/plain", b"data"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_upload_size_and_type_limits() {
    let upload_config = UploadConfig {
        max_size_bytes: 10,
        allowed_content_types: vec!["text/plain".to_string()],
    };
    let vault = TestVault::with_upload_config(upload_config).await;
    vault.seed_owner("alice", 10, 1_000_000).await;

    let err = vault
        .service
        .upload("alice", request("big.txt", "text/plain", &payload(11)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileTooLarge);

    let err = vault
        .service
        .upload("alice", request("pic.png", "image/png", &payload(5)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Nothing was recorded or counted.
    assert!(vault.service.list_files("alice").await.unwrap().is_empty());
    assert_eq!(vault.used_bytes("alice").await, 0);

    vault
        .service
        .upload("alice", request("ok.txt", "text/plain", &payload(10)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_files_is_a_flat_live_feed() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1_000_000).await;

    vault
        .service
        .upload("alice", request("a.txt", "text/plain", b"a1"))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    vault
        .service
        .upload("alice", request("a.txt", "text/plain", b"a2"))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    vault
        .service
        .upload("alice", request("b.txt", "text/plain", b"b1"))
        .await
        .unwrap();

    let listing = vault.service.list_files("alice").await.unwrap();

    // Superseded-but-live versions are listed too, newest upload first.
    assert_eq!(listing.len(), 3);
    assert_eq!(listing[0].original_filename, "b.txt");
    assert_eq!(listing[1].original_filename, "a.txt");
    assert_eq!(listing[1].version, 2);
    assert_eq!(listing[2].version, 1);

    // Other owners see nothing.
    assert!(vault.service.list_files("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_versions_requires_ownership() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1_000_000).await;

    let record = vault
        .service
        .upload("alice", request("a.txt", "text/plain", b"data"))
        .await
        .unwrap();

    let err = vault
        .service
        .get_versions("mallory", record.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // A deleted record still resolves its lineage for the owner.
    vault.service.soft_delete("alice", record.id).await.unwrap();
    let lineage = vault.service.get_versions("alice", record.id).await.unwrap();
    assert_eq!(lineage.len(), 1);
    assert!(lineage[0].deleted);
}

#[tokio::test]
async fn test_spend_credits_for_storage() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 1000).await;

    let owner = vault
        .service
        .spend_credits_for_storage("alice", 2)
        .await
        .unwrap();
    assert_eq!(owner.credits, 8);
    assert_eq!(owner.limit_bytes, 1000 + 2 * 100 * 1024 * 1024);

    let err = vault
        .service
        .spend_credits_for_storage("alice", 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .service
        .spend_credits_for_storage("alice", 100)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InsufficientCredits);

    // Failures left the ledger untouched.
    let owner = vault.service.get_owner("alice").await.unwrap();
    assert_eq!(owner.credits, 8);

    // The upgrade alias spends the same way.
    let owner = vault.service.upgrade_storage("alice", 1).await.unwrap();
    assert_eq!(owner.credits, 7);
    assert_eq!(owner.limit_bytes, 1000 + 3 * 100 * 1024 * 1024);
}

#[tokio::test]
async fn test_upgraded_limit_admits_previously_rejected_upload() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 100).await;

    let err = vault
        .service
        .upload("alice", request("big.bin", "application/octet-stream", &payload(200)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::QuotaExceeded);

    vault
        .service
        .spend_credits_for_storage("alice", 1)
        .await
        .unwrap();

    vault
        .service
        .upload("alice", request("big.bin", "application/octet-stream", &payload(200)))
        .await
        .unwrap();
    assert_eq!(vault.used_bytes("alice").await, 200);
}

#[tokio::test]
async fn test_concurrent_uploads_keep_lineage_invariants() {
    let vault = TestVault::new().await;
    vault.seed_owner("alice", 10, 100_000_000).await;
    let service = Arc::new(vault.service.clone());

    let mut handles = Vec::new();
    for round in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .upload(
                    "alice",
                    UploadRequest {
                        original_filename: "contended.txt".to_string(),
                        content_type: "text/plain".to_string(),
                        data: Bytes::from(format!("payload {round}")),
                    },
                )
                .await
        }));
    }

    let mut last_id = None;
    for handle in handles {
        let record = handle.await.expect("join").expect("upload");
        last_id = Some(record.id);
    }

    let lineage = vault
        .service
        .get_versions("alice", last_id.unwrap())
        .await
        .unwrap();
    assert_eq!(lineage.len(), 8);

    // Strictly increasing, never reused, starting at 1.
    let mut versions: Vec<i32> = lineage.iter().map(|r| r.version).collect();
    versions.sort_unstable();
    assert_eq!(versions, (1..=8).collect::<Vec<i32>>());

    assert_single_latest(&lineage);
    assert_eq!(
        lineage.iter().filter(|r| r.is_latest).count(),
        1,
        "exactly one latest across the whole lineage"
    );
}
