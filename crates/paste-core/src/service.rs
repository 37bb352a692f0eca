use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use paste_blob::{BlobStore, InMemoryBlobStore};
use paste_cache::{HashCache, TtlCache};
use paste_crypto::{generate_credential, SecretHasher};
use paste_store::{InMemoryRecordStore, RecordError, RecordStore};
use paste_types::{Credential, PasteName, PasteRecord, SecretHash};

use crate::config::ServiceConfig;
use crate::error::{PasteError, PasteResult};

/// Upper bound on a single cache call.
const CACHE_BUDGET: Duration = Duration::from_millis(250);

/// Time allowed for the compensating delete, independent of the request
/// deadline (which has usually expired or nearly so when it runs).
const ROLLBACK_BUDGET: Duration = Duration::from_secs(5);

/// The three storage collaborators of [`PasteService`].
#[derive(Clone)]
pub struct Backends {
    pub records: Arc<dyn RecordStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub cache: Arc<dyn HashCache>,
}

impl Backends {
    pub fn new(
        records: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        cache: Arc<dyn HashCache>,
    ) -> Self {
        Self {
            records,
            blobs,
            cache,
        }
    }

    /// In-memory record store, blob store and TTL cache.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(TtlCache::default()),
        )
    }
}

/// Create/read orchestrator.
///
/// Holds no mutable state of its own; it is shared across requests behind
/// an `Arc` and every call is independent.
pub struct PasteService {
    backends: Backends,
    hasher: Arc<dyn SecretHasher>,
    config: ServiceConfig,
}

impl PasteService {
    pub fn new(backends: Backends, hasher: Arc<dyn SecretHasher>, config: ServiceConfig) -> Self {
        Self {
            backends,
            hasher,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    /// Store `text` under `name` and return the credential that unlocks it.
    ///
    /// The credential is generated here and returned exactly once; only its
    /// hash is persisted. If the record or blob write fails, a record that
    /// may have landed is deleted again (only while it still holds this
    /// request's hash) before the error is returned.
    pub async fn create(&self, name: &str, text: &str) -> PasteResult<Credential> {
        const OP: &str = "paste.create";
        let name = PasteName::parse(name)?;
        let deadline = self.deadline();
        info!(op = OP, name = %name, bytes = text.len(), "creating paste");

        if self.step(deadline, OP, self.backends.records.exists(&name)).await? {
            debug!(op = OP, name = %name, "name already taken");
            return Err(PasteError::Conflict {
                name: name.to_string(),
            });
        }

        let credential = generate_credential();
        let secret_hash = self.hash_credential(deadline, &credential).await?;
        let record = PasteRecord::new(name.clone(), secret_hash.clone());

        match self.step(deadline, OP, self.backends.records.put(&record)).await {
            Ok(()) => {}
            Err(PasteError::Records(RecordError::AlreadyExists { .. })) => {
                debug!(op = OP, name = %name, "lost create race");
                return Err(PasteError::Conflict {
                    name: name.to_string(),
                });
            }
            Err(e) => {
                // A timed-out insert may still have committed.
                error!(op = OP, name = %name, error = %e, "record write failed, rolling back record");
                self.rollback(&record).await;
                return Err(e);
            }
        }

        if let Err(e) = self
            .step(deadline, OP, self.backends.blobs.put(&secret_hash, text))
            .await
        {
            error!(op = OP, name = %name, error = %e, "blob write failed, rolling back record");
            self.rollback(&record).await;
            return Err(e);
        }

        info!(op = OP, name = %name, "paste created");
        Ok(credential)
    }

    /// Return the text stored under `name` if `credential` unlocks it.
    ///
    /// A missing name is checked before any verification and reported as
    /// `NotFound`; a present name with the wrong credential is
    /// `AuthFailure`. The cache is consulted first and populated after a
    /// successful record-store read; cache failures only cost latency.
    pub async fn read(&self, name: &str, credential: &Credential) -> PasteResult<String> {
        const OP: &str = "paste.read";
        let name = PasteName::parse(name)?;
        let deadline = self.deadline();
        debug!(op = OP, name = %name, "reading paste");

        if let Some(hash) = self.cached_hash(&name, deadline).await {
            debug!(op = OP, name = %name, "cache hit");
            if !self.verify_credential(deadline, credential, &hash).await? {
                info!(op = OP, name = %name, "credential mismatch");
                return Err(PasteError::AuthFailure);
            }
            return self
                .step(deadline, OP, self.backends.blobs.get(&hash))
                .await
                .inspect_err(|e| error!(op = OP, name = %name, error = %e, "blob read failed"));
        }

        let Some(hash) = self.step(deadline, OP, self.backends.records.get(&name)).await? else {
            info!(op = OP, name = %name, "no such paste");
            return Err(PasteError::NotFound {
                name: name.to_string(),
            });
        };

        if !self.verify_credential(deadline, credential, &hash).await? {
            info!(op = OP, name = %name, "credential mismatch");
            return Err(PasteError::AuthFailure);
        }

        let text = self
            .step(deadline, OP, self.backends.blobs.get(&hash))
            .await
            .inspect_err(|e| error!(op = OP, name = %name, error = %e, "blob read failed"))?;

        self.populate_cache(&name, &hash, deadline).await;
        Ok(text)
    }

    /// Whether a record exists for `name`.
    pub async fn exists(&self, name: &str) -> PasteResult<bool> {
        let name = PasteName::parse(name)?;
        let deadline = self.deadline();
        self.step(deadline, "paste.exists", self.backends.records.exists(&name))
            .await
    }

    /// Check that the record store is reachable.
    pub async fn health(&self) -> PasteResult<()> {
        let deadline = self.deadline();
        self.step(deadline, "paste.health", self.backends.records.health_check())
            .await
    }

    fn deadline(&self) -> Instant {
        let now = Instant::now();
        now.checked_add(self.config.request_timeout())
            .unwrap_or_else(|| now + Duration::from_secs(1))
    }

    async fn step<T, E>(
        &self,
        deadline: Instant,
        op: &'static str,
        fut: impl Future<Output = Result<T, E>>,
    ) -> PasteResult<T>
    where
        PasteError: From<E>,
    {
        match tokio::time::timeout_at(deadline, fut).await {
            Ok(result) => result.map_err(PasteError::from),
            Err(_) => {
                warn!(op, "deadline exceeded");
                Err(PasteError::Timeout { op })
            }
        }
    }

    async fn hash_credential(
        &self,
        deadline: Instant,
        credential: &Credential,
    ) -> PasteResult<SecretHash> {
        let hasher = Arc::clone(&self.hasher);
        let credential = credential.clone();
        let task = tokio::task::spawn_blocking(move || hasher.hash(&credential));
        self.step(deadline, "paste.hash", async {
            task.await
                .map_err(|e| PasteError::Internal(e.to_string()))?
                .map_err(PasteError::from)
        })
        .await
    }

    async fn verify_credential(
        &self,
        deadline: Instant,
        credential: &Credential,
        hash: &SecretHash,
    ) -> PasteResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let credential = credential.clone();
        let hash = hash.clone();
        let task = tokio::task::spawn_blocking(move || hasher.verify(&credential, &hash));
        self.step(deadline, "paste.verify", async {
            task.await
                .map_err(|e| PasteError::Internal(e.to_string()))?
                .map_err(PasteError::from)
        })
        .await
    }

    async fn cached_hash(&self, name: &PasteName, deadline: Instant) -> Option<SecretHash> {
        let budget = deadline.min(Instant::now() + CACHE_BUDGET);
        match tokio::time::timeout_at(budget, self.backends.cache.get(name)).await {
            Ok(Ok(hash)) => hash,
            Ok(Err(e)) => {
                warn!(op = "cache.get", name = %name, error = %e, "cache lookup failed, falling back to records");
                None
            }
            Err(_) => {
                warn!(op = "cache.get", name = %name, "cache lookup timed out, falling back to records");
                None
            }
        }
    }

    async fn populate_cache(&self, name: &PasteName, hash: &SecretHash, deadline: Instant) {
        let budget = deadline.min(Instant::now() + CACHE_BUDGET);
        let ttl = self.config.cache_ttl();
        match tokio::time::timeout_at(budget, self.backends.cache.set(name, hash, ttl)).await {
            Ok(Ok(())) => debug!(op = "cache.set", name = %name, "cached secret hash"),
            Ok(Err(e)) => warn!(op = "cache.set", name = %name, error = %e, "cache write failed"),
            Err(_) => warn!(op = "cache.set", name = %name, "cache write timed out"),
        }
    }

    /// Compensating delete after a failed create. Only removes the record if
    /// it still holds this request's hash. Failures are logged and never
    /// replace the error returned to the caller.
    async fn rollback(&self, record: &PasteRecord) {
        const OP: &str = "paste.rollback";
        let name = &record.name;
        let delete = self.backends.records.delete_if(name, &record.secret_hash);
        match tokio::time::timeout(ROLLBACK_BUDGET, delete).await {
            Ok(Ok(true)) => info!(op = OP, name = %name, "record rolled back"),
            Ok(Ok(false)) => debug!(op = OP, name = %name, "no record of ours to roll back"),
            Ok(Err(e)) => warn!(op = OP, name = %name, error = %e, "rollback failed"),
            Err(_) => warn!(op = OP, name = %name, "rollback timed out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use paste_blob::BlobError;
    use proptest::prelude::*;

    #[tokio::test]
    async fn create_then_read_round_trip() {
        let svc = service(Backends::in_memory());
        let cred = svc.create("note1", "hello world").await.unwrap();
        assert_eq!(cred.as_str().len(), Credential::LEN);

        assert_eq!(svc.read("note1", &cred).await.unwrap(), "hello world");
        // Second read is served through the cache.
        assert_eq!(svc.read("note1", &cred).await.unwrap(), "hello world");
    }

    #[tokio::test]
    async fn hello_world_flow() {
        let svc = service(Backends::in_memory());
        let c1 = svc.create("note1", "hello world").await.unwrap();

        assert_eq!(svc.read("note1", &c1).await.unwrap(), "hello world");
        assert!(matches!(
            svc.read("note1", &Credential::new("wrong")).await,
            Err(PasteError::AuthFailure)
        ));
        assert!(matches!(
            svc.read("missing", &c1).await,
            Err(PasteError::NotFound { name }) if name == "missing"
        ));
    }

    #[tokio::test]
    async fn duplicate_create_conflicts_and_keeps_first() {
        let svc = service(Backends::in_memory());
        let cred = svc.create("dup", "first").await.unwrap();

        assert!(matches!(
            svc.create("dup", "second").await,
            Err(PasteError::Conflict { name }) if name == "dup"
        ));
        assert_eq!(svc.read("dup", &cred).await.unwrap(), "first");
    }

    #[tokio::test]
    async fn wrong_credential_fails_on_both_paths() {
        let svc = service(Backends::in_memory());
        let cred = svc.create("note", "secret text").await.unwrap();
        let wrong = Credential::new("00000000");

        // Cache miss path.
        assert!(matches!(svc.read("note", &wrong).await, Err(PasteError::AuthFailure)));
        // Warm the cache, then the cache-hit path.
        svc.read("note", &cred).await.unwrap();
        assert!(matches!(svc.read("note", &wrong).await, Err(PasteError::AuthFailure)));
    }

    #[tokio::test]
    async fn invalid_name_rejected_without_side_effects() {
        let backends = Backends::in_memory();
        let svc = service(backends.clone());
        assert!(matches!(
            svc.create("", "text").await,
            Err(PasteError::InvalidName(_))
        ));
        assert!(matches!(
            svc.read(" padded ", &Credential::new("x")).await,
            Err(PasteError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn failed_blob_write_rolls_back_record() {
        let records = Arc::new(InMemoryRecordStore::new());
        let svc = service(Backends::new(
            records.clone(),
            Arc::new(FailingBlobStore),
            Arc::new(TtlCache::default()),
        ));

        let err = svc.create("doomed", "text").await.unwrap_err();
        assert!(matches!(err, PasteError::Blobs(BlobError::Io(_))));
        assert!(!svc.exists("doomed").await.unwrap());
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn failed_rollback_does_not_mask_blob_error() {
        let svc = service(Backends::new(
            Arc::new(UndeletableRecordStore::default()),
            Arc::new(FailingBlobStore),
            Arc::new(TtlCache::default()),
        ));

        let err = svc.create("doomed", "text").await.unwrap_err();
        assert!(matches!(err, PasteError::Blobs(_)));
    }

    #[tokio::test]
    async fn name_is_reusable_after_rollback() {
        let records = Arc::new(InMemoryRecordStore::new());
        let failing = service(Backends::new(
            records.clone(),
            Arc::new(FailingBlobStore),
            Arc::new(TtlCache::default()),
        ));
        failing.create("retry", "text").await.unwrap_err();

        let working = service(Backends::new(
            records,
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(TtlCache::default()),
        ));
        let cred = working.create("retry", "text").await.unwrap();
        assert_eq!(working.read("retry", &cred).await.unwrap(), "text");
    }

    #[tokio::test]
    async fn failing_record_store_is_a_backend_error() {
        let svc = service(Backends::new(
            Arc::new(BrokenRecordStore),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(TtlCache::default()),
        ));
        let err = svc.create("x", "t").await.unwrap_err();
        assert!(!err.is_client_error());
        let err = svc.read("x", &Credential::new("c")).await.unwrap_err();
        assert!(matches!(err, PasteError::Records(_)));
    }

    #[tokio::test]
    async fn cache_hit_skips_record_store() {
        let records = Arc::new(CountingRecordStore::default());
        let svc = service(Backends::new(
            records.clone(),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(TtlCache::default()),
        ));
        let cred = svc.create("hot", "text").await.unwrap();

        svc.read("hot", &cred).await.unwrap();
        svc.read("hot", &cred).await.unwrap();
        svc.read("hot", &cred).await.unwrap();
        assert_eq!(records.gets(), 1);
    }

    #[tokio::test]
    async fn cache_is_populated_only_after_successful_read() {
        let cache = Arc::new(TtlCache::default());
        let svc = service(Backends::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryBlobStore::new()),
            cache.clone(),
        ));
        svc.create("note", "text").await.unwrap();
        assert!(cache.is_empty());

        svc.read("note", &Credential::new("wrong")).await.unwrap_err();
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reads_across_cache_ttl() {
        let records = Arc::new(CountingRecordStore::default());
        let svc = service(Backends::new(
            records.clone(),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(TtlCache::default()),
        ));
        let cred = svc.create("note", "text").await.unwrap();

        assert_eq!(svc.read("note", &cred).await.unwrap(), "text");
        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(svc.read("note", &cred).await.unwrap(), "text");
        assert_eq!(records.gets(), 2);
    }

    #[tokio::test]
    async fn disabled_cache_is_transparent() {
        let svc = service(Backends::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(paste_cache::DisabledCache),
        ));
        let cred = svc.create("note1", "hello world").await.unwrap();
        for _ in 0..3 {
            assert_eq!(svc.read("note1", &cred).await.unwrap(), "hello world");
        }
        assert!(matches!(
            svc.read("note1", &Credential::new("wrong")).await,
            Err(PasteError::AuthFailure)
        ));
        assert!(matches!(
            svc.read("missing", &cred).await,
            Err(PasteError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn failing_cache_only_costs_latency() {
        let svc = service(Backends::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(FailingCache),
        ));
        let cred = svc.create("note", "text").await.unwrap();
        assert_eq!(svc.read("note", &cred).await.unwrap(), "text");
        assert_eq!(svc.read("note", &cred).await.unwrap(), "text");
        assert!(matches!(
            svc.read("note", &Credential::new("bad")).await,
            Err(PasteError::AuthFailure)
        ));
    }

    #[tokio::test]
    async fn stalled_blob_write_times_out_and_rolls_back() {
        let records = Arc::new(InMemoryRecordStore::new());
        let svc = PasteService::new(
            Backends::new(
                records.clone(),
                Arc::new(StalledBlobStore),
                Arc::new(TtlCache::default()),
            ),
            fast_hasher(),
            ServiceConfig {
                request_timeout_secs: 1,
                ..Default::default()
            },
        );

        let err = svc.create("slow", "text").await.unwrap_err();
        assert!(matches!(err, PasteError::Timeout { .. }));
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn record_insert_that_commits_then_times_out_is_rolled_back() {
        let svc = PasteService::new(
            Backends::new(
                Arc::new(StallAfterInsertRecordStore::default()),
                Arc::new(InMemoryBlobStore::new()),
                Arc::new(TtlCache::default()),
            ),
            fast_hasher(),
            ServiceConfig {
                request_timeout_secs: 1,
                ..Default::default()
            },
        );

        let err = svc.create("burned", "text").await.unwrap_err();
        assert!(matches!(err, PasteError::Timeout { .. }));
        // The name is free again.
        assert!(!svc.exists("burned").await.unwrap());
    }

    #[tokio::test]
    async fn rollback_leaves_a_concurrent_creators_record_alone() {
        let records = Arc::new(InMemoryRecordStore::new());
        let svc = service(Backends::new(
            records.clone(),
            Arc::new(FailingBlobStore),
            Arc::new(TtlCache::default()),
        ));
        let theirs = PasteRecord::new(
            PasteName::parse("shared").unwrap(),
            SecretHash::new("$argon2id$theirs").unwrap(),
        );
        records.put(&theirs).await.unwrap();

        svc.rollback(&PasteRecord::new(
            theirs.name.clone(),
            SecretHash::new("$argon2id$ours").unwrap(),
        ))
        .await;
        assert_eq!(records.get(&theirs.name).await.unwrap(), Some(theirs.secret_hash));
    }

    #[tokio::test]
    async fn out_of_range_durations_do_not_panic() {
        let svc = PasteService::new(
            Backends::in_memory(),
            fast_hasher(),
            ServiceConfig {
                cache_ttl_secs: u64::MAX,
                request_timeout_secs: u64::MAX,
            },
        );
        let cred = svc.create("big", "text").await.unwrap();
        assert_eq!(svc.read("big", &cred).await.unwrap(), "text");
        assert_eq!(svc.read("big", &cred).await.unwrap(), "text");
    }

    #[tokio::test]
    async fn concurrent_creates_same_name_one_wins() {
        let svc = Arc::new(service(Backends::in_memory()));
        let mut handles = Vec::new();
        for i in 0..8 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                svc.create("race", &format!("text {i}")).await
            }));
        }
        let mut winners = Vec::new();
        for h in handles {
            match h.await.unwrap() {
                Ok(cred) => winners.push(cred),
                Err(PasteError::Conflict { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(winners.len(), 1);
        assert!(svc.read("race", &winners[0]).await.unwrap().starts_with("text "));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn any_text_round_trips(name in "[a-z][a-z0-9_-]{0,30}", text in any::<String>()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let svc = service(Backends::in_memory());
                let cred = svc.create(&name, &text).await.unwrap();
                assert_eq!(svc.read(&name, &cred).await.unwrap(), text);
                assert_eq!(svc.read(&name, &cred).await.unwrap(), text);
            });
        }

        #[test]
        fn foreign_credentials_never_unlock(guess in "[0-9a-f]{8}") {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let svc = service(Backends::in_memory());
                let cred = svc.create("locked", "text").await.unwrap();
                let result = svc.read("locked", &Credential::new(guess.clone())).await;
                if guess == cred.as_str() {
                    assert_eq!(result.unwrap(), "text");
                } else {
                    assert!(matches!(result, Err(PasteError::AuthFailure)));
                }
            });
        }
    }
}
