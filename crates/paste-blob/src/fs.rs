use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use paste_types::SecretHash;

use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// Filesystem blob store.
///
/// Layout mirrors a loose-object directory: the BLAKE3 storage key of the
/// secret hash is split into a two-character shard directory and the
/// remaining 62 characters as the file name.
///
/// ```text
/// <root>/ab/cdef0123...   (one file per paste)
/// ```
///
/// Writes go to a temporary file inside the shard directory, are synced,
/// then renamed into place without clobbering. A failed write drops the
/// temporary file, so readers never observe partial content. If the `put`
/// future is dropped mid-write, the blob is either never persisted or
/// removed again.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: Arc<PathBuf>,
}

impl FsBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> BlobResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        let (shard, rest) = key.split_at(2);
        self.root.join(shard).join(rest)
    }
}

const PENDING: u8 = 0;
const WRITTEN: u8 = 1;
const ABANDONED: u8 = 2;

/// Link between a `put` future and its detached blocking write.
///
/// Dropped while still armed, it marks the write abandoned; if the file had
/// already landed it is removed here instead.
struct WriteTicket {
    state: Arc<AtomicU8>,
    path: PathBuf,
    armed: bool,
}

impl WriteTicket {
    fn new(path: PathBuf) -> Self {
        Self {
            state: Arc::new(AtomicU8::new(PENDING)),
            path,
            armed: true,
        }
    }

    fn state(&self) -> Arc<AtomicU8> {
        Arc::clone(&self.state)
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for WriteTicket {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let abandoned = self
            .state
            .compare_exchange(PENDING, ABANDONED, Ordering::AcqRel, Ordering::Acquire);
        if abandoned.is_err() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => tracing::debug!(path = %self.path.display(), "removed abandoned blob"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to remove abandoned blob")
                }
            }
        }
    }
}

fn write_staged(path: &Path, key: &str, text: &[u8], state: &AtomicU8) -> BlobResult<()> {
    let abandoned = || BlobError::Abandoned {
        key: key.to_string(),
    };
    if state.load(Ordering::Acquire) == ABANDONED {
        return Err(abandoned());
    }

    let dir = path
        .parent()
        .ok_or_else(|| BlobError::Io(std::io::Error::other("blob path has no parent")))?;
    std::fs::create_dir_all(dir)?;

    let mut staged = tempfile::Builder::new()
        .prefix(".staging-")
        .tempfile_in(dir)?;
    staged.write_all(text)?;
    staged.as_file().sync_all()?;

    if state.load(Ordering::Acquire) == ABANDONED {
        return Err(abandoned());
    }
    staged.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == ErrorKind::AlreadyExists {
            BlobError::AlreadyExists {
                key: key.to_string(),
            }
        } else {
            BlobError::Io(e.error)
        }
    })?;

    // The caller may have left between the check above and the rename.
    if state
        .compare_exchange(PENDING, WRITTEN, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        std::fs::remove_file(path)?;
        return Err(abandoned());
    }
    Ok(())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, hash: &SecretHash, text: &str) -> BlobResult<()> {
        let key = hash.storage_key();
        let path = self.blob_path(&key);
        let text = text.as_bytes().to_vec();

        let mut ticket = WriteTicket::new(path.clone());
        let state = ticket.state();
        let written =
            tokio::task::spawn_blocking(move || write_staged(&path, &key, &text, &state)).await;
        ticket.disarm();
        written.map_err(|e| BlobError::Task(e.to_string()))??;

        tracing::debug!(key = %hash.fingerprint(), "blob written");
        Ok(())
    }

    async fn get(&self, hash: &SecretHash) -> BlobResult<String> {
        let key = hash.storage_key();
        let bytes = match tokio::fs::read(self.blob_path(&key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BlobError::NotFound { key });
            }
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes).map_err(|e| BlobError::Corrupt {
            key,
            reason: e.to_string(),
        })
    }
}
