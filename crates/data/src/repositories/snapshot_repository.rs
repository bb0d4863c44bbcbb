//! JSON snapshot of the whole ledger store.

use crate::error::DataError;
use pool_ledger_engine::store::LedgerSnapshot;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Reads and writes a [`LedgerSnapshot`] file.
///
/// Saves go to a sibling temp file that is then renamed over the target, so
/// readers only ever see a complete snapshot.
#[derive(Debug)]
pub struct SnapshotRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SnapshotRepository {
    /// Creates a repository for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Snapshot file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the snapshot, `None` if no file exists yet.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded.
    pub async fn load(&self) -> Result<Option<LedgerSnapshot>, DataError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot on disk");
                return Ok(None);
            }
            Err(err) => return Err(DataError::io(&self.path, err)),
        };
        let snapshot: LedgerSnapshot = serde_json::from_slice(&bytes)?;
        info!(
            path = %self.path.display(),
            pools = snapshot.pools.len(),
            "Snapshot loaded"
        );
        Ok(Some(snapshot))
    }

    /// Writes the snapshot atomically.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be encoded or written.
    pub async fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), DataError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.temp_path();

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| DataError::io(parent, err))?;
        }
        fs::write(&tmp, &bytes)
            .await
            .map_err(|err| DataError::io(&tmp, err))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| DataError::io(&self.path, err))?;

        debug!(
            path = %self.path.display(),
            pools = snapshot.pools.len(),
            bytes = bytes.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_ledger_domain::entities::{Deposit, Pool};
    use pool_ledger_domain::enums::RiskType;
    use pool_ledger_domain::value_objects::{PoolId, Principal, ProposalId, TokenAmount};
    use pool_ledger_engine::access::AccessConfig;
    use pool_ledger_engine::store::PoolEntry;

    fn sample() -> LedgerSnapshot {
        let mut pool = Pool::new(PoolId(0), "P1", RiskType::Stablecoin, 1000, 30, 10);
        let lp = Principal::from("alice");
        let deposit = Deposit::open(lp.clone(), PoolId(0), TokenAmount::from(1500u64), 10, 30)
            .unwrap();
        pool.deposits.insert(lp, deposit);
        pool.tvl = TokenAmount::from(1500u64);
        pool.tcp = TokenAmount::from(1500u64);
        let mut entry = PoolEntry::new(pool);
        entry.settled_proposals.insert(ProposalId(4));
        LedgerSnapshot {
            next_pool_id: 1,
            pools: vec![entry],
            access: Some(AccessConfig::with_owner(Principal::from("owner"))),
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SnapshotRepository::new(dir.path().join("ledger.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SnapshotRepository::new(dir.path().join("state").join("ledger.json"));
        let snapshot = sample();

        repo.save(&snapshot).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(snapshot));
        assert!(!dir.path().join("state").join("ledger.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_amounts_stored_as_strings() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SnapshotRepository::new(dir.path().join("ledger.json"));
        repo.save(&sample()).await.unwrap();

        let raw = std::fs::read_to_string(repo.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["pools"][0]["pool"]["tvl"], "1500");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let repo = SnapshotRepository::new(path);
        assert!(matches!(repo.load().await, Err(DataError::Format(_))));
    }
}
