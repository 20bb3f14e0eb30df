use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::loader::{load_csv_bytes, Upload};
use super::model::Table;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// FileIdentity – what makes two uploads "the same file"
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub name: String,
    pub size_bytes: u64,
    /// `sha256:<hex>` of the content.
    pub hash: String,
}

impl FileIdentity {
    pub fn of(upload: &Upload) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&upload.bytes);
        FileIdentity {
            name: upload.name.clone(),
            size_bytes: upload.bytes.len() as u64,
            hash: format!("sha256:{:x}", hasher.finalize()),
        }
    }
}

// ---------------------------------------------------------------------------
// TableCache – one parsed table, keyed on the most recent upload
// ---------------------------------------------------------------------------

/// Single-entry memo of the last successfully parsed upload.
///
/// Presenting a different identity replaces the entry. Failed parses are not
/// stored, so the previous entry is dropped and the next attempt re-parses.
#[derive(Debug, Default)]
pub struct TableCache {
    entry: Option<(FileIdentity, Arc<Table>)>,
    parses: usize,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table for `upload`, parsing only when its identity differs
    /// from the cached one.
    pub fn load(&mut self, upload: &Upload) -> Result<Arc<Table>, LoadError> {
        let identity = FileIdentity::of(upload);

        if let Some((cached_id, table)) = &self.entry {
            if *cached_id == identity {
                log::debug!("table cache hit for {}", identity.name);
                return Ok(Arc::clone(table));
            }
        }

        log::debug!("table cache miss for {} ({})", identity.name, identity.hash);
        self.entry = None;
        self.parses += 1;
        let table = Arc::new(load_csv_bytes(&upload.bytes)?);
        self.entry = Some((identity, Arc::clone(&table)));
        Ok(table)
    }

    /// Identity of the cached table, if any.
    pub fn identity(&self) -> Option<&FileIdentity> {
        self.entry.as_ref().map(|(id, _)| id)
    }

    /// Number of times an upload was actually parsed.
    pub fn parse_count(&self) -> usize {
        self.parses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content: &str) -> Upload {
        Upload {
            name: name.to_string(),
            bytes: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn same_upload_is_parsed_once() {
        let mut cache = TableCache::new();
        let file = upload("a.csv", "Year,Term\n2021,Fall\n");

        let first = cache.load(&file).unwrap();
        let second = cache.load(&file).unwrap();

        assert_eq!(cache.parse_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn new_identity_invalidates_entry() {
        let mut cache = TableCache::new();
        cache.load(&upload("a.csv", "Year\n2021\n")).unwrap();
        let table = cache.load(&upload("a.csv", "Year\n2022\n")).unwrap();

        assert_eq!(cache.parse_count(), 2);
        assert_eq!(table.categories("Year"), vec!["2022"]);
        assert_eq!(cache.identity().map(|id| id.size_bytes), Some(10));
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = TableCache::new();
        cache.load(&upload("a.csv", "Year\n2021\n")).unwrap();

        assert!(cache.load(&upload("bad.csv", "")).is_err());
        assert!(cache.identity().is_none());
        assert!(cache.load(&upload("bad.csv", "")).is_err());
        assert_eq!(cache.parse_count(), 3);
    }

    #[test]
    fn identity_hashes_content() {
        let id = FileIdentity::of(&upload("x.csv", ""));
        assert_eq!(
            id.hash,
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
