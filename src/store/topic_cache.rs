use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::error::RemoteError;
use crate::model::CodingProblem;
use crate::remote::RemoteSource;
use crate::store::json_store::JsonStore;

pub type TopicMap = BTreeMap<String, Vec<CodingProblem>>;

/// Where the cache lives between runs. Reads are wholesale; a missing or
/// corrupt backing store loads as an empty map.
pub trait CacheBackend: Send {
    fn load(&self) -> TopicMap;
    fn save(&self, map: &TopicMap) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-local backend. Clones share the same storage, so a test can
/// "restart" by opening a second cache over a clone.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    saved: Arc<Mutex<TopicMap>>,
}

impl CacheBackend for MemoryBackend {
    fn load(&self) -> TopicMap {
        self.saved.lock().map(|m| m.clone()).unwrap_or_default()
    }

    fn save(&self, map: &TopicMap) -> Result<()> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| anyhow::anyhow!("memory backend poisoned"))?;
        *saved = map.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save(&TopicMap::new())
    }
}

/// One JSON file holding the whole map.
pub struct JsonFileBackend {
    store: JsonStore,
    file_name: String,
}

impl JsonFileBackend {
    pub fn new(path: &Path) -> Result<Self> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| anyhow::anyhow!("cache path has no file name: {}", path.display()))?;
        Ok(Self {
            store: JsonStore::with_base_dir(dir.to_path_buf())?,
            file_name,
        })
    }
}

impl CacheBackend for JsonFileBackend {
    fn load(&self) -> TopicMap {
        self.store.load(&self.file_name)
    }

    fn save(&self, map: &TopicMap) -> Result<()> {
        self.store.save(&self.file_name, map)
    }

    fn clear(&self) -> Result<()> {
        self.store.remove(&self.file_name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Network,
}

/// Problem lists by topic name. Entries are never expired; `purge` drops
/// everything, in memory and on disk.
pub struct TopicCache {
    entries: TopicMap,
    backend: Box<dyn CacheBackend>,
}

impl TopicCache {
    pub fn open(backend: Box<dyn CacheBackend>) -> Self {
        let entries = backend.load();
        tracing::info!(topics = entries.len(), "topic cache loaded");
        Self { entries, backend }
    }

    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryBackend::default()))
    }

    pub fn get(&self, topic: &str) -> Option<&[CodingProblem]> {
        self.entries.get(topic).map(Vec::as_slice)
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.entries.contains_key(topic)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store `problems` under `topic` and persist the whole map. A failed
    /// write is logged; the in-memory entry is kept.
    pub fn set(&mut self, topic: &str, problems: Vec<CodingProblem>) {
        self.entries.insert(topic.to_string(), problems);
        if let Err(e) = self.backend.save(&self.entries) {
            tracing::warn!(topic, error = %e, "failed to persist topic cache");
        }
    }

    pub fn purge(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        if let Err(e) = self.backend.clear() {
            tracing::warn!(error = %e, "failed to clear persisted topic cache");
        }
        tracing::info!(dropped, "topic cache purged");
    }

    /// Owned copy of the cached problems for `topic`, if any.
    pub fn cached(&self, topic: &str) -> Option<Vec<CodingProblem>> {
        let problems = self.get(topic)?.to_vec();
        tracing::debug!(topic, "topic cache hit");
        Some(problems)
    }

    /// Record a freshly fetched problem set.
    pub fn store(&mut self, topic: &str, problems: Vec<CodingProblem>) {
        tracing::info!(topic, count = problems.len(), "topic fetched");
        self.set(topic, problems);
    }

    /// Cached problems for `topic`, or fetch, store and return them. A
    /// failed fetch leaves the cache untouched.
    pub fn fetch_topic(
        &mut self,
        topic: &str,
        remote: &dyn RemoteSource,
    ) -> Result<(Vec<CodingProblem>, FetchSource), RemoteError> {
        if let Some(problems) = self.cached(topic) {
            return Ok((problems, FetchSource::Cache));
        }
        let problems = remote.fetch_coding(topic)?;
        self.store(topic, problems.clone());
        Ok((problems, FetchSource::Network))
    }
}
