use fxhash::FxHashMap;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;

use super::error::HistoryError;
use super::profile::is_file_safe_tag;

const VERSION_EXTENSION: &str = "config";

/// A store of past supplemental configurations, keyed by unit tag.
pub trait ConfigStore {
    /// The most recently stored configuration for a unit, if any
    fn latest(&self, tag: &str) -> Result<Option<String>, HistoryError>;

    /// Store a new version for a unit
    fn append(&mut self, tag: &str, config: &str) -> Result<(), HistoryError>;

    /// Check that the store can hold versions for `tag`, without storing anything
    fn check_tag(&self, _tag: &str) -> Result<(), HistoryError> {
        Ok(())
    }
}

/// Store `config` only if it differs byte-for-byte from the latest stored version.
///
/// Returns true if a new version was stored.
pub fn write_if_changed<S: ConfigStore + ?Sized>(
    store: &mut S,
    tag: &str,
    config: &str,
) -> Result<bool, HistoryError> {
    if store.latest(tag)?.as_deref() == Some(config) {
        log::info!("Configuration for {tag} is unchanged.");
        return Ok(false);
    }
    store.append(tag, config)?;
    log::info!("Stored a new configuration version for {tag}.");
    Ok(true)
}

/// In-memory history, mostly useful for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    versions: FxHashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All versions of a unit, oldest first
    pub fn versions(&self, tag: &str) -> &[String] {
        self.versions.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl ConfigStore for MemoryStore {
    fn latest(&self, tag: &str) -> Result<Option<String>, HistoryError> {
        Ok(self.versions(tag).last().cloned())
    }

    fn append(&mut self, tag: &str, config: &str) -> Result<(), HistoryError> {
        self.versions
            .entry(tag.to_string())
            .or_default()
            .push(config.to_string());
        Ok(())
    }
}

/// History kept on disk.
///
/// Each unit gets a directory under the root; each version is a file named
/// `{UTC stamp}_{counter}.config`. Versions are ordered by stamp, then by the numeric
/// value of the counter.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open (creating if needed) a history rooted at `root`
    pub fn new(root: &Path) -> Result<Self, HistoryError> {
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn tag_directory(&self, tag: &str) -> Result<PathBuf, HistoryError> {
        if !is_file_safe_tag(tag) {
            return Err(HistoryError::BadTag(tag.to_string()));
        }
        Ok(self.root.join(tag))
    }

    /// Paths of every stored version of a unit, oldest first
    pub fn version_paths(&self, tag: &str) -> Result<Vec<PathBuf>, HistoryError> {
        let tag_dir = self.tag_directory(tag)?;
        if !tag_dir.exists() {
            return Ok(vec![]);
        }
        let mut paths: Vec<PathBuf> = Vec::new();
        for item in tag_dir.read_dir()? {
            let item_path = item?.path();
            if item_path.extension().is_some_and(|ext| ext == VERSION_EXTENSION) {
                paths.push(item_path);
            }
        }
        paths.sort_by_cached_key(|path| version_key(path));
        Ok(paths)
    }
}

/// Sort key of a version file: its stamp and its counter.
///
/// Names that do not parse sort by their full stem with a zero counter.
fn version_key(path: &Path) -> (String, u64) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.rsplit_once('_') {
        Some((stamp, counter)) => match counter.parse::<u64>() {
            Ok(counter) => (stamp.to_string(), counter),
            Err(_) => (stem, 0),
        },
        None => (stem, 0),
    }
}

impl ConfigStore for DirectoryStore {
    fn latest(&self, tag: &str) -> Result<Option<String>, HistoryError> {
        match self.version_paths(tag)?.last() {
            Some(path) => Ok(Some(std::fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }

    fn append(&mut self, tag: &str, config: &str) -> Result<(), HistoryError> {
        let tag_dir = self.tag_directory(tag)?;
        std::fs::create_dir_all(&tag_dir)?;
        let stamp = OffsetDateTime::now_utc()
            .format(format_description!("[year][month][day]T[hour][minute][second]"))?;
        let mut counter: u64 = 0;
        let mut path = tag_dir.join(format!("{stamp}_{counter:03}.{VERSION_EXTENSION}"));
        while path.exists() {
            counter += 1;
            path = tag_dir.join(format!("{stamp}_{counter:03}.{VERSION_EXTENSION}"));
        }
        std::fs::write(&path, config)?;
        Ok(())
    }

    fn check_tag(&self, tag: &str) -> Result<(), HistoryError> {
        self.tag_directory(tag).map(|_| ())
    }
}
