//! File-backed catalog loading and record storage for the terminal front end.
use dexle_game::{
    Catalog, CatalogError, CatalogLoader, DailyStats, FreePlayStats, GameStorage, SessionRecord,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";
const DAILY_STATS_FILE: &str = "daily-stats.json";
const FREE_PLAY_STATS_FILE: &str = "free-play-stats.json";

/// Default data directory: `<local data dir>/dexle`, or `./.dexle` when the platform has none.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from(".dexle"), |dir| dir.join("dexle"))
}

/// Catalog source: the bundled list, or a JSON file supplied on the command line.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Bundled,
    File(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogFileError {
    #[error("could not read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl CatalogLoader for CatalogSource {
    type Error = CatalogFileError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        match self {
            Self::Bundled => Ok(Catalog::bundled()?),
            Self::File(path) => {
                let json = fs::read_to_string(path).map_err(|source| CatalogFileError::Io {
                    path: path.clone(),
                    source,
                })?;
                log::debug!("loaded catalog from {}", path.display());
                Ok(Catalog::from_json(&json)?)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed record {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One pretty-printed JSON file per record inside a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, FileStorageError> {
        let path = self.path(file);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(FileStorageError::Io { path, source }),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| FileStorageError::Json { path, source })
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), FileStorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| FileStorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(file);
        let json = serde_json::to_string_pretty(value).map_err(|source| FileStorageError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| FileStorageError::Io { path, source })
    }
}

impl GameStorage for JsonFileStorage {
    type Error = FileStorageError;

    fn load_session(&self) -> Result<Option<SessionRecord>, Self::Error> {
        self.read(SESSION_FILE)
    }

    fn save_session(&self, record: &SessionRecord) -> Result<(), Self::Error> {
        self.write(SESSION_FILE, record)
    }

    fn clear_session(&self) -> Result<(), Self::Error> {
        let path = self.path(SESSION_FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileStorageError::Io { path, source }),
        }
    }

    fn load_daily_stats(&self) -> Result<Option<DailyStats>, Self::Error> {
        self.read(DAILY_STATS_FILE)
    }

    fn save_daily_stats(&self, stats: &DailyStats) -> Result<(), Self::Error> {
        self.write(DAILY_STATS_FILE, stats)
    }

    fn load_free_play_stats(&self) -> Result<Option<FreePlayStats>, Self::Error> {
        self.read(FREE_PLAY_STATS_FILE)
    }

    fn save_free_play_stats(&self, stats: &FreePlayStats) -> Result<(), Self::Error> {
        self.write(FREE_PLAY_STATS_FILE, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn missing_files_read_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested"));
        assert!(storage.load_session().unwrap().is_none());
        assert!(storage.load_daily_stats().unwrap().is_none());
        assert!(storage.load_free_play_stats().unwrap().is_none());
        storage.clear_session().unwrap();
    }

    #[test]
    fn records_survive_a_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        let mut stats = DailyStats::default();
        stats.record(true, 3, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
        storage.save_daily_stats(&stats).unwrap();

        let reopened = JsonFileStorage::new(dir.path());
        assert_eq!(reopened.load_daily_stats().unwrap(), Some(stats));
        let raw = fs::read_to_string(dir.path().join(DAILY_STATS_FILE)).unwrap();
        assert!(raw.contains("\"gamesWon\": 1"));
    }

    #[test]
    fn corrupt_record_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "{ nope").unwrap();
        let storage = JsonFileStorage::new(dir.path());
        assert!(matches!(
            storage.load_session(),
            Err(FileStorageError::Json { .. })
        ));
    }

    #[test]
    fn clearing_removes_the_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        storage.save_session(&SessionRecord::default()).unwrap();
        assert!(dir.path().join(SESSION_FILE).exists());
        storage.clear_session().unwrap();
        assert!(!dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn catalog_file_errors_are_typed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = CatalogSource::File(dir.path().join("none.json"));
        assert!(matches!(
            missing.load_catalog(),
            Err(CatalogFileError::Io { .. })
        ));

        let empty = dir.path().join("empty.json");
        fs::write(&empty, "[]").unwrap();
        assert!(matches!(
            CatalogSource::File(empty).load_catalog(),
            Err(CatalogFileError::Catalog(CatalogError::Empty))
        ));
        assert!(CatalogSource::Bundled.load_catalog().is_ok());
    }
}
