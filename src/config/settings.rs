use crate::core::DEFAULT_MAX_CHUNK_SIZE;
use crate::error::{Result, WeaveError};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_DATA_DIR: &str = "./data";

pub const DATA_DIR_KEY: &str = "WEAVE_DATA_DIR";
pub const KEY_FILE_KEY: &str = "WEAVE_KEY_FILE";
pub const MAX_CHUNK_SIZE_KEY: &str = "WEAVE_MAX_CHUNK_SIZE";

const KNOWN_KEYS: [&str; 3] = [DATA_DIR_KEY, KEY_FILE_KEY, MAX_CHUNK_SIZE_KEY];

pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Seeded from the process environment
    pub fn new() -> Config {
        Config::from_vars(env::vars())
    }

    /// Seeded from arbitrary `(key, value)` pairs; unknown keys are ignored
    pub fn from_vars<I, K, V>(vars: I) -> Config
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = HashMap::new();
        map.insert(DATA_DIR_KEY.to_string(), DEFAULT_DATA_DIR.to_string());
        for (key, value) in vars {
            let key = key.into();
            if KNOWN_KEYS.contains(&key.as_str()) {
                map.insert(key, value.into());
            }
        }

        Config {
            inner: RwLock::new(map),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.inner
            .read()
            .map_err(|_| WeaveError::Config("configuration lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.inner
            .write()
            .map_err(|_| WeaveError::Config("configuration lock poisoned".to_string()))
    }

    pub fn get_data_dir(&self) -> Result<PathBuf> {
        let inner = self.read()?;
        Ok(inner
            .get(DATA_DIR_KEY)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)))
    }

    pub fn set_data_dir(&self, dir: String) -> Result<()> {
        self.write()?.insert(DATA_DIR_KEY.to_string(), dir);
        Ok(())
    }

    pub fn get_key_file(&self) -> Result<Option<PathBuf>> {
        Ok(self.read()?.get(KEY_FILE_KEY).map(PathBuf::from))
    }

    pub fn set_key_file(&self, path: String) -> Result<()> {
        self.write()?.insert(KEY_FILE_KEY.to_string(), path);
        Ok(())
    }

    /// Falls back to [`DEFAULT_MAX_CHUNK_SIZE`]; anything set must be a positive integer.
    pub fn get_max_chunk_size(&self) -> Result<u64> {
        let inner = self.read()?;
        match inner.get(MAX_CHUNK_SIZE_KEY) {
            None => Ok(DEFAULT_MAX_CHUNK_SIZE),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(size) if size > 0 => Ok(size),
                _ => Err(WeaveError::Config(format!(
                    "{MAX_CHUNK_SIZE_KEY} must be a positive integer, got `{raw}`"
                ))),
            },
        }
    }

    pub fn set_max_chunk_size(&self, size: u64) -> Result<()> {
        self.write()?
            .insert(MAX_CHUNK_SIZE_KEY.to_string(), size.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(Vec::<(String, String)>::new());
        assert_eq!(config.get_data_dir().unwrap(), PathBuf::from("./data"));
        assert_eq!(config.get_key_file().unwrap(), None);
        assert_eq!(config.get_max_chunk_size().unwrap(), DEFAULT_MAX_CHUNK_SIZE);
    }

    #[test]
    fn test_values_from_vars() {
        let config = Config::from_vars([
            (DATA_DIR_KEY, "/tmp/weave"),
            (KEY_FILE_KEY, "/keys/me.json"),
            (MAX_CHUNK_SIZE_KEY, "1024"),
            ("HOME", "/root"),
        ]);
        assert_eq!(config.get_data_dir().unwrap(), PathBuf::from("/tmp/weave"));
        assert_eq!(
            config.get_key_file().unwrap(),
            Some(PathBuf::from("/keys/me.json"))
        );
        assert_eq!(config.get_max_chunk_size().unwrap(), 1024);
    }

    #[test]
    fn test_bad_chunk_size() {
        for bad in ["0", "-3", "lots"] {
            let config = Config::from_vars([(MAX_CHUNK_SIZE_KEY, bad)]);
            assert!(matches!(
                config.get_max_chunk_size(),
                Err(WeaveError::Config(_))
            ));
        }
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars([(MAX_CHUNK_SIZE_KEY, "nonsense")]);
        config.set_max_chunk_size(7).unwrap();
        config.set_data_dir("elsewhere".to_string()).unwrap();
        assert_eq!(config.get_max_chunk_size().unwrap(), 7);
        assert_eq!(config.get_data_dir().unwrap(), PathBuf::from("elsewhere"));
    }
}
