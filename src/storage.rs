use anyhow::{Context, Result};
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;

/// Durable client-local storage: one JSON file per concern under the platform
/// config directory.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage {
    pub fn new() -> Self {
        Self { dir: config_dir() }
    }

    /// Storage rooted at an explicit directory. Used by tests.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load and decode a file. Missing or corrupt files both come back as
    /// `None` so callers fall back to defaults; corruption is logged.
    pub fn load<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.dir.join(file);
        let data = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&data) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("ignoring corrupt {}: {e}", path.display());
                None
            }
        }
    }

    pub fn save<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.dir.join(file);
        let data = serde_json::to_string_pretty(value)?;
        fs::write(&path, data).with_context(|| format!("writing {}", path.display()))
    }

    pub fn remove(&self, file: &str) -> Result<()> {
        let path = self.dir.join(file);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}

fn config_dir() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("clashhub");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join("clashhub");
    }
    PathBuf::from(".clashhub")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Probe {
        label: String,
        count: u32,
    }

    fn temp_storage(tag: &str) -> Storage {
        let dir = std::env::temp_dir().join(format!(
            "clashhub-storage-{tag}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        Storage::at(dir)
    }

    #[test]
    fn save_then_load_round_trips() {
        let storage = temp_storage("roundtrip");
        let probe = Probe { label: "hello".into(), count: 3 };
        storage.save("probe.json", &probe).unwrap();
        assert_eq!(storage.load::<Probe>("probe.json"), Some(probe));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let storage = temp_storage("missing");
        assert_eq!(storage.load::<Probe>("nope.json"), None);
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let storage = temp_storage("corrupt");
        storage.save("bad.json", &"just a string").unwrap();
        assert_eq!(storage.load::<Probe>("bad.json"), None);
    }

    #[test]
    fn remove_is_idempotent() {
        let storage = temp_storage("remove");
        storage.save("gone.json", &Probe { label: "x".into(), count: 1 }).unwrap();
        storage.remove("gone.json").unwrap();
        storage.remove("gone.json").unwrap();
        assert_eq!(storage.load::<Probe>("gone.json"), None);
    }
}
