// Save points, respawn timing and last safe ground

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::{Result, Timer};

pub const SAVED_POS_X: &str = "SavedPosX";
pub const SAVED_POS_Y: &str = "SavedPosY";

/// Small key/value persistence for save data
pub trait SaveStore {
    fn get_f32(&self, key: &str) -> Option<f32>;
    fn set_f32(&mut self, key: &str, value: f32);
    fn has_key(&self, key: &str) -> bool {
        self.get_f32(key).is_some()
    }
    fn delete_key(&mut self, key: &str);
    /// Flush to durable storage
    fn save(&mut self) -> Result<()>;
}

/// Volatile store; what tests and headless runs use
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, f32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn get_f32(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    fn set_f32(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Store backed by a JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, f32>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            BTreeMap::new()
        };
        log::debug!("opened save file {} ({} keys)", path.display(), values.len());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for JsonFileStore {
    fn get_f32(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    fn set_f32(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

pub fn save_respawn_point(store: &mut dyn SaveStore, position: Vec2) -> Result<()> {
    store.set_f32(SAVED_POS_X, position.x);
    store.set_f32(SAVED_POS_Y, position.y);
    store.save()
}

/// The saved respawn point, if both coordinates are present
pub fn load_respawn_point(store: &dyn SaveStore) -> Option<Vec2> {
    Some(Vec2::new(
        store.get_f32(SAVED_POS_X)?,
        store.get_f32(SAVED_POS_Y)?,
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnConfig {
    /// Seconds between death and respawn
    pub delay: f32,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self { delay: 1.5 }
    }
}

/// Death-to-respawn countdown
#[derive(Debug, Clone, Copy)]
pub struct RespawnSystem {
    delay: f32,
    timer: Timer,
}

impl RespawnSystem {
    pub fn new(config: &RespawnConfig) -> Self {
        Self {
            delay: config.delay,
            timer: Timer::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_running()
    }

    pub fn begin(&mut self) {
        if !self.is_pending() {
            log::info!("respawning in {:.1}s", self.delay);
            self.timer.start(self.delay);
        }
    }

    /// Returns true on the tick the player should come back
    pub fn tick(&mut self, dt: f32) -> bool {
        self.timer.tick(dt)
    }

    pub fn remaining(&self) -> f32 {
        self.timer.remaining()
    }
}

/// Last position where the player stood on solid ground
#[derive(Debug, Clone, Copy)]
pub struct SafeGround {
    last: Vec2,
}

impl SafeGround {
    pub fn new(start: Vec2) -> Self {
        Self { last: start }
    }

    pub fn record(&mut self, position: Vec2) {
        self.last = position;
    }

    pub fn last(&self) -> Vec2 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_save_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!(
            "oriental-dungeon-{name}-{}-{nanos}.json",
            std::process::id()
        ))
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_respawn_point(&store), None);
        save_respawn_point(&mut store, Vec2::new(3.5, -1.0)).unwrap();
        assert_eq!(load_respawn_point(&store), Some(Vec2::new(3.5, -1.0)));
        assert!(store.has_key(SAVED_POS_X));
    }

    #[test]
    fn test_partial_save_is_ignored() {
        let mut store = MemoryStore::new();
        store.set_f32(SAVED_POS_X, 1.0);
        assert_eq!(load_respawn_point(&store), None);
    }

    #[test]
    fn test_json_store_persists() {
        let path = temp_save_path("persist");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            assert_eq!(load_respawn_point(&store), None);
            save_respawn_point(&mut store, Vec2::new(12.0, 4.0)).unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(load_respawn_point(&store), Some(Vec2::new(12.0, 4.0)));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("SavedPosX"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let path = temp_save_path("garbage");
        fs::write(&path, "not json").unwrap();
        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(crate::core::GameError::Json(_))));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_respawn_delay() {
        let mut respawn = RespawnSystem::new(&RespawnConfig { delay: 1.0 });
        assert!(!respawn.tick(0.5));
        respawn.begin();
        assert!(respawn.is_pending());
        assert!(!respawn.tick(0.6));
        // A second death report while pending does not restart the clock
        respawn.begin();
        assert!(respawn.tick(0.6));
        assert!(!respawn.is_pending());
    }

    #[test]
    fn test_safe_ground() {
        let mut safe = SafeGround::new(Vec2::ZERO);
        safe.record(Vec2::new(4.0, 1.0));
        assert_eq!(safe.last(), Vec2::new(4.0, 1.0));
    }
}
