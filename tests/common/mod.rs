#![allow(dead_code)]

use std::collections::BTreeMap;

use tree_light_composer::storage::{KeyValueStore, StorageError, StorageKey};
use tree_light_composer::{OutputDriver, Rgb};

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Driver that keeps every frame it was asked to write
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub begins: Vec<usize>,
    pub frames: Vec<Vec<Rgb>>,
}

impl RecordingDriver {
    pub fn last_frame(&self) -> Option<&[Rgb]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl OutputDriver for RecordingDriver {
    fn begin(&mut self, led_count: usize) {
        self.begins.push(led_count);
    }

    fn write(&mut self, colors: &[Rgb]) {
        self.frames.push(colors.to_vec());
    }
}

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub entries: BTreeMap<&'static str, Vec<u8>>,
    pub writes: Vec<StorageKey>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn with_entry(mut self, key: StorageKey, value: &[u8]) -> Self {
        self.entries.insert(key.as_str(), value.to_vec());
        self
    }

    pub fn get(&self, key: StorageKey) -> Option<&[u8]> {
        self.entries.get(key.as_str()).map(Vec::as_slice)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Driver);
        }
        Ok(self.entries.get(key.as_str()).cloned())
    }

    fn store(&mut self, key: StorageKey, value: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Busy);
        }
        self.writes.push(key);
        self.entries.insert(key.as_str(), value.to_vec());
        Ok(())
    }
}
