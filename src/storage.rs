//! Persistent settings
//!
//! The storage itself (flash, NVS, a file on the host) is an external
//! collaborator behind [`KeyValueStore`]. This module owns the keys and the
//! encoding of each stored value.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::color::{Rgb, rgb_from_bytes, rgb_to_bytes};
use crate::config::is_valid_led_count;
use crate::effect::EffectId;

/// Stored LED positions, keyed by LED index
pub type PositionMap = BTreeMap<usize, [f32; 3]>;

/// Error type for the storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is busy")]
    Busy,
    #[error("storage driver error")]
    Driver,
    #[error("stored value is malformed")]
    Malformed,
}

/// Entries the controller persists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    LedCount,
    LedPositions,
    LedMask,
    BaseColor,
    Effect,
}

impl StorageKey {
    pub const ALL: [Self; 5] = [
        Self::LedCount,
        Self::LedPositions,
        Self::LedMask,
        Self::BaseColor,
        Self::Effect,
    ];

    /// Key name in the underlying store
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LedCount => "num_leds",
            Self::LedPositions => "led_positions",
            Self::LedMask => "led_mask",
            Self::BaseColor => "base_rgb",
            Self::Effect => "effect",
        }
    }
}

/// Blocking key-value storage
///
/// Calls are made inline from the control loop.
pub trait KeyValueStore {
    /// Read a value, `Ok(None)` if the key was never written
    fn load(&self, key: StorageKey) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write a value, replacing any previous one
    fn store(&mut self, key: StorageKey, value: &[u8]) -> Result<(), StorageError>;
}

/// Everything restored at startup
///
/// Entries that are missing, unreadable or malformed are `None`.
#[derive(Debug, Clone, Default)]
pub struct StoredSettings {
    pub led_count: Option<usize>,
    pub positions: Option<PositionMap>,
    pub mask: Option<Vec<bool>>,
    pub base_color: Option<Rgb>,
    pub effect: Option<EffectId>,
}

impl StoredSettings {
    /// Read all entries from the store
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        Self {
            led_count: read_entry(store, StorageKey::LedCount, decode_led_count),
            positions: read_entry(store, StorageKey::LedPositions, decode_positions),
            mask: read_entry(store, StorageKey::LedMask, decode_mask),
            base_color: read_entry(store, StorageKey::BaseColor, decode_base_color),
            effect: read_entry(store, StorageKey::Effect, decode_effect),
        }
    }

    /// LED count to configure
    ///
    /// A stored position map wins over a separately stored count.
    pub fn resolved_led_count(&self) -> Option<usize> {
        match &self.positions {
            Some(positions) if is_valid_led_count(positions.len()) => Some(positions.len()),
            _ => self.led_count,
        }
    }
}

fn read_entry<S, T>(store: &S, key: StorageKey, decode: fn(&[u8]) -> Option<T>) -> Option<T>
where
    S: KeyValueStore,
{
    let bytes = match store.load(key) {
        Ok(bytes) => bytes?,
        Err(err) => {
            log!("storage: failed to read {}: {}", key.as_str(), err);
            return None;
        }
    };
    let value = decode(&bytes);
    if value.is_none() {
        log!("storage: ignoring malformed {}", key.as_str());
    }
    value
}

/// Write an entry, logging failures
///
/// In-memory state stays authoritative, so a failed write is not an error
/// for the caller.
pub fn write_entry<S: KeyValueStore>(store: &mut S, key: StorageKey, value: &[u8]) {
    if let Err(err) = store.store(key, value) {
        log!("storage: failed to write {}: {}", key.as_str(), err);
    }
}

#[allow(clippy::cast_possible_truncation)]
pub fn encode_led_count(count: usize) -> [u8; 2] {
    (count.min(usize::from(u16::MAX)) as u16).to_le_bytes()
}

pub fn decode_led_count(bytes: &[u8]) -> Option<usize> {
    let raw: [u8; 2] = bytes.try_into().ok()?;
    let count = usize::from(u16::from_le_bytes(raw));
    is_valid_led_count(count).then_some(count)
}

pub fn encode_positions(positions: &PositionMap) -> Vec<u8> {
    serde_json::to_vec(positions).unwrap_or_default()
}

pub fn decode_positions(bytes: &[u8]) -> Option<PositionMap> {
    serde_json::from_slice(bytes).ok()
}

pub fn encode_mask(mask: &[bool]) -> Vec<u8> {
    serde_json::to_vec(mask).unwrap_or_default()
}

pub fn decode_mask(bytes: &[u8]) -> Option<Vec<bool>> {
    serde_json::from_slice(bytes).ok()
}

pub const fn encode_base_color(color: Rgb) -> [u8; 3] {
    rgb_to_bytes(color)
}

pub fn decode_base_color(bytes: &[u8]) -> Option<Rgb> {
    let raw: [u8; 3] = bytes.try_into().ok()?;
    Some(rgb_from_bytes(raw))
}

pub const fn encode_effect(effect: EffectId) -> [u8; 1] {
    [effect.as_raw()]
}

pub fn decode_effect(bytes: &[u8]) -> Option<EffectId> {
    match bytes {
        [raw] => EffectId::from_raw(*raw),
        _ => None,
    }
}
