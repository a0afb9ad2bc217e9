//! Tree controller
//!
//! Owns the frame buffer, the effect engine, the base color and the
//! settings store, and implements every operation the control surface
//! exposes. All calls happen on the control loop, so a resize can never
//! overlap an effect tick.

use alloc::vec::Vec;

use embassy_time::Instant;

use crate::OutputDriver;
use crate::color::{BLACK, Rgb};
use crate::config::{DEFAULT_LED_COUNT, EngineConfig, is_valid_led_count};
use crate::effect::EffectId;
use crate::engine::EffectEngine;
use crate::frame::FrameBuffer;
use crate::geometry::Vec3;
use crate::storage::{self, KeyValueStore, PositionMap, StorageKey, StoredSettings};

const DEFAULT_BASE_COLOR: Rgb = Rgb { r: 255, g: 255, b: 255 };

/// Partial base color change, absent channels are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseColorUpdate {
    pub r: Option<u8>,
    pub g: Option<u8>,
    pub b: Option<u8>,
}

impl BaseColorUpdate {
    pub fn apply(self, color: Rgb) -> Rgb {
        Rgb {
            r: self.r.unwrap_or(color.r),
            g: self.g.unwrap_or(color.g),
            b: self.b.unwrap_or(color.b),
        }
    }
}

pub struct TreeController<D: OutputDriver, S: KeyValueStore> {
    frame: FrameBuffer<D>,
    engine: EffectEngine,
    base_color: Rgb,
    store: S,
}

impl<D: OutputDriver, S: KeyValueStore> TreeController<D, S> {
    /// Create a controller with an empty strip
    ///
    /// Call [`restore`](Self::restore) to load the persisted settings.
    pub fn new(driver: D, store: S, config: EngineConfig) -> Self {
        Self {
            frame: FrameBuffer::new(driver),
            engine: EffectEngine::new(config),
            base_color: DEFAULT_BASE_COLOR,
            store,
        }
    }

    /// Restore the persisted state
    ///
    /// Missing entries keep their defaults, a missing LED count falls back to
    /// [`DEFAULT_LED_COUNT`]. The LED count is taken from the stored position
    /// map when one exists.
    pub fn restore(&mut self, now: Instant) {
        let settings = StoredSettings::load(&self.store);

        if let Some(color) = settings.base_color {
            self.base_color = color;
        }

        let count = settings.resolved_led_count().unwrap_or(DEFAULT_LED_COUNT);
        self.frame.resize(count);
        if let Some(positions) = &settings.positions {
            self.apply_positions(positions);
        }
        if let Some(mask) = &settings.mask {
            if !self.frame.load_mask(mask) {
                log!("tree: stored mask does not match {} leds", count);
            }
        }

        log!(
            "tree: restored {} leds, effect {:?}",
            self.frame.len(),
            settings.effect
        );

        match settings.effect {
            Some(effect) if effect != EffectId::None => {
                self.engine.start(effect, now, self.base_color, &mut self.frame);
            }
            _ => self.frame.redraw_all(self.base_color),
        }
    }

    /// Process one frame of the running effect
    pub fn tick(&mut self, now: Instant) {
        self.engine.tick(now, self.base_color, &mut self.frame);
    }

    pub fn led_count(&self) -> usize {
        self.frame.len()
    }

    pub fn base_color(&self) -> Rgb {
        self.base_color
    }

    pub fn current_effect(&self) -> EffectId {
        self.engine.current()
    }

    pub const fn frame(&self) -> &FrameBuffer<D> {
        &self.frame
    }

    pub const fn engine(&self) -> &EffectEngine {
        &self.engine
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Change the number of LEDs
    ///
    /// Returns `false` without touching anything when the count is out of
    /// range. Masks and positions are reset by the resize.
    pub fn set_led_count(&mut self, count: usize, now: Instant) -> bool {
        if !is_valid_led_count(count) {
            return false;
        }
        self.frame.resize(count);
        storage::write_entry(
            &mut self.store,
            StorageKey::LedCount,
            &storage::encode_led_count(count),
        );
        self.persist_mask();
        self.refresh_layout(now);
        true
    }

    /// Replace all LED positions
    ///
    /// The LED count becomes the number of entries. Returns `false` when
    /// that count is out of range.
    pub fn set_led_positions(&mut self, positions: &PositionMap, now: Instant) -> bool {
        let count = positions.len();
        if !is_valid_led_count(count) {
            return false;
        }
        storage::write_entry(
            &mut self.store,
            StorageKey::LedPositions,
            &storage::encode_positions(positions),
        );
        self.frame.resize(count);
        self.apply_positions(positions);
        storage::write_entry(
            &mut self.store,
            StorageKey::LedCount,
            &storage::encode_led_count(count),
        );
        self.persist_mask();
        self.refresh_layout(now);
        true
    }

    /// Stored position blob, as written by the last position update
    pub fn saved_led_positions(&self) -> Option<Vec<u8>> {
        match self.store.load(StorageKey::LedPositions) {
            Ok(blob) => blob,
            Err(err) => {
                log!("tree: failed to read positions: {}", err);
                None
            }
        }
    }

    /// Light or darken individual LEDs
    ///
    /// Stops a running effect first. Listed LEDs are set to the base color
    /// or black (still subject to the mask), unlisted LEDs keep their color,
    /// and out of range indices are skipped.
    pub fn configure_leds(&mut self, leds: &[(usize, bool)]) {
        if self.engine.current() != EffectId::None {
            self.stop_effect();
        }
        for &(index, lit) in leds {
            let color = if lit { self.base_color } else { BLACK };
            self.frame.set_pixel(index, color);
        }
        self.frame.flush();
    }

    /// Enable or disable one LED
    ///
    /// Returns `false` if the index is out of range.
    pub fn set_mask(&mut self, index: usize, enabled: bool) -> bool {
        if !self.frame.set_mask(index, enabled) {
            return false;
        }
        self.persist_mask();
        self.redraw_if_static();
        true
    }

    /// Enable every LED
    pub fn unmask_all(&mut self) {
        self.frame.set_mask_all(true);
        self.persist_mask();
        self.redraw_if_static();
    }

    /// Change some or all channels of the base color
    pub fn set_base_color(&mut self, update: BaseColorUpdate) {
        self.base_color = update.apply(self.base_color);
        storage::write_entry(
            &mut self.store,
            StorageKey::BaseColor,
            &storage::encode_base_color(self.base_color),
        );
        self.redraw_if_static();
    }

    /// Start an effect
    ///
    /// The strip is blacked out once and `None` is persisted before the new
    /// id. Starting [`EffectId::None`] is the same as stopping.
    pub fn start_effect(&mut self, effect: EffectId, now: Instant) {
        if effect == EffectId::None {
            self.stop_effect();
            return;
        }
        self.persist_effect(EffectId::None);
        self.engine.start(effect, now, self.base_color, &mut self.frame);
        self.persist_effect(effect);
    }

    /// Stop the running effect and black out the strip
    pub fn stop_effect(&mut self) {
        self.engine.stop(&mut self.frame);
        self.persist_effect(EffectId::None);
    }

    fn apply_positions(&mut self, positions: &PositionMap) {
        for (&index, &position) in positions {
            self.frame.set_position(index, Vec3::from(position));
        }
    }

    /// Bring the output in line with a new LED layout
    fn refresh_layout(&mut self, now: Instant) {
        if self.engine.current() == EffectId::None {
            self.frame.redraw_all(self.base_color);
        } else {
            self.engine.restart(now, self.base_color, &mut self.frame);
        }
    }

    /// Redraw unless an animated effect owns the strip
    fn redraw_if_static(&mut self) {
        if !self.engine.is_animating() {
            self.frame.redraw_all(self.base_color);
        }
    }

    fn persist_mask(&mut self) {
        let blob = storage::encode_mask(self.frame.mask());
        storage::write_entry(&mut self.store, StorageKey::LedMask, &blob);
    }

    fn persist_effect(&mut self, effect: EffectId) {
        storage::write_entry(&mut self.store, StorageKey::Effect, &storage::encode_effect(effect));
    }
}
