#![no_std]

extern crate alloc;

#[macro_use]
mod log;

pub mod color;
pub mod config;
pub mod control;
pub mod effect;
pub mod engine;
pub mod frame;
pub mod geometry;
pub mod storage;
pub mod tree;

pub use config::{DEFAULT_LED_COUNT, EngineConfig, MAX_LED_COUNT, MIN_LED_COUNT};
pub use control::{ControlRequest, ControlResponse, HttpMethod, handle_request};
pub use effect::{EffectId, EffectSlot};
pub use engine::EffectEngine;
pub use frame::FrameBuffer;
pub use geometry::{Vec3, XorShift32};
pub use storage::{KeyValueStore, StorageError, StorageKey};
pub use tree::{BaseColorUpdate, TreeController};

pub use color::{HsvF, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame buffer is generic over this trait.
pub trait OutputDriver {
    /// Prepare the driver for a strip of `led_count` LEDs
    ///
    /// Called every time the frame buffer is resized. Until the first call
    /// the frame buffer never writes to the driver.
    fn begin(&mut self, led_count: usize);

    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

/// [`OutputDriver`] for any `smart-leds` writer
///
/// Hardware adapters (RMT, SPI, bit-banged) usually implement
/// [`smart_leds::SmartLedsWrite`]; this wraps one so the frame buffer can
/// drive it.
pub struct SmartLedsOutput<W> {
    writer: W,
}

impl<W> SmartLedsOutput<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Get the inner writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsOutput<W>
where
    W: smart_leds::SmartLedsWrite<Color = Rgb>,
{
    fn begin(&mut self, _led_count: usize) {
        // smart-leds writers take the frame length from the iterator
    }

    fn write(&mut self, colors: &[Rgb]) {
        if self.writer.write(colors.iter().copied()).is_err() {
            log!("strip: write failed for {} leds", colors.len());
        }
    }
}
