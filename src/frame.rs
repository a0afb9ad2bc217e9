//! LED frame buffer
//!
//! Holds the per-LED mask, position and color as parallel arrays that always
//! share the same length. Colors are only pushed to the strip on
//! [`FrameBuffer::flush`].

use alloc::vec;
use alloc::vec::Vec;

use crate::OutputDriver;
use crate::color::{BLACK, Rgb};
use crate::geometry::Vec3;

/// Per-LED state of the strip together with its output driver
pub struct FrameBuffer<D: OutputDriver> {
    mask: Vec<bool>,
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    driver: D,
    driver_ready: bool,
}

impl<D: OutputDriver> FrameBuffer<D> {
    /// Create an empty frame buffer
    ///
    /// The driver is not touched until the first [`resize`](Self::resize).
    pub const fn new(driver: D) -> Self {
        Self {
            mask: Vec::new(),
            positions: Vec::new(),
            colors: Vec::new(),
            driver,
            driver_ready: false,
        }
    }

    /// Number of LEDs
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Replace all per-LED arrays with fresh ones of `count` entries
    ///
    /// Every LED starts masked off, at the origin and black. Previous values
    /// are dropped. The driver is re-initialised for the new length.
    pub fn resize(&mut self, count: usize) {
        self.mask = vec![false; count];
        self.positions = vec![Vec3::ORIGIN; count];
        self.colors = vec![BLACK; count];

        log!("frame: resized to {} leds", count);
        self.driver.begin(count);
        self.driver_ready = true;
    }

    /// Set the color of one LED
    ///
    /// Masked off LEDs are always set to black. Out of range indices are
    /// ignored.
    pub fn set_pixel(&mut self, index: usize, color: Rgb) {
        let Some(enabled) = self.mask.get(index).copied() else {
            return;
        };
        self.colors[index] = if enabled { color } else { BLACK };
    }

    /// Current color of one LED
    pub fn pixel(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn is_masked_on(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Enable or disable one LED
    ///
    /// Returns `false` if the index is out of range.
    pub fn set_mask(&mut self, index: usize, enabled: bool) -> bool {
        let Some(entry) = self.mask.get_mut(index) else {
            return false;
        };
        *entry = enabled;
        true
    }

    /// Enable or disable every LED
    pub fn set_mask_all(&mut self, enabled: bool) {
        self.mask.fill(enabled);
    }

    /// Copy a full mask
    ///
    /// Ignored unless `mask` has exactly one entry per LED.
    pub fn load_mask(&mut self, mask: &[bool]) -> bool {
        if mask.len() != self.mask.len() {
            return false;
        }
        self.mask.copy_from_slice(mask);
        true
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Set the position of one LED
    ///
    /// Returns `false` if the index is out of range.
    pub fn set_position(&mut self, index: usize, position: Vec3) -> bool {
        let Some(entry) = self.positions.get_mut(index) else {
            return false;
        };
        *entry = position;
        true
    }

    /// Set every LED to `color`, honoring the mask, without flushing
    pub fn fill(&mut self, color: Rgb) {
        for (led, enabled) in self.colors.iter_mut().zip(&self.mask) {
            *led = if *enabled { color } else { BLACK };
        }
    }

    /// Set every LED black, without flushing
    pub fn clear(&mut self) {
        self.colors.fill(BLACK);
    }

    /// Light every enabled LED with `base` and push the frame
    pub fn redraw_all(&mut self, base: Rgb) {
        self.fill(base);
        self.flush();
    }

    /// Switch every LED off and push the frame
    pub fn black_out(&mut self) {
        self.clear();
        self.flush();
    }

    /// Push the current colors to the driver
    ///
    /// Does nothing until the driver has been initialised by a resize.
    pub fn flush(&mut self) {
        if !self.driver_ready {
            return;
        }
        self.driver.write(&self.colors);
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
