//! All LEDs blinking in unison

use embassy_time::Duration;

use super::Effect;
use crate::frame::FrameBuffer;
use crate::{OutputDriver, Rgb};

/// Blink effect - base color for one half period, black for the next
#[derive(Debug, Clone)]
pub struct BlinkEffect {
    half_period: Duration,
}

impl BlinkEffect {
    pub const fn new(half_period: Duration) -> Self {
        Self { half_period }
    }

    /// Check if the LEDs are on after `elapsed`
    pub fn is_on(&self, elapsed: Duration) -> bool {
        let half_period_ms = self.half_period.as_millis().max(1);
        (elapsed.as_millis() / half_period_ms).is_multiple_of(2)
    }
}

impl Effect for BlinkEffect {
    fn render<D: OutputDriver>(&mut self, elapsed: Duration, base: Rgb, frame: &mut FrameBuffer<D>) {
        if self.is_on(elapsed) {
            frame.fill(base);
        } else {
            frame.clear();
        }
        frame.flush();
    }
}
