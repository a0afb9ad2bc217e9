use embassy_time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::effect::{EffectId, EffectSlot};
use crate::frame::FrameBuffer;
use crate::{OutputDriver, Rgb};

/// Effect engine - drives the running effect frame by frame
///
/// Holds the current effect with its working data and the time it started.
/// Persistence of the effect id is left to the caller.
#[derive(Debug, Clone)]
pub struct EffectEngine {
    config: EngineConfig,
    slot: EffectSlot,
    start_time: Instant,
}

impl EffectEngine {
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            slot: EffectSlot::None,
            start_time: Instant::from_millis(0),
        }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Id of the running effect
    pub fn current(&self) -> EffectId {
        self.slot.id()
    }

    pub const fn slot(&self) -> &EffectSlot {
        &self.slot
    }

    pub const fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Check if an effect that animates on every tick is running
    pub fn is_animating(&self) -> bool {
        !matches!(self.slot, EffectSlot::None | EffectSlot::AllOn)
    }

    /// Switch to a new effect
    ///
    /// The strip is always blacked out first. Sweep working data is computed
    /// from the current LED positions, and `AllOn` draws its only frame here.
    pub fn start<D: OutputDriver>(
        &mut self,
        effect: EffectId,
        now: Instant,
        base: Rgb,
        frame: &mut FrameBuffer<D>,
    ) {
        self.stop(frame);

        log!("engine: starting effect {}", effect.as_str());
        self.slot = effect.to_slot(&self.config);
        self.start_time = now;
        self.slot.prepare(now, frame.positions());

        if matches!(self.slot, EffectSlot::AllOn) {
            frame.redraw_all(base);
        }
    }

    /// Stop the running effect and switch every LED off
    pub fn stop<D: OutputDriver>(&mut self, frame: &mut FrameBuffer<D>) {
        if !matches!(self.slot, EffectSlot::None) {
            log!("engine: stopping effect {}", self.slot.id().as_str());
        }
        self.slot = EffectSlot::None;
        frame.black_out();
    }

    /// Start the running effect over, e.g. after the LED layout changed
    pub fn restart<D: OutputDriver>(&mut self, now: Instant, base: Rgb, frame: &mut FrameBuffer<D>) {
        let current = self.current();
        self.start(current, now, base, frame);
    }

    /// Process one frame
    ///
    /// Call this on every iteration of the main loop. Returns promptly.
    pub fn tick<D: OutputDriver>(&mut self, now: Instant, base: Rgb, frame: &mut FrameBuffer<D>) {
        if !self.is_animating() {
            return;
        }

        let mut elapsed = self.elapsed(now);
        if self.slot.is_pass_complete(elapsed) {
            self.start_time = now;
            self.slot.prepare(now, frame.positions());
            elapsed = Duration::from_millis(0);
        }

        self.slot.render(elapsed, base, frame);
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.checked_duration_since(self.start_time)
            .unwrap_or(Duration::from_millis(0))
    }
}
