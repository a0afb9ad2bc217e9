//! Plane sweep effects
//!
//! A plane moves through the tree at constant speed. Every LED whose depth
//! along the plane normal is within the band around the plane is lit, all
//! others are black. Once the plane has passed the deepest LED the working
//! data is recomputed and the pass starts over.

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};
use libm::fabsf;

use super::Effect;
use crate::color::{BLACK, HsvF};
use crate::config::EngineConfig;
use crate::frame::FrameBuffer;
use crate::geometry::{self, Axis, SweepDirection, Vec3};
use crate::{OutputDriver, Rgb};

/// Depths of every LED along the sweep normal
#[derive(Debug, Clone, Default)]
struct SweepDepths {
    depths: Vec<f32>,
    max: f32,
}

impl SweepDepths {
    fn new(depths: Vec<f32>) -> Self {
        let max = geometry::max_depth(&depths);
        Self { depths, max }
    }
}

/// Band geometry shared by both sweep flavours
#[derive(Debug, Clone, Copy)]
struct Band {
    speed: f32,
    half_width: f32,
}

impl Band {
    fn from_config(config: &EngineConfig) -> Self {
        Self {
            speed: config.sweep_speed,
            half_width: config.sweep_band,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn plane_position(self, elapsed: Duration) -> f32 {
        elapsed.as_millis() as f32 / 1000.0 * self.speed
    }

    fn render<D: OutputDriver>(
        self,
        elapsed: Duration,
        sweep: &SweepDepths,
        color: Rgb,
        frame: &mut FrameBuffer<D>,
    ) {
        let plane = self.plane_position(elapsed);
        for index in 0..frame.len() {
            let lit = sweep
                .depths
                .get(index)
                .is_some_and(|depth| fabsf(depth - plane) < self.half_width);
            frame.set_pixel(index, if lit { color } else { BLACK });
        }
        frame.flush();
    }

    fn is_pass_complete(self, elapsed: Duration, sweep: &SweepDepths) -> bool {
        self.plane_position(elapsed) >= sweep.max
    }
}

/// Sweep along a random direction with a random hue
///
/// Direction and hue are redrawn from a generator seeded with the time the
/// pass starts.
#[derive(Debug, Clone)]
pub struct SweepingPlaneEffect {
    band: Band,
    saturation: f32,
    value: f32,
    direction: Option<SweepDirection>,
    sweep: SweepDepths,
}

impl SweepingPlaneEffect {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            band: Band::from_config(config),
            saturation: config.sweep_saturation,
            value: config.sweep_value,
            direction: None,
            sweep: SweepDepths::default(),
        }
    }

    /// Direction of the current pass
    pub fn direction(&self) -> Option<&SweepDirection> {
        self.direction.as_ref()
    }

    pub fn depths(&self) -> &[f32] {
        &self.sweep.depths
    }

    /// Color of the plane in the current pass
    pub fn color(&self) -> Rgb {
        let hue = self.direction.map_or(0.0, |direction| direction.hue);
        HsvF::new(hue, self.saturation, self.value).to_rgb()
    }
}

impl Effect for SweepingPlaneEffect {
    fn render<D: OutputDriver>(&mut self, elapsed: Duration, _base: Rgb, frame: &mut FrameBuffer<D>) {
        self.band.render(elapsed, &self.sweep, self.color(), frame);
    }

    fn prepare(&mut self, now: Instant, positions: &[Vec3]) {
        let direction = SweepDirection::from_timestamp(now.as_millis());
        self.sweep = SweepDepths::new(geometry::sweep_depths(positions, &direction));
        self.direction = Some(direction);
        log!(
            "sweep: new pass, hue {}, depth {}",
            direction.hue,
            self.sweep.max
        );
    }

    fn is_pass_complete(&self, elapsed: Duration) -> bool {
        self.band.is_pass_complete(elapsed, &self.sweep)
    }
}

/// Sweep along one coordinate axis in the base color
#[derive(Debug, Clone)]
pub struct AxisPlaneEffect {
    axis: Axis,
    band: Band,
    sweep: SweepDepths,
}

impl AxisPlaneEffect {
    pub fn new(axis: Axis, config: &EngineConfig) -> Self {
        Self {
            axis,
            band: Band::from_config(config),
            sweep: SweepDepths::default(),
        }
    }

    pub const fn axis(&self) -> Axis {
        self.axis
    }

    pub fn depths(&self) -> &[f32] {
        &self.sweep.depths
    }
}

impl Effect for AxisPlaneEffect {
    fn render<D: OutputDriver>(&mut self, elapsed: Duration, base: Rgb, frame: &mut FrameBuffer<D>) {
        self.band.render(elapsed, &self.sweep, base, frame);
    }

    fn prepare(&mut self, _now: Instant, positions: &[Vec3]) {
        self.sweep = SweepDepths::new(geometry::axis_depths(positions, self.axis));
    }

    fn is_pass_complete(&self, elapsed: Duration) -> bool {
        self.band.is_pass_complete(elapsed, &self.sweep)
    }
}
