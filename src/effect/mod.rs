//! Tree effects, one enum variant per effect
//!
//! All effects are stored in an enum; each variant carries exactly the
//! working data its effect needs.

mod blink;
mod sweep;

use embassy_time::{Duration, Instant};

pub use blink::BlinkEffect;
pub use sweep::{AxisPlaneEffect, SweepingPlaneEffect};

use crate::config::EngineConfig;
use crate::frame::FrameBuffer;
use crate::geometry::{Axis, Vec3};
use crate::{OutputDriver, Rgb};

const EFFECT_NAME_NONE: &str = "none";
const EFFECT_NAME_BLINK: &str = "blink";
const EFFECT_NAME_ALL_ON: &str = "allon";
const EFFECT_NAME_SWEEPING_PLANE: &str = "sweepingplane";
const EFFECT_NAME_PLANE_X: &str = "planex";
const EFFECT_NAME_PLANE_Y: &str = "planey";
const EFFECT_NAME_PLANE_Z: &str = "planez";

const EFFECT_ID_NONE: u8 = 0;
const EFFECT_ID_BLINK: u8 = 1;
const EFFECT_ID_ALL_ON: u8 = 2;
const EFFECT_ID_SWEEPING_PLANE: u8 = 3;
const EFFECT_ID_PLANE_X: u8 = 4;
const EFFECT_ID_PLANE_Y: u8 = 5;
const EFFECT_ID_PLANE_Z: u8 = 6;

pub trait Effect {
    /// Render a single frame into the frame buffer and flush it
    fn render<D: OutputDriver>(&mut self, elapsed: Duration, base: Rgb, frame: &mut FrameBuffer<D>);

    /// (Re)compute working data for a new pass
    fn prepare(&mut self, _now: Instant, _positions: &[Vec3]) {}

    /// Check if the current pass is over and working data must be refreshed
    fn is_pass_complete(&self, _elapsed: Duration) -> bool {
        false
    }
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    None = EFFECT_ID_NONE,
    Blink = EFFECT_ID_BLINK,
    AllOn = EFFECT_ID_ALL_ON,
    SweepingPlane = EFFECT_ID_SWEEPING_PLANE,
    PlaneX = EFFECT_ID_PLANE_X,
    PlaneY = EFFECT_ID_PLANE_Y,
    PlaneZ = EFFECT_ID_PLANE_Z,
}

impl EffectId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_NONE => Self::None,
            EFFECT_ID_BLINK => Self::Blink,
            EFFECT_ID_ALL_ON => Self::AllOn,
            EFFECT_ID_SWEEPING_PLANE => Self::SweepingPlane,
            EFFECT_ID_PLANE_X => Self::PlaneX,
            EFFECT_ID_PLANE_Y => Self::PlaneY,
            EFFECT_ID_PLANE_Z => Self::PlaneZ,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => EFFECT_NAME_NONE,
            Self::Blink => EFFECT_NAME_BLINK,
            Self::AllOn => EFFECT_NAME_ALL_ON,
            Self::SweepingPlane => EFFECT_NAME_SWEEPING_PLANE,
            Self::PlaneX => EFFECT_NAME_PLANE_X,
            Self::PlaneY => EFFECT_NAME_PLANE_Y,
            Self::PlaneZ => EFFECT_NAME_PLANE_Z,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_NONE => Some(Self::None),
            EFFECT_NAME_BLINK => Some(Self::Blink),
            EFFECT_NAME_ALL_ON => Some(Self::AllOn),
            EFFECT_NAME_SWEEPING_PLANE => Some(Self::SweepingPlane),
            EFFECT_NAME_PLANE_X => Some(Self::PlaneX),
            EFFECT_NAME_PLANE_Y => Some(Self::PlaneY),
            EFFECT_NAME_PLANE_Z => Some(Self::PlaneZ),
            _ => None,
        }
    }

    /// Build an effect slot without working data
    ///
    /// Sweep slots start empty; call [`EffectSlot::prepare`] before
    /// rendering them.
    pub fn to_slot(self, config: &EngineConfig) -> EffectSlot {
        match self {
            Self::None => EffectSlot::None,
            Self::Blink => EffectSlot::Blink(BlinkEffect::new(config.blink_half_period)),
            Self::AllOn => EffectSlot::AllOn,
            Self::SweepingPlane => EffectSlot::SweepingPlane(SweepingPlaneEffect::new(config)),
            Self::PlaneX => EffectSlot::AxisPlane(AxisPlaneEffect::new(Axis::X, config)),
            Self::PlaneY => EffectSlot::AxisPlane(AxisPlaneEffect::new(Axis::Y, config)),
            Self::PlaneZ => EffectSlot::AxisPlane(AxisPlaneEffect::new(Axis::Z, config)),
        }
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone, Default)]
pub enum EffectSlot {
    /// Nothing running, the strip keeps whatever was last drawn
    #[default]
    None,
    /// All LEDs toggle between base color and black
    Blink(BlinkEffect),
    /// All LEDs lit with the base color, drawn once at start
    AllOn,
    /// Plane with a random orientation and hue sweeping through the tree
    SweepingPlane(SweepingPlaneEffect),
    /// Plane perpendicular to a coordinate axis sweeping in base color
    AxisPlane(AxisPlaneEffect),
}

impl EffectSlot {
    /// Render the current effect
    pub fn render<D: OutputDriver>(&mut self, elapsed: Duration, base: Rgb, frame: &mut FrameBuffer<D>) {
        match self {
            Self::None | Self::AllOn => {}
            Self::Blink(effect) => effect.render(elapsed, base, frame),
            Self::SweepingPlane(effect) => effect.render(elapsed, base, frame),
            Self::AxisPlane(effect) => effect.render(elapsed, base, frame),
        }
    }

    /// Recompute the working data of the current effect
    pub fn prepare(&mut self, now: Instant, positions: &[Vec3]) {
        match self {
            Self::None | Self::AllOn => {}
            Self::Blink(effect) => effect.prepare(now, positions),
            Self::SweepingPlane(effect) => effect.prepare(now, positions),
            Self::AxisPlane(effect) => effect.prepare(now, positions),
        }
    }

    pub fn is_pass_complete(&self, elapsed: Duration) -> bool {
        match self {
            Self::None | Self::AllOn => false,
            Self::Blink(effect) => effect.is_pass_complete(elapsed),
            Self::SweepingPlane(effect) => effect.is_pass_complete(elapsed),
            Self::AxisPlane(effect) => effect.is_pass_complete(elapsed),
        }
    }

    /// Per-LED depths of a running sweep
    pub fn depths(&self) -> Option<&[f32]> {
        match self {
            Self::SweepingPlane(effect) => Some(effect.depths()),
            Self::AxisPlane(effect) => Some(effect.depths()),
            Self::None | Self::Blink(_) | Self::AllOn => None,
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> EffectId {
        match self {
            Self::None => EffectId::None,
            Self::Blink(_) => EffectId::Blink,
            Self::AllOn => EffectId::AllOn,
            Self::SweepingPlane(_) => EffectId::SweepingPlane,
            Self::AxisPlane(effect) => match effect.axis() {
                Axis::X => EffectId::PlaneX,
                Axis::Y => EffectId::PlaneY,
                Axis::Z => EffectId::PlaneZ,
            },
        }
    }
}
