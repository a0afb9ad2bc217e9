//! Vector math behind the plane sweep effects
//!
//! LED positions live in an arbitrary 3-D unit system. A sweep projects
//! every position onto a plane normal and moves the plane along that normal,
//! so all the effect needs per LED is one scalar "depth".

use alloc::vec::Vec;

use libm::sqrtf;

/// Seed used when the requested seed would lock xorshift at zero
const FALLBACK_SEED: u32 = 0x9E37_79B9;

/// Upper bound (exclusive) of the timestamp-dependent PRNG warm-up
const MAX_WARMUP_STEPS: u64 = 32;

const HUE_RANGE: u32 = 360;

/// Position of a LED in space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Get a single coordinate
    pub const fn component(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Unit vector in the XY plane
///
/// Used as a `(sin, cos)` pair: `x` is the sine and `y` the cosine of the
/// angle it encodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        sqrtf(self.x * self.x + self.y * self.y)
    }

    /// Scale to unit length
    ///
    /// Returns `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Self> {
        let length = self.length();
        if length <= f32::EPSILON {
            return None;
        }
        Some(Self::new(self.x / length, self.y / length))
    }
}

/// Coordinate axis of an axis-aligned sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// 32-bit xorshift generator
///
/// Not cryptographic. It only exists to give each sweep pass a different
/// direction and hue.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub const fn new(seed: u32) -> Self {
        let state = if seed == 0 { FALLBACK_SEED } else { seed };
        Self { state }
    }

    /// Create a generator from a millisecond timestamp
    ///
    /// The generator is also advanced a timestamp-dependent number of
    /// steps, so nearby timestamps do not start from correlated states.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_timestamp(millis: u64) -> Self {
        let seed = (millis as u32) ^ ((millis >> 32) as u32);
        let mut rng = Self::new(seed);
        for _ in 0..millis % MAX_WARMUP_STEPS {
            rng.next_u32();
        }
        rng
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value mapped onto `[-1, 1)`
    #[allow(clippy::cast_precision_loss)]
    pub fn next_signed_unit(&mut self) -> f32 {
        // 24 bits fit the f32 mantissa exactly, so 1.0 is never reached
        let bits = self.next_u32() >> 8;
        (bits as f32 / (1u32 << 24) as f32) * 2.0 - 1.0
    }
}

/// Draw a random unit vector in the XY plane
pub fn random_unit_xy(rng: &mut XorShift32) -> Vec2 {
    let x = rng.next_signed_unit();
    let y = rng.next_signed_unit();
    Vec2::new(x, y).normalized().unwrap_or(Vec2::new(0.0, 1.0))
}

/// Randomly oriented sweep plane together with its color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepDirection {
    /// Tilt of the plane normal away from the Z axis
    pub theta: Vec2,
    /// Rotation of the plane normal around the Z axis
    pub alpha: Vec2,
    /// Hue of the sweep in degrees
    pub hue: f32,
}

impl SweepDirection {
    /// Draw a new direction and hue
    #[allow(clippy::cast_precision_loss)]
    pub fn random(rng: &mut XorShift32) -> Self {
        let theta = random_unit_xy(rng);
        let alpha = random_unit_xy(rng);
        let hue = (rng.next_u32() % HUE_RANGE) as f32;
        Self { theta, alpha, hue }
    }

    /// Direction derived from a millisecond timestamp
    ///
    /// The same timestamp always yields the same direction.
    pub fn from_timestamp(millis: u64) -> Self {
        Self::random(&mut XorShift32::from_timestamp(millis))
    }

    /// Project a position onto the plane normal
    pub fn depth_of(&self, position: Vec3) -> f32 {
        let (sin_theta, cos_theta) = (self.theta.x, self.theta.y);
        let (sin_alpha, cos_alpha) = (self.alpha.x, self.alpha.y);
        sin_theta * (sin_alpha * position.x + cos_alpha * position.y) + cos_theta * position.z
    }
}

/// Per-LED depths along a sweep direction, shifted to start at zero
pub fn sweep_depths(positions: &[Vec3], direction: &SweepDirection) -> Vec<f32> {
    let mut depths: Vec<f32> = positions.iter().map(|p| direction.depth_of(*p)).collect();
    shift_to_zero(&mut depths);
    depths
}

/// Per-LED depths along a coordinate axis, shifted to start at zero
pub fn axis_depths(positions: &[Vec3], axis: Axis) -> Vec<f32> {
    let mut depths: Vec<f32> = positions.iter().map(|p| p.component(axis)).collect();
    shift_to_zero(&mut depths);
    depths
}

/// Subtract the minimum from every entry so the smallest becomes zero
pub fn shift_to_zero(depths: &mut [f32]) {
    let Some(min) = depths.iter().copied().reduce(f32::min) else {
        return;
    };
    for depth in depths {
        *depth -= min;
    }
}

/// Largest entry, or zero for an empty slice
pub fn max_depth(depths: &[f32]) -> f32 {
    depths.iter().copied().reduce(f32::max).unwrap_or(0.0)
}
