use embassy_time::Duration;

/// Smallest LED count the strip can be configured with
pub const MIN_LED_COUNT: usize = 1;

/// Largest LED count the strip can be configured with
pub const MAX_LED_COUNT: usize = 8196;

/// LED count used until one has been stored
pub const DEFAULT_LED_COUNT: usize = 50;

const DEFAULT_BLINK_HALF_PERIOD_MS: u64 = 1000;
const DEFAULT_SWEEP_SPEED: f32 = 1.0;
const DEFAULT_SWEEP_BAND: f32 = 0.1;
const DEFAULT_SWEEP_SATURATION: f32 = 0.40;
const DEFAULT_SWEEP_VALUE: f32 = 0.20;

/// Tuning for the effect engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Time the blink effect spends in each of its on/off phases
    pub blink_half_period: Duration,
    /// Plane speed in position units per second
    pub sweep_speed: f32,
    /// A LED is lit while its depth is closer than this to the plane
    pub sweep_band: f32,
    /// Saturation of the free sweep color
    pub sweep_saturation: f32,
    /// Value (brightness) of the free sweep color
    pub sweep_value: f32,
}

impl EngineConfig {
    pub const fn new() -> Self {
        Self {
            blink_half_period: Duration::from_millis(DEFAULT_BLINK_HALF_PERIOD_MS),
            sweep_speed: DEFAULT_SWEEP_SPEED,
            sweep_band: DEFAULT_SWEEP_BAND,
            sweep_saturation: DEFAULT_SWEEP_SATURATION,
            sweep_value: DEFAULT_SWEEP_VALUE,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that `count` is a configurable LED count
pub const fn is_valid_led_count(count: usize) -> bool {
    count >= MIN_LED_COUNT && count <= MAX_LED_COUNT
}
