use crate::buffers::{BUF_MAX_LENGTH, BUF_MIN_LENGTH};


/// How pitch pulses drive capture and retriggering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleMode {
    /// No new captures. Pulses still retrigger voices over the current
    /// material at the configured playback length.
    NoTrig,

    /// Capture one full-length buffer on the next pulse, then fall back to
    /// `NoTrig` once it completes.
    SingleTrig,

    /// Every pulse near the latched trigger frequency restarts the capture,
    /// so the material continuously follows the played pitch.
    ReTrig,
}

/// Depth positions below this select `SingleTrig`.
const SINGLE_TRIG_BELOW: f32 = 0.45;

/// Depth positions above this select `ReTrig`.
const RE_TRIG_ABOVE: f32 = 0.55;

/// Lowest capture rate, as a fraction of the host rate.
const MIN_RATE_SCALE: f32 = 0.25;

/// Highest capture rate, as a fraction of the host rate.
const MAX_RATE_SCALE: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthMapping {
    pub mode: SampleMode,

    /// Capture write step relative to the host sample rate. 1.0 writes at
    /// the host rate; values below 1.0 reduce the effective capture rate.
    pub rate_scale: f32,
}

/// Map the normalized depth parameter onto a sample mode and capture rate.
///
/// The lower half of the range selects `SingleTrig` with the capture rate
/// falling as depth approaches the center; the upper half selects `ReTrig`
/// with the rate rising from its minimum back past the host rate. The dead
/// zone around the center disables triggering.
pub fn map_depth(depth: f32) -> DepthMapping {
    if depth < SINGLE_TRIG_BELOW {
        let t = depth / SINGLE_TRIG_BELOW;
        DepthMapping {
            mode: SampleMode::SingleTrig,
            rate_scale: 1.0 + t * (MIN_RATE_SCALE - 1.0),
        }
    } else if depth > RE_TRIG_ABOVE {
        let t = (depth - RE_TRIG_ABOVE) / (1.0 - RE_TRIG_ABOVE);
        DepthMapping {
            mode: SampleMode::ReTrig,
            rate_scale: MIN_RATE_SCALE + t * (MAX_RATE_SCALE - MIN_RATE_SCALE),
        }
    } else {
        DepthMapping {
            mode: SampleMode::NoTrig,
            rate_scale: 1.0,
        }
    }
}

/// Map the normalized time parameter onto a playback length in samples.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn map_time(time: f32) -> usize {
    BUF_MIN_LENGTH + ((BUF_MAX_LENGTH - BUF_MIN_LENGTH) as f32 * time) as usize
}
