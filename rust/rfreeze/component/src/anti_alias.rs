
/// Cutoff relative to the effective capture rate, just under its Nyquist
/// frequency.
const CUTOFF_SCALE: f32 = 0.45;

/// Single-pole low-pass applied to the cleaned input before it is written
/// into the capture buffer, suppressing the aliasing introduced by writing
/// at a reduced effective rate.
#[derive(Clone, Debug)]
pub struct AntiAliasFilter {
    sampling_rate: f32,
    alpha: f32,
    state: f32,
}

impl AntiAliasFilter {
    pub fn new(sampling_rate: f32) -> Self {
        let mut filter = Self {
            sampling_rate,
            alpha: 0.0,
            state: 0.0,
        };
        filter.retune(sampling_rate);
        filter
    }

    /// Recompute the cutoff for a new capture rate and clear the filter
    /// state. Called whenever a new capture starts.
    pub fn retune(&mut self, capture_rate: f32) {
        let cutoff = CUTOFF_SCALE * capture_rate;
        self.alpha = 1.0 - (-std::f32::consts::TAU * cutoff / self.sampling_rate).exp();
        self.state = 0.0;
    }

    pub fn process(&mut self, input: f32) -> f32 {
        self.state += self.alpha * (input - self.state);
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
