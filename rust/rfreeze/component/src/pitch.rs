use num_traits::cast;


/// Reference samples with magnitude at or below this sit in the dead zone
/// between pulses.
const NOISE_THRESHOLD: f32 = 0.01;

/// Pulses shorter than `sampling_rate / MAX_TRIGGER_HZ` samples would imply
/// an implausibly high pitch and are rejected.
const MAX_TRIGGER_HZ: f32 = 1760.0;

/// Measures the period of the reference oscillator signal by counting the
/// samples a pulse spends above the noise threshold. A pulse completes when
/// the signal returns to the dead zone, so a report fires at most once per
/// period and never mid-period.
#[derive(Clone, Debug)]
pub struct PitchTracker {
    sampling_rate: f32,
    min_duty: u32,
    duty: u32,
}

impl PitchTracker {
    pub fn new(sampling_rate: f32) -> Self {
        Self {
            sampling_rate,
            min_duty: cast::<f32, u32>(sampling_rate / MAX_TRIGGER_HZ).unwrap(),
            duty: 0,
        }
    }

    /// Consume one reference sample. Returns the measured frequency when a
    /// qualifying pulse has just completed.
    pub fn process(&mut self, reference: f32) -> Option<f32> {
        if reference > NOISE_THRESHOLD || reference < -NOISE_THRESHOLD {
            // Only the positive side counts toward the duty; the rising
            // pulse carries the timing.
            if reference > NOISE_THRESHOLD {
                self.duty += 1;
            }
            None
        } else {
            #[allow(clippy::cast_precision_loss)]
            let report = if self.duty > self.min_duty {
                Some(self.sampling_rate / self.duty as f32)
            } else {
                None
            };
            self.duty = 0;
            report
        }
    }

    pub fn reset(&mut self) {
        self.duty = 0;
    }
}
