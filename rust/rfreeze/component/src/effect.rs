use crate::anti_alias::AntiAliasFilter;
use crate::buffers::{BufferPair, BUF_MAX_LENGTH};
use crate::capture::Capture;
use crate::mode::{self, SampleMode};
use crate::pitch::PitchTracker;
use crate::voice::{interpolate, Crossfade, Voice};
use crate::{Config, MAX_VOICES};
use conformal_component::audio::{Buffer, BufferMut, ChannelLayout};
use conformal_component::effect::Effect as EffectT;
use conformal_component::parameters::{self, BufferStates};
use conformal_component::{pzip, ProcessingEnvironment, Processor};
use itertools::izip;


/// A single-shot capture holds off until the cleaned input departs from
/// silence by this much, so it doesn't spend its one buffer on a quiet
/// lead-in.
const ONSET_THRESHOLD: f32 = 0.01;

pub struct Effect {
    config: Config,
    channel_layout: ChannelLayout,
    sampling_rate: f32,
    ping_pong: bool,

    pitch: PitchTracker,
    mode: SampleMode,
    buffers: BufferPair,
    capture: Capture,
    filter: AntiAliasFilter,
    voices: [Voice; MAX_VOICES],
    crossfades: [Crossfade; MAX_VOICES],
    next_voice: usize,
    pending_swap: bool,

    playback_len: usize,
    last_captured_len: usize,
    playback_root_freq: f32,
    write_step: f32,
    capture_rate: f32,

    time: Option<f32>,
    depth: Option<f32>,
}

impl Processor for Effect {
    fn set_processing(&mut self, processing: bool) {
        if !processing {
            self.pitch.reset();
            self.filter.reset();
            self.capture.reset();
            self.buffers.reset();
            self.voices = [Voice::inactive(); MAX_VOICES];
            self.crossfades = [Crossfade::inactive(); MAX_VOICES];
            self.next_voice = 0;
            self.pending_swap = false;
            self.mode = SampleMode::NoTrig;
            self.playback_len = BUF_MAX_LENGTH;
            self.last_captured_len = BUF_MAX_LENGTH;
            self.playback_root_freq = 0.0;
            self.write_step = 1.0;
            self.capture_rate = self.sampling_rate;
            self.time = None;
            self.depth = None;
        }
    }
}

impl Effect {
    pub fn new(config: &Config, env: &ProcessingEnvironment) -> Self {
        assert!((1..=MAX_VOICES).contains(&config.voice_count));
        Self {
            config: config.clone(),
            channel_layout: env.channel_layout,
            sampling_rate: env.sampling_rate,
            ping_pong: config.stereo_ping_pong && env.channel_layout == ChannelLayout::Stereo,
            pitch: PitchTracker::new(env.sampling_rate),
            mode: SampleMode::NoTrig,
            buffers: BufferPair::new(),
            capture: Capture::new(),
            filter: AntiAliasFilter::new(env.sampling_rate),
            voices: [Voice::inactive(); MAX_VOICES],
            crossfades: [Crossfade::inactive(); MAX_VOICES],
            next_voice: 0,
            pending_swap: false,
            playback_len: BUF_MAX_LENGTH,
            last_captured_len: BUF_MAX_LENGTH,
            playback_root_freq: 0.0,
            write_step: 1.0,
            capture_rate: env.sampling_rate,
            time: None,
            depth: None,
        }
    }

    /// Re-derive the mode, lengths and capture rate, but only when a
    /// parameter actually moved.
    fn update_controls(&mut self, time: f32, depth: f32) {
        if self.time != Some(time) {
            self.time = Some(time);
            self.playback_len = mode::map_time(time);
        }
        if self.depth != Some(depth) {
            self.depth = Some(depth);
            let mapping = mode::map_depth(depth);
            if mapping.mode == SampleMode::ReTrig {
                self.capture.clear_trigger();
            }
            self.mode = mapping.mode;
            self.write_step = mapping.rate_scale;
            self.capture_rate = mapping.rate_scale * self.sampling_rate;
        }
    }

    /// The per-cycle synchronization point: everything that must not tear a
    /// buffer mid-readout happens here, between frames.
    fn on_pulse(&mut self, freq: f32) {
        if self.pending_swap {
            self.buffers.swap();
            self.pending_swap = false;
            self.playback_root_freq = self.capture.root_freq();
            self.last_captured_len = self.capture.target_len();
        }

        if !self.capture.active() {
            match self.mode {
                SampleMode::SingleTrig => {
                    self.capture.start(freq, BUF_MAX_LENGTH);
                    self.filter.retune(self.capture_rate);
                }
                SampleMode::ReTrig if self.capture.accepts(freq) => {
                    self.capture.start(freq, self.playback_len);
                    self.filter.retune(self.capture_rate);
                }
                _ => {}
            }
        }

        if self.mode != SampleMode::SingleTrig {
            self.retrigger(freq);
        }
    }

    fn retrigger(&mut self, freq: f32) {
        let slot = self.next_voice;
        self.crossfades[slot] = Crossfade::from_voice(&self.voices[slot]);
        self.voices[slot] = Voice {
            step: freq / self.playback_root_freq * self.write_step,
            idx: 0.0,
            len: if self.mode == SampleMode::ReTrig {
                self.last_captured_len
            } else {
                self.playback_len
            },
            source: self.buffers.play_id(),
        };
        self.next_voice = (slot + 1) % self.config.voice_count;
    }

    /// Process one frame. Returns the left/right wet-or-dry pair; mono
    /// callers use only the left half.
    fn tick(&mut self, main: f32, reference: f32) -> (f32, f32) {
        // The reference rides alongside the audio at half level; doubling
        // the difference recovers the clean signal.
        let cleaned = (main - reference) * 2.0;

        if let Some(freq) = self.pitch.process(reference) {
            self.on_pulse(freq);
        }

        let mut wet = [0.0f32; 2];
        for slot in 0..self.config.voice_count {
            let mut voice = self.voices[slot];
            if !voice.active() {
                continue;
            }
            let mut sample = interpolate(self.buffers.get(voice.source), voice.idx);
            if voice.past_head() {
                sample *= voice.fade_out();
            } else {
                let mut fade = self.crossfades[slot];
                if fade.active() {
                    sample += interpolate(self.buffers.get(fade.source), fade.idx)
                        * fade.blend_gain(voice.idx);
                    fade.idx += fade.step;
                    self.crossfades[slot] = fade;
                }
            }
            wet[if self.ping_pong { slot & 1 } else { 0 }] += sample;
            voice.idx += voice.step;
            self.voices[slot] = voice;
        }

        if self.capture.active()
            && (self.capture.write_idx() > 0.0
                || self.mode != SampleMode::SingleTrig
                || cleaned.abs() > ONSET_THRESHOLD)
        {
            let sample = if self.config.anti_alias {
                self.filter.process(cleaned)
            } else {
                cleaned
            };
            if self
                .capture
                .write(self.buffers.capture_mut(), sample, self.write_step)
            {
                self.pending_swap = true;
                if self.mode == SampleMode::SingleTrig {
                    self.mode = SampleMode::NoTrig;
                }
            }
        }

        match self.mode {
            // While a single-shot capture is armed or filling, the dry
            // signal passes through.
            SampleMode::SingleTrig => (cleaned, cleaned),
            _ => {
                if self.ping_pong {
                    (wet[0], wet[1])
                } else {
                    (wet[0], wet[0])
                }
            }
        }
    }
}

impl EffectT for Effect {
    fn handle_parameters<P: parameters::States>(&mut self, parameters: P) {
        if let (Some(time), Some(depth)) = (
            parameters.get_numeric("time"),
            parameters.get_numeric("depth"),
        ) {
            self.update_controls(time, depth);
        }
    }

    fn process<P: BufferStates, I: Buffer, O: BufferMut>(
        &mut self,
        parameters: P,
        input: &I,
        output: &mut O,
    ) {
        debug_assert_eq!(input.channel_layout(), output.channel_layout());
        debug_assert_eq!(input.num_frames(), output.num_frames());
        let controls = pzip!(parameters[numeric "time", numeric "depth", switch "bypass"]);
        match self.channel_layout {
            ChannelLayout::Mono => {
                for (i, (time, depth, bypass)) in
                    controls.take(input.num_frames()).enumerate()
                {
                    self.update_controls(time, depth);
                    let main = input.channel(0)[i];
                    let (out, _) = self.tick(main, 0.0);
                    output.channel_mut(0)[i] = if bypass { main } else { out };
                }
            }
            ChannelLayout::Stereo => {
                for (i, ((&main, &reference), (time, depth, bypass))) in
                    izip!(input.channel(0), input.channel(1))
                        .zip(controls)
                        .enumerate()
                {
                    self.update_controls(time, depth);
                    let (left, right) = self.tick(main, reference);
                    output.channel_mut(0)[i] = if bypass { main } else { left };
                    output.channel_mut(1)[i] = if bypass { reference } else { right };
                }
            }
        }
    }
}
