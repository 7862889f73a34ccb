#![warn(
    nonstandard_style,
    rust_2018_idioms,
    future_incompatible,
    clippy::pedantic,
    clippy::todo
)]
#![allow(
    clippy::type_complexity,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::default_trait_access
)]

use conformal_component::parameters::{self, Flags, InfoRef, TypeSpecificInfoRef};
use conformal_component::{Component as ComponentT, ProcessingEnvironment};

const PARAMETERS: [InfoRef<'static, &'static str>; 3] = [
    InfoRef {
        title: "Time",
        short_title: "Time",
        unique_id: "time",
        flags: Flags { automatable: true },
        type_specific: TypeSpecificInfoRef::Numeric {
            default: 0.5,
            valid_range: 0.0..=1.0,
            units: None,
        },
    },
    InfoRef {
        title: "Depth",
        short_title: "Depth",
        unique_id: "depth",
        flags: Flags { automatable: true },
        type_specific: TypeSpecificInfoRef::Numeric {
            default: 0.5,
            valid_range: 0.0..=1.0,
            units: None,
        },
    },
    InfoRef {
        title: "Bypass",
        short_title: "Bypass",
        unique_id: "bypass",
        flags: Flags { automatable: true },
        type_specific: TypeSpecificInfoRef::Switch { default: false },
    },
];

mod anti_alias;
mod buffers;
mod capture;
mod effect;
mod mode;
mod pitch;
mod voice;

/// Number of playback voice slots allocated per processor. `Config` may use
/// fewer, never more.
pub const MAX_VOICES: usize = 4;

/// Fixed options of the effect, chosen when the component is built.
#[derive(Clone, Debug)]
pub struct Config {
    /// Band-limit captured audio before it is written at a reduced rate.
    pub anti_alias: bool,

    /// Route alternating voices to opposite output channels. Only audible
    /// with a stereo channel layout.
    pub stereo_ping_pong: bool,

    /// Number of overlapping playback voices, between 1 and [`MAX_VOICES`].
    pub voice_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anti_alias: true,
            stereo_ping_pong: false,
            voice_count: 3,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Component {
    config: Config,
}

impl Component {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ComponentT for Component {
    type Processor = effect::Effect;

    fn parameter_infos(&self) -> Vec<parameters::Info> {
        parameters::to_infos(&PARAMETERS)
    }

    fn create_processor(&self, env: &ProcessingEnvironment) -> Self::Processor {
        effect::Effect::new(&self.config, env)
    }
}
