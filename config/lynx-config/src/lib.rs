use bincode::{Decode, Encode};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Rate at which the Mikey audio counters are decremented.
pub const MIKEY_AUDIO_CLOCK_HZ: u32 = 1_000_000;

/// ~45.45 KHz output
pub const DEFAULT_SAMPLE_RATE_DIVIDER: u32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LynxAudioMode {
    #[default]
    Stereo,
    Mono,
}

impl LynxAudioMode {
    pub const ALL: [Self; 2] = [Self::Stereo, Self::Mono];

    #[inline]
    #[must_use]
    pub fn stereo_enabled(self) -> bool {
        self == Self::Stereo
    }
}

impl Display for LynxAudioMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stereo => write!(f, "Stereo"),
            Self::Mono => write!(f, "Mono"),
        }
    }
}

impl FromStr for LynxAudioMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid Lynx audio mode string: '{s}'"))
    }
}

/// Output sample rate produced by a given master-clock divider. A divider of 0 is treated as 1.
#[inline]
#[must_use]
pub fn sample_rate_for_divider(sample_rate_divider: u32) -> u32 {
    MIKEY_AUDIO_CLOCK_HZ / sample_rate_divider.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn audio_mode_display_from_str() {
        for mode in LynxAudioMode::ALL {
            assert_eq!(Ok(mode), mode.to_string().parse());
        }

        assert_eq!(Ok(LynxAudioMode::Mono), "mono".parse());
        assert!("surround".parse::<LynxAudioMode>().is_err());
    }

    #[test]
    fn sample_rate() {
        assert_eq!(45454, sample_rate_for_divider(DEFAULT_SAMPLE_RATE_DIVIDER));
        assert_eq!(MIKEY_AUDIO_CLOCK_HZ, sample_rate_for_divider(0));
    }
}
