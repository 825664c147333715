//! Pitch reference targets

/// Concert pitch (A4) the source audio is assumed to be tuned to.
pub const REFERENCE_PITCH_HZ: f64 = 440.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tuning {
    Hz432,
    Hz444,
}

impl Tuning {
    /// Both targets, in the order they are produced.
    pub const ALL: [Tuning; 2] = [Tuning::Hz432, Tuning::Hz444];

    pub fn hz(self) -> u32 {
        match self {
            Tuning::Hz432 => 432,
            Tuning::Hz444 => 444,
        }
    }

    /// Ratio to retune 440Hz material to this reference.
    pub fn pitch_ratio(self) -> f64 {
        f64::from(self.hz()) / REFERENCE_PITCH_HZ
    }

    /// File name suffix, e.g. `432hz`
    pub fn suffix(self) -> &'static str {
        match self {
            Tuning::Hz432 => "432hz",
            Tuning::Hz444 => "444hz",
        }
    }
}

impl std::fmt::Display for Tuning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Hz", self.hz())
    }
}

/// Bass boost gain, validated to 1..=20.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BassBoostLevel(u8);

impl BassBoostLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for BassBoostLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
