use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;

/// Letter band summarizing admission probability, adjusted for confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Provisional band from probability alone. Boundaries are inclusive on the
    /// lower bound, so a probability exactly at a threshold takes the higher band.
    pub fn band(probability: f64) -> Self {
        if probability >= 80.0 {
            Grade::A
        } else if probability >= 60.0 {
            Grade::B
        } else if probability >= 40.0 {
            Grade::C
        } else if probability >= 20.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// One band lower; F is a fixed point.
    pub const fn downgrade(self) -> Self {
        match self {
            Grade::A => Grade::B,
            Grade::B => Grade::C,
            Grade::C => Grade::D,
            Grade::D | Grade::F => Grade::F,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// Band the probability, then drop one band when confidence is too low to present
/// the nominal figure with certainty.
pub(crate) fn assign(probability: f64, confidence: f64, config: &ScoringConfig) -> Grade {
    let provisional = Grade::band(probability);
    if confidence < config.low_confidence_threshold {
        provisional.downgrade()
    } else {
        provisional
    }
}
