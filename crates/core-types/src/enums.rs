use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The emotional state a trader records before or after a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Emotion {
    Confident,
    Hopeful,
    Neutral,
    Anxious,
    Fearful,
}

impl Emotion {
    /// Every emotion in display order, from most to least composed.
    pub const ALL: [Emotion; 5] = [
        Emotion::Confident,
        Emotion::Hopeful,
        Emotion::Neutral,
        Emotion::Anxious,
        Emotion::Fearful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Confident => "Confident",
            Emotion::Hopeful => "Hopeful",
            Emotion::Neutral => "Neutral",
            Emotion::Anxious => "Anxious",
            Emotion::Fearful => "Fearful",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CoreError::UnknownEmotion(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("anxious".parse::<Emotion>().unwrap(), Emotion::Anxious);
        assert_eq!(" CONFIDENT ".parse::<Emotion>().unwrap(), Emotion::Confident);
    }

    #[test]
    fn rejects_unknown_label() {
        assert_eq!(
            "euphoric".parse::<Emotion>(),
            Err(CoreError::UnknownEmotion("euphoric".to_string()))
        );
    }
}
