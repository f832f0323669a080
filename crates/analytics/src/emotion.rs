use core_types::{Emotion, Trade};
use serde::{Deserialize, Serialize};

/// How often an emotion was recorded before and after trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionCount {
    pub emotion: Emotion,
    pub before: usize,
    pub after: usize,
}

/// Counts per emotion, one entry for every emotion in [`Emotion::ALL`] order.
pub fn emotion_breakdown(trades: &[Trade]) -> Vec<EmotionCount> {
    Emotion::ALL
        .into_iter()
        .map(|emotion| EmotionCount {
            emotion,
            before: trades
                .iter()
                .filter(|t| t.emotion_before == Some(emotion))
                .count(),
            after: trades
                .iter()
                .filter(|t| t.emotion_after == Some(emotion))
                .count(),
        })
        .collect()
}
