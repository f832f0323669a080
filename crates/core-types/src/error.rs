use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown emotion '{0}' (expected one of Confident, Hopeful, Neutral, Anxious, Fearful)")]
    UnknownEmotion(String),
}
