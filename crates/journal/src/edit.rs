use core_types::{Emotion, TradeAnnotation};
use std::collections::BTreeSet;

/// A partial change to a trade's journaling.
///
/// Fields left as `None` keep their recorded value. A `clear_*` flag, or an empty
/// note or news text, removes the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationEdit {
    pub journal: Option<String>,
    pub clear_journal: bool,
    pub emotion_before: Option<Emotion>,
    pub clear_emotion_before: bool,
    pub emotion_after: Option<Emotion>,
    pub clear_emotion_after: bool,
    pub news_analysis: Option<String>,
    pub clear_news_analysis: bool,
    pub add_tags: BTreeSet<String>,
    pub remove_tags: BTreeSet<String>,
}

impl AnnotationEdit {
    pub fn apply(&self, current: TradeAnnotation) -> TradeAnnotation {
        let mut tags = current.tags;
        tags.extend(
            self.add_tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        );
        tags.retain(|t| !self.remove_tags.contains(t));

        TradeAnnotation {
            journal: edit_text(current.journal, &self.journal, self.clear_journal),
            emotion_before: edit_value(
                current.emotion_before,
                self.emotion_before,
                self.clear_emotion_before,
            ),
            emotion_after: edit_value(
                current.emotion_after,
                self.emotion_after,
                self.clear_emotion_after,
            ),
            tags,
            news_analysis: edit_text(
                current.news_analysis,
                &self.news_analysis,
                self.clear_news_analysis,
            ),
        }
    }
}

fn edit_value<T>(current: Option<T>, new: Option<T>, clear: bool) -> Option<T> {
    match new {
        Some(value) => Some(value),
        None if clear => None,
        None => current,
    }
}

fn edit_text(current: Option<String>, new: &Option<String>, clear: bool) -> Option<String> {
    match new.as_deref().map(str::trim) {
        Some("") => None,
        Some(text) => Some(text.to_string()),
        None if clear => None,
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded() -> TradeAnnotation {
        TradeAnnotation {
            journal: Some("Entered on the retest".into()),
            emotion_before: Some(Emotion::Confident),
            emotion_after: Some(Emotion::Anxious),
            tags: ["breakout".to_string(), "london".to_string()].into_iter().collect(),
            news_analysis: Some("CPI beat".into()),
        }
    }

    #[test]
    fn empty_edit_keeps_everything() {
        assert_eq!(AnnotationEdit::default().apply(recorded()), recorded());
    }

    #[test]
    fn clear_flags_remove_values() {
        let edit = AnnotationEdit {
            clear_journal: true,
            clear_emotion_before: true,
            clear_emotion_after: true,
            clear_news_analysis: true,
            ..Default::default()
        };

        let result = edit.apply(recorded());

        assert_eq!(result.journal, None);
        assert_eq!(result.emotion_before, None);
        assert_eq!(result.emotion_after, None);
        assert_eq!(result.news_analysis, None);
        assert_eq!(result.tags, recorded().tags);
    }

    #[test]
    fn empty_text_clears() {
        let edit = AnnotationEdit {
            journal: Some("  ".into()),
            news_analysis: Some(String::new()),
            ..Default::default()
        };

        let result = edit.apply(recorded());

        assert_eq!(result.journal, None);
        assert_eq!(result.news_analysis, None);
    }

    #[test]
    fn new_values_replace_and_tags_merge() {
        let edit = AnnotationEdit {
            emotion_after: Some(Emotion::Hopeful),
            clear_emotion_after: true,
            add_tags: ["fomo".to_string()].into_iter().collect(),
            remove_tags: ["london".to_string()].into_iter().collect(),
            ..Default::default()
        };

        let result = edit.apply(recorded());

        assert_eq!(result.emotion_after, Some(Emotion::Hopeful));
        assert_eq!(
            result.tags.into_iter().collect::<Vec<_>>(),
            vec!["breakout".to_string(), "fomo".to_string()]
        );
    }
}
