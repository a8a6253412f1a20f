//! Message quality scoring - pluggable bonus heuristic

use crate::scoring::event::MessageFeatures;

/// Computes the quality bonus for a message from its shape signals.
/// Implementations return a non-negative bonus; the scoring policy
/// clamps it to the configured cap either way.
pub trait QualityScorer: Send + Sync {
    fn score(&self, features: &MessageFeatures) -> f64;
}

/// Default heuristic: length earns up to 0.20, attachments 0.10,
/// links 0.05. Sums to the default quality cap of 0.35.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicQualityScorer;

impl HeuristicQualityScorer {
    const LENGTH_FULL_AT: f64 = 400.0;
    const LENGTH_MAX: f64 = 0.20;
    const ATTACHMENT_BONUS: f64 = 0.10;
    const LINK_BONUS: f64 = 0.05;
}

impl QualityScorer for HeuristicQualityScorer {
    fn score(&self, features: &MessageFeatures) -> f64 {
        let length = (features.char_len as f64 / Self::LENGTH_FULL_AT).min(1.0) * Self::LENGTH_MAX;
        let attachments = if features.attachment_count > 0 {
            Self::ATTACHMENT_BONUS
        } else {
            0.0
        };
        let links = if features.link_count > 0 { Self::LINK_BONUS } else { 0.0 };
        length + attachments + links
    }
}
