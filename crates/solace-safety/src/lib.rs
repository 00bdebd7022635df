// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safety and crisis gate.
//!
//! Every inbound message is classified before any generation work starts.
//! The deterministic layer (curated keywords and phrase patterns) always
//! wins: a keyword match is a crisis no matter what any model says. Model
//! signals can only raise severity, never lower it, and when no model
//! signal is available the gate errs on the stricter side.

mod patterns;

pub use patterns::{CRISIS_KEYWORDS, CRISIS_RESOURCES, REDIRECTION_MESSAGE};

use tracing::{debug, warn};

use solace_core::{
    Emotion, Intent, NlpFeatures, SafetyRationale, SafetyVerdict, SentimentLabel, Severity,
};
use solace_nlp::rules::analyze_rules;

use patterns::CompiledPatterns;

/// Negative sentiment confidence at which the model signal flags a message.
const MODEL_FLAG_CONFIDENCE: f32 = 0.8;
/// Stricter bound used when the extractor produced nothing.
const DEGRADED_FLAG_CONFIDENCE: f32 = 0.7;

/// Classifies messages before generation.
#[derive(Debug)]
pub struct SafetyGate {
    patterns: CompiledPatterns,
}

impl Default for SafetyGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyGate {
    pub fn new() -> Self {
        Self {
            patterns: CompiledPatterns::compile(),
        }
    }

    /// Classify one message. `features` is the extractor output when it was
    /// available; pass `None` when extraction failed or timed out, which
    /// makes the gate classify from its own rule analysis with a stricter
    /// flagging bound.
    pub fn classify(&self, text: &str, features: Option<&NlpFeatures>) -> SafetyVerdict {
        let lower = text.to_lowercase();

        // Deterministic layer first. Nothing downgrades these.
        if let Some(keyword) = self.patterns.matched_crisis_keyword(&lower) {
            warn!(keyword, "crisis keyword matched");
            return SafetyVerdict {
                severity: Severity::Crisis,
                rationale: SafetyRationale::MatchedKeyword,
            };
        }
        if self.patterns.matches_crisis_pattern(&lower) {
            warn!("crisis phrase pattern matched");
            return SafetyVerdict {
                severity: Severity::Crisis,
                rationale: SafetyRationale::MatchedPattern,
            };
        }

        if !self.patterns.is_on_topic(&lower) {
            debug!("off-topic message screened");
            return SafetyVerdict {
                severity: Severity::Sensitive,
                rationale: SafetyRationale::Screened,
            };
        }

        // Model layer. Absent features mean the extractor failed; fall back
        // to rule analysis and flag at a lower confidence.
        let fallback;
        let (signal, flag_confidence) = match features {
            Some(f) => (f, MODEL_FLAG_CONFIDENCE),
            None => {
                fallback = analyze_rules(text);
                (&fallback, DEGRADED_FLAG_CONFIDENCE)
            }
        };

        if signal.intent == Intent::Crisis {
            return SafetyVerdict {
                severity: Severity::Crisis,
                rationale: SafetyRationale::ModelFlagged,
            };
        }

        let distressed_emotion = matches!(signal.emotion, Emotion::Grief | Emotion::Sadness);
        let strong_negative = signal.sentiment.label == SentimentLabel::Negative
            && signal.sentiment.confidence >= flag_confidence;
        if distressed_emotion || strong_negative {
            return SafetyVerdict {
                severity: Severity::Sensitive,
                rationale: SafetyRationale::ModelFlagged,
            };
        }

        SafetyVerdict::safe()
    }

    /// The fixed reply for verdicts that bypass generation. `None` means
    /// the message proceeds to the cascade.
    pub fn reserved_reply(&self, verdict: &SafetyVerdict) -> Option<&'static str> {
        match (verdict.severity, verdict.rationale) {
            (Severity::Crisis, _) => Some(CRISIS_RESOURCES),
            (Severity::Sensitive, SafetyRationale::Screened) => Some(REDIRECTION_MESSAGE),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::Sentiment;

    fn gate() -> SafetyGate {
        SafetyGate::new()
    }

    fn flagged(sentiment_confidence: f32) -> NlpFeatures {
        NlpFeatures {
            sentiment: Sentiment {
                label: SentimentLabel::Negative,
                confidence: sentiment_confidence,
            },
            ..NlpFeatures::neutral()
        }
    }

    #[test]
    fn crisis_keyword_always_wins() {
        let g = gate();
        // Even paired with fully neutral model output.
        let verdict = g.classify("I want to end my life", Some(&NlpFeatures::neutral()));
        assert_eq!(verdict.severity, Severity::Crisis);
        assert_eq!(verdict.rationale, SafetyRationale::MatchedKeyword);
    }

    #[test]
    fn crisis_keyword_matches_case_insensitively() {
        let verdict = gate().classify("I've been thinking about SUICIDE", None);
        assert_eq!(verdict.severity, Severity::Crisis);
    }

    #[test]
    fn crisis_phrase_pattern_matches() {
        let g = gate();
        for text in [
            "I am thinking about ending it all",
            "everyone would be better off without me",
            "I can't take it anymore",
            "there is no point in living",
        ] {
            let verdict = g.classify(text, Some(&NlpFeatures::neutral()));
            assert_eq!(verdict.severity, Severity::Crisis, "text: {text}");
        }
    }

    #[test]
    fn crisis_reply_is_the_reserved_resources_text() {
        let g = gate();
        let verdict = g.classify("I want to die", None);
        let reply = g.reserved_reply(&verdict).unwrap();
        assert!(reply.contains("988"));
        assert!(reply.contains("741741"));
    }

    #[test]
    fn model_signal_upgrades_safe_to_sensitive() {
        let verdict = gate().classify("nothing works out for me", Some(&flagged(0.9)));
        assert_eq!(verdict.severity, Severity::Sensitive);
        assert_eq!(verdict.rationale, SafetyRationale::ModelFlagged);
    }

    #[test]
    fn weak_model_signal_does_not_flag() {
        let verdict = gate().classify("an ordinary day overall", Some(&flagged(0.6)));
        assert_eq!(verdict.severity, Severity::Safe);
    }

    #[test]
    fn grief_emotion_flags_sensitive() {
        let features = NlpFeatures {
            emotion: Emotion::Grief,
            ..NlpFeatures::neutral()
        };
        let verdict = gate().classify("about my grandfather", Some(&features));
        assert_eq!(verdict.severity, Severity::Sensitive);
    }

    #[test]
    fn crisis_intent_from_model_upgrades_to_crisis() {
        let features = NlpFeatures {
            intent: Intent::Crisis,
            ..NlpFeatures::neutral()
        };
        let verdict = gate().classify("it is urgent, please", Some(&features));
        assert_eq!(verdict.severity, Severity::Crisis);
        assert_eq!(verdict.rationale, SafetyRationale::ModelFlagged);
    }

    #[test]
    fn missing_features_classify_stricter() {
        let g = gate();
        // Distress vocabulary with no extractor output gets flagged.
        let verdict = g.classify("I feel hopeless and empty and lonely", None);
        assert_eq!(verdict.severity, Severity::Sensitive);
        // The same text with a confident-neutral model reading passes.
        let verdict = g.classify(
            "I feel hopeless and empty and lonely",
            Some(&NlpFeatures::neutral()),
        );
        assert_eq!(verdict.severity, Severity::Safe);
    }

    #[test]
    fn off_topic_message_is_screened() {
        let g = gate();
        let verdict = g.classify("what do you think of the stock market today?", None);
        assert_eq!(verdict.severity, Severity::Sensitive);
        assert_eq!(verdict.rationale, SafetyRationale::Screened);
        assert!(g.reserved_reply(&verdict).unwrap().contains("mental health"));
    }

    #[test]
    fn on_topic_wellbeing_text_is_not_screened() {
        let g = gate();
        let verdict = g.classify("how do I cope with panic attacks at work", None);
        assert_ne!(verdict.rationale, SafetyRationale::Screened);
    }

    #[test]
    fn ambiguous_text_defaults_on_topic() {
        // Rejecting legitimate concerns is worse than answering vaguely.
        let verdict = gate().classify(
            "everything has been a lot lately",
            Some(&NlpFeatures::neutral()),
        );
        assert_ne!(verdict.rationale, SafetyRationale::Screened);
    }

    #[test]
    fn safe_verdict_has_no_reserved_reply() {
        let g = gate();
        let verdict = g.classify("hello there", Some(&NlpFeatures::neutral()));
        assert_eq!(verdict.severity, Severity::Safe);
        assert!(g.reserved_reply(&verdict).is_none());
    }
}
