// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based feature extraction.
//!
//! Pure keyword and pattern analysis with no I/O. This is both the
//! always-available fallback behind the model-backed extractor and a
//! complete extractor in its own right when no API key is configured.
//! Empty or whitespace-only input yields neutral features.

use async_trait::async_trait;
use solace_core::{
    Emotion, FeatureExtractor, Intent, NlpFeatures, Sentiment, SentimentLabel, SolaceError,
};

pub(crate) const GRIEF_KEYWORDS: &[&str] = &[
    "lost", "loss", "died", "death", "grief", "bereavement", "passed", "gone",
];
pub(crate) const EMOTIONAL_KEYWORDS: &[&str] = &["sad", "anxious", "depressed", "down", "upset"];
const COPING_KEYWORDS: &[&str] = &["cope", "coping", "ways", "strategies", "deal", "manage"];
const GREETING_KEYWORDS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good evening",
    "good afternoon",
    "good night",
];

const SADNESS_KEYWORDS: &[&str] = &[
    "sad", "down", "depressed", "hopeless", "miserable", "unhappy", "blue", "empty", "lonely",
];
const ANXIETY_KEYWORDS: &[&str] = &[
    "anxious", "nervous", "worried", "panicking", "panic", "scared", "afraid", "fear", "stress",
];
const ANGER_KEYWORDS: &[&str] = &[
    "angry", "mad", "frustrated", "irritated", "annoyed", "upset", "furious", "rage",
];
const JOY_KEYWORDS: &[&str] = &[
    "happy", "joy", "excited", "glad", "pleased", "grateful", "thankful", "content",
];

const SYMPTOM_KEYWORDS: &[&str] = &[
    "symptom", "pain", "headache", "tired", "exhausted", "nauseous",
];

const QUESTION_STARTERS: &[&str] = &[
    "what", "how", "why", "when", "where", "who", "can", "could", "would", "will",
];

const STOPWORDS: &[&str] = &[
    "the", "and", "but", "for", "are", "was", "been", "have", "has", "had", "this", "that",
    "with", "from", "they", "them", "their", "about", "just", "really", "very", "feel",
    "feeling", "like", "dont", "cant", "not", "you", "your", "what", "when", "where", "why",
    "how", "its", "img", "ive", "get", "got",
];

/// True when `needle` appears in `haystack` bounded by non-alphanumeric
/// characters. Plain substring matching would flag "hi" inside "this".
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let at = start + pos;
        let before_ok = at == 0
            || !haystack[..at]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let after = at + needle.len();
        let after_ok = after >= haystack.len()
            || !haystack[after..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = at + needle.len();
    }
    false
}

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| contains_word(text, kw))
}

fn count_matches(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| contains_word(text, kw)).count()
}

/// Keyword-based intent detection. Ordering matters: greetings win over
/// coping requests, which win over emotional signals.
pub(crate) fn detect_intent(text: &str) -> Intent {
    if matches_any(text, GREETING_KEYWORDS) {
        Intent::Greeting
    } else if matches_any(text, COPING_KEYWORDS) {
        Intent::CopingStrategies
    } else if matches_any(text, EMOTIONAL_KEYWORDS) || matches_any(text, GRIEF_KEYWORDS) {
        Intent::EmotionalSupport
    } else if contains_word(text, "crisis") || contains_word(text, "urgent") {
        Intent::Crisis
    } else if ["what is", "how does", "why do", "when can", "where"]
        .iter()
        .any(|q| text.contains(q))
    {
        Intent::SeekingInformation
    } else if contains_word(text, "resource")
        || contains_word(text, "referral")
        || text.contains("help with")
    {
        Intent::ResourcesRequest
    } else if matches_any(text, SYMPTOM_KEYWORDS) {
        Intent::PhysicalSymptom
    } else {
        Intent::General
    }
}

/// Count-based sentiment: more negative than positive words reads negative,
/// with confidence growing with the margin.
pub(crate) fn rule_sentiment(text: &str) -> Sentiment {
    let negative = count_matches(text, GRIEF_KEYWORDS)
        + count_matches(text, SADNESS_KEYWORDS)
        + count_matches(text, ANXIETY_KEYWORDS)
        + count_matches(text, ANGER_KEYWORDS);
    let positive = count_matches(text, JOY_KEYWORDS);

    if negative > positive {
        Sentiment {
            label: SentimentLabel::Negative,
            confidence: (0.5 + (negative - positive) as f32 * 0.1).min(0.9),
        }
    } else if positive > negative {
        Sentiment {
            label: SentimentLabel::Positive,
            confidence: (0.5 + (positive - negative) as f32 * 0.1).min(0.9),
        }
    } else {
        Sentiment {
            label: SentimentLabel::Neutral,
            confidence: 0.6,
        }
    }
}

/// Count-based emotion. Grief wins outright; otherwise the emotion with
/// the most keyword hits.
pub(crate) fn rule_emotion(text: &str) -> Emotion {
    if matches_any(text, GRIEF_KEYWORDS) {
        return Emotion::Grief;
    }
    let counts = [
        (Emotion::Sadness, count_matches(text, SADNESS_KEYWORDS)),
        (Emotion::Fear, count_matches(text, ANXIETY_KEYWORDS)),
        (Emotion::Anger, count_matches(text, ANGER_KEYWORDS)),
        (Emotion::Joy, count_matches(text, JOY_KEYWORDS)),
    ];
    counts
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .max_by_key(|(_, n)| *n)
        .map(|(e, _)| e)
        .unwrap_or(Emotion::None)
}

/// High-signal keyword overrides applied on top of any model output.
/// Explicit grief or distress words beat a classifier's opinion.
pub(crate) fn apply_overrides(text: &str, features: &mut NlpFeatures) {
    if matches_any(text, GRIEF_KEYWORDS) {
        features.sentiment = Sentiment {
            label: SentimentLabel::Negative,
            confidence: 0.9,
        };
        features.emotion = Emotion::Grief;
        return;
    }
    if matches_any(text, EMOTIONAL_KEYWORDS) {
        features.sentiment = Sentiment {
            label: SentimentLabel::Negative,
            confidence: 0.85,
        };
    }
    if contains_word(text, "sad") {
        features.emotion = Emotion::Sadness;
    } else if ["anxious", "nervous", "worry", "afraid", "scared"]
        .iter()
        .any(|t| contains_word(text, t))
    {
        features.emotion = Emotion::Fear;
    } else if ["angry", "mad", "frustrated", "annoyed"]
        .iter()
        .any(|t| contains_word(text, t))
    {
        features.emotion = Emotion::Anger;
    }
}

pub(crate) fn is_question(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.ends_with('?') {
        return true;
    }
    let lower = trimmed.to_lowercase();
    QUESTION_STARTERS
        .iter()
        .any(|w| lower.starts_with(w) && !lower[w.len()..].starts_with(|c: char| c.is_alphanumeric()))
}

/// Lightweight keyword extraction: distinct non-stopword terms of four or
/// more characters, in order of first appearance, capped at five.
pub(crate) fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for raw in text.split(|c: char| !c.is_alphanumeric()) {
        let word = raw.to_lowercase();
        if word.len() < 4 || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        if !seen.contains(&word) {
            seen.push(word);
            if seen.len() == 5 {
                break;
            }
        }
    }
    seen
}

/// Analyze text with rules alone. Never fails and performs no I/O.
pub fn analyze_rules(text: &str) -> NlpFeatures {
    if text.trim().is_empty() {
        return NlpFeatures::neutral();
    }
    let lower = text.to_lowercase();
    let mut features = NlpFeatures {
        intent: detect_intent(&lower),
        sentiment: rule_sentiment(&lower),
        emotion: rule_emotion(&lower),
        keywords: extract_keywords(text),
        is_question: is_question(text),
    };
    apply_overrides(&lower, &mut features);
    features
}

/// Feature extractor backed only by the rule tables.
#[derive(Debug, Default, Clone)]
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FeatureExtractor for RuleBasedExtractor {
    async fn analyze(&self, text: &str) -> Result<NlpFeatures, SolaceError> {
        Ok(analyze_rules(text))
    }
}
