// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Curated keyword lists, phrase patterns, and reserved reply texts.
//!
//! The keyword list is deliberately short and high-precision. Broader
//! coverage belongs in the phrase patterns, which tolerate small wording
//! variations without matching ordinary conversation.

use regex::{Regex, RegexSet};

/// High-risk phrases. A substring match on any of these is a crisis,
/// unconditionally.
pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "harm myself",
    "end my life",
    "want to die",
    "don't want to live",
    "no reason to live",
    "emergency",
    "crisis",
];

const CRISIS_PATTERNS: &[&str] = &[
    r"(want|thinking about|considering)( to)? (die|suicide|kill (myself|me)|end(ing)? it all)",
    r"(don't|do not|dont) (want to|wanna) (live|be alive|exist)",
    r"(no|zero) (point|reason|purpose) (in|to|for) (living|life|going on)",
    r"(everyone|the world|world)( would be| is)? better off without me",
    r"(can't|cannot|cant) (take|handle|deal with) (it|this)( anymore| any longer)?$",
    r"(plan|planning|preparing) (to|on) (hurt|harm|kill) (myself|me)",
    r"(this is|that's) (my last|goodbye|farewell)",
];

/// Vocabulary that marks a message as in scope.
const MENTAL_HEALTH_TOPICS: &[&str] = &[
    // Conditions
    "depression", "anxiety", "stress", "grief", "trauma", "ptsd", "ocd",
    "bipolar", "schizophrenia", "adhd", "eating disorder", "anorexia",
    "bulimia", "binge eating", "panic attack", "phobia", "insomnia",
    // Approaches and treatments
    "therapy", "counseling", "psychiatry", "psychology", "mental health",
    "coping", "mindfulness", "meditation", "self-care", "support group",
    "cognitive behavioral", "cbt", "dbt", "psychotherapy", "treatment",
    // Emotional states
    "emotion", "feeling", "mood", "sadness", "happiness", "anger", "fear",
    "loneliness", "isolation", "burnout", "exhaustion", "overwhelm",
    // Related concepts
    "wellbeing", "wellness", "emotional health", "resilience", "recovery",
    "healing", "self-esteem", "confidence", "boundaries", "relationship",
    "social anxiety",
];

const WELLBEING_PATTERNS: &[&str] = &[
    r"how (can|do) (i|you) (cope|deal|manage|handle)",
    r"(i'm|i am|im) (feeling|so) (sad|down|anxious|depressed|worried|stressed)",
    r"(help|advice) (with|for) (my|dealing with|coping with)",
    r"(feel|feeling) (better|worse|good|bad|low|high)",
    r"having (trouble|difficulty|problems) with",
    r"(cant|can't|cannot) (stop|help) (thinking|feeling|worrying)",
];

const OFF_TOPIC_PATTERNS: &[&str] = &[
    r"\b(stock market|investment|cryptocurrency|bitcoin|finance|trading)\b",
    r"\b(sports|football|basketball|baseball|soccer|match|score)\b",
    r"\b(politics|election|government|policy|politician|vote|campaign)\b",
    r"\b(recipe|cooking|baking|ingredients|dinner|lunch|breakfast)\b",
    r"\b(movie|film|tv show|television|actor|actress|director)\b",
    r"\b(weather|forecast|temperature|rain|snow|sunny|cloudy|storm)\b",
    r"\b(travel|vacation|flight|hotel|tourist|destination|trip)\b",
    r"\b(news|headline|article|journalism|reporter|media)\b",
    r"\b(gadget|device|computer|software|hardware)\b",
    r"\b(shopping|product|purchase|store|mall|online shop)\b",
];

/// Fixed crisis reply. Served verbatim, never model-generated.
pub const CRISIS_RESOURCES: &str = "I'm concerned about your wellbeing. If you're in crisis or \
having thoughts of suicide, please reach out for immediate help:\n\
\u{2022} Call or text 988 to reach the Suicide & Crisis Lifeline\n\
\u{2022} Text HOME to 741741 to reach the Crisis Text Line\n\
\u{2022} Call 911 or go to your nearest emergency room\n\n\
These services are free, confidential, and available 24/7. \
You deserve support, and help is available.";

/// Fixed reply for out-of-scope messages.
pub const REDIRECTION_MESSAGE: &str = "I'm specialized in providing support for mental health \
concerns. While I can't help with that specific topic, I'm here if you'd like to discuss \
anything related to emotional wellbeing, stress, anxiety, or other mental health topics. \
Is there something about your mental or emotional wellbeing you'd like to talk about?";

/// Patterns compiled once at gate construction.
#[derive(Debug)]
pub(crate) struct CompiledPatterns {
    crisis: Vec<Regex>,
    topics: RegexSet,
    wellbeing: RegexSet,
    off_topic: RegexSet,
}

impl CompiledPatterns {
    pub(crate) fn compile() -> Self {
        // All patterns are compile-time literals; a failure here is a bug
        // in this file, not a runtime condition.
        let crisis = CRISIS_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("crisis pattern is a valid regex"))
            .collect();
        let topics = RegexSet::new(
            MENTAL_HEALTH_TOPICS
                .iter()
                .map(|t| format!(r"\b{}", regex::escape(t))),
        )
        .expect("topic terms form valid regexes");
        let wellbeing =
            RegexSet::new(WELLBEING_PATTERNS).expect("wellbeing patterns are valid regexes");
        let off_topic =
            RegexSet::new(OFF_TOPIC_PATTERNS).expect("off-topic patterns are valid regexes");
        Self {
            crisis,
            topics,
            wellbeing,
            off_topic,
        }
    }

    /// The first crisis keyword found in `text` (already lowercased).
    pub(crate) fn matched_crisis_keyword(&self, text: &str) -> Option<&'static str> {
        CRISIS_KEYWORDS.iter().find(|kw| text.contains(*kw)).copied()
    }

    pub(crate) fn matches_crisis_pattern(&self, text: &str) -> bool {
        self.crisis.iter().any(|p| p.is_match(text))
    }

    /// Scope check. Explicit topics and wellbeing phrasing are in scope,
    /// listed off-topic domains are out, and anything ambiguous is accepted
    /// so a real concern is never turned away.
    pub(crate) fn is_on_topic(&self, text: &str) -> bool {
        if self.topics.is_match(text) || self.wellbeing.is_match(text) {
            return true;
        }
        !self.off_topic.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_returns_the_match() {
        let p = CompiledPatterns::compile();
        assert_eq!(
            p.matched_crisis_keyword("i think about suicide a lot"),
            Some("suicide")
        );
        assert_eq!(p.matched_crisis_keyword("a calm afternoon"), None);
    }

    #[test]
    fn topic_terms_match_on_word_start_only() {
        let p = CompiledPatterns::compile();
        // "adhd" the term matches, "add" buried in "address" must not
        // drag an unrelated message in scope.
        assert!(p.is_on_topic("was recently diagnosed with adhd"));
        assert!(!p.is_on_topic("what is the shipping address of the store"));
    }

    #[test]
    fn cant_take_it_anymore_requires_sentence_end() {
        let p = CompiledPatterns::compile();
        assert!(p.matches_crisis_pattern("i can't take it anymore"));
        // The same words mid-sentence about something mundane do not match
        // this pattern (the keyword layer is unaffected).
        assert!(!p.matches_crisis_pattern("i can't take it anymore than you can lift it"));
    }
}
