// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal template responder.
//!
//! The last stage of the cascade. Selection is deterministic: the intent
//! picks a category, grief redirects to emotional support, and the response
//! style picks the variant within the category. No call can fail and no
//! template is empty.

use solace_core::{Emotion, Intent, NlpFeatures, ResponseStyle};

const GREETING: [&str; 3] = [
    "Hello. I'm Solace, here to support you with mental health concerns. How are you feeling today?",
    "Hi there! I'm Solace, your mental health companion. How can I help you today?",
    "Welcome to Solace. I'm here to listen and support you. How are you doing right now?",
];

const EMOTIONAL_SUPPORT: [&str; 3] = [
    "I hear that you're going through a difficult time. It's okay to feel this way, and you're not alone. Would you like to talk more about what you're experiencing?",
    "That sounds really challenging. Many people experience similar feelings, and it's completely valid to feel this way. What helps you cope when you feel like this?",
    "I'm sorry you're feeling this way. Your emotions are valid, and it takes courage to express them. Would you like to explore some strategies that might help?",
];

const COPING_STRATEGIES: [&str; 3] = [
    "Some strategies that might help include deep breathing, mindfulness, gentle physical activity, or talking with a trusted person. Would you like to know more about any of these?",
    "When feeling overwhelmed, many find it helpful to practice grounding techniques, like the 5-4-3-2-1 method where you notice 5 things you see, 4 things you feel, and so on. Would you like to try this?",
    "Creating a self-care routine can be helpful. This might include regular sleep, balanced nutrition, movement, and time for activities you enjoy. What self-care activities resonate with you?",
];

const CRISIS: [&str; 3] = [
    "I'm concerned about what you've shared. If you're in crisis, please call 988 for immediate support from the Suicide & Crisis Lifeline. They're available 24/7 and can help you through this difficult time.",
    "Your safety is important. Please reach out to the 988 Suicide & Crisis Lifeline right away by calling or texting 988. They provide free, confidential support 24/7.",
    "This sounds serious. Please contact crisis support immediately by calling 988. Professional help is available, and you deserve immediate support for what you're experiencing.",
];

const SEEKING_INFORMATION: [&str; 3] = [
    "Mental health is about our emotional, psychological, and social well-being. It affects how we think, feel, and act. What specific aspect would you like to know more about?",
    "There are many resources available for mental health support. These include therapy, support groups, self-help strategies, and crisis services. Would you like information about any of these?",
    "Understanding mental health is an important step in maintaining wellbeing. Is there a particular topic or condition you'd like to learn more about?",
];

const RESOURCES_REQUEST: [&str; 3] = [
    "For mental health resources, the National Institute of Mental Health (nimh.nih.gov) and SAMHSA (samhsa.gov) offer reliable information. For immediate support, the 988 Suicide & Crisis Lifeline is available 24/7.",
    "There are many resources available, including online therapy platforms, community mental health centers, and support groups. Which type of resource would be most helpful for you right now?",
    "Mental health resources include crisis lines like 988, therapy services, support groups, and educational websites. What kind of support are you looking for specifically?",
];

const PHYSICAL_SYMPTOM: [&str; 3] = [
    "Physical symptoms and mental health are often connected. It may help to note when the symptom appears and what's happening around you. For persistent symptoms, a healthcare provider is the right first stop. How long has this been going on?",
    "Our bodies often carry stress for us. Alongside checking in with a healthcare provider, gentle rest, hydration, and slow breathing can ease the load. Would you like to talk about what's been weighing on you?",
    "Thank you for sharing that. Physical discomfort can be draining, and it's worth mentioning to a medical professional. In the meantime, is there anything stressful going on that we could talk through?",
];

const GENERAL: [&str; 3] = [
    "I'm Solace, here to support you with mental health concerns. What's on your mind today?",
    "Mental wellbeing is important, and I'm glad you reached out. How can I help support yours today?",
    "This is Solace, focused on helping with emotional and mental health. What would be most helpful for you right now?",
];

/// Deterministic template-based responder.
#[derive(Debug, Default, Clone)]
pub struct BuiltinResponder;

impl BuiltinResponder {
    pub fn new() -> Self {
        Self
    }

    /// Produce a reply for the given features and style. Always non-empty.
    pub fn respond(&self, features: &NlpFeatures, style: ResponseStyle) -> String {
        let category = match features.intent {
            _ if features.emotion == Emotion::Grief => &EMOTIONAL_SUPPORT,
            Intent::Crisis => &CRISIS,
            Intent::Greeting => &GREETING,
            Intent::EmotionalSupport | Intent::PersonalStory => &EMOTIONAL_SUPPORT,
            Intent::CopingStrategies => &COPING_STRATEGIES,
            Intent::SeekingInformation => &SEEKING_INFORMATION,
            Intent::ResourcesRequest => &RESOURCES_REQUEST,
            Intent::PhysicalSymptom => &PHYSICAL_SYMPTOM,
            Intent::General => &GENERAL,
        };
        let variant = match style {
            ResponseStyle::Neutral => 0,
            ResponseStyle::Friendly => 1,
            ResponseStyle::Professional => 2,
        };
        category[variant].to_string()
    }
}
