// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt rendering for the model-backed stages.
//!
//! One rendered prompt is shared by every provider attempt in a cascade
//! pass, so a fallback provider answers the same question the primary saw.

use std::fmt::Write;

use solace_core::{Emotion, Intent, Message, NlpFeatures, ResponseStyle, Role, Severity};

const BASE_PROMPT: &str = "\
As Solace, a mental health support companion, provide a compassionate response addressing the user's needs.
Use evidence-based approaches like cognitive behavioral therapy concepts, mindfulness, and positive psychology.

Response guidelines:
- Be empathetic but not overly emotional
- Validate feelings without reinforcing negative thought patterns
- Suggest practical, actionable coping strategies when appropriate
- Recognize your limitations and refer to professional help when needed
- Be concise and clear (under 100 words)
- Never diagnose medical or psychiatric conditions
- For crisis situations, always emphasize immediate professional help with the 988 Lifeline";

const MAX_REPLY_CHARS: usize = 900;

const LIFELINE_REMINDER: &str = "If you are in crisis or thinking about harming yourself, \
please call or text 988 to reach the Suicide & Crisis Lifeline, available 24/7.";

const SENSITIVE_ADVISORY: &str = "\
The user may be in distress. Respond with particular care: lead with validation, \
keep suggestions gentle and optional, avoid clinical language, and remind them that \
professional support is available if things feel heavy.";

fn intent_guidance(intent: Intent) -> &'static str {
    match intent {
        Intent::EmotionalSupport | Intent::PersonalStory => {
            "Focus on validation and normalizing their feelings. Show empathy and understanding \
             without minimizing their experience."
        }
        Intent::CopingStrategies => {
            "Suggest 1-2 specific, evidence-based coping strategies relevant to their situation. \
             Phrase suggestions tentatively, like 'Some people find that...'."
        }
        Intent::Crisis => {
            "Emphasize immediate professional help. Include the 988 crisis number prominently. \
             Be direct but compassionate."
        }
        Intent::SeekingInformation => {
            "Provide factual mental health information concisely, noting that it is general \
             information and not professional advice."
        }
        Intent::Greeting => {
            "Be warm and welcoming. Invite them to share how they're feeling today. Keep it concise."
        }
        Intent::ResourcesRequest => {
            "Point to reputable resources such as the 988 Lifeline, NIMH, or SAMHSA, and ask what \
             kind of support would fit best."
        }
        Intent::PhysicalSymptom => {
            "Acknowledge the physical experience, note the mind-body connection, and encourage \
             checking with a healthcare provider for persistent symptoms."
        }
        Intent::General => {
            "Gently explore what's on their mind, focusing on emotional wellbeing. Ask open-ended \
             questions that invite reflection."
        }
    }
}

fn emotion_guidance(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Sadness => {
            "Acknowledge their sadness without minimizing it. Avoid toxic positivity. Validate \
             that sadness is a normal human emotion."
        }
        Emotion::Grief => {
            "Honor their grief process. Don't rush solutions. Acknowledge that grief doesn't \
             follow a timeline and can come in waves. Avoid cliches."
        }
        Emotion::Fear => {
            "Help ground them in the present. Consider suggesting a brief mindfulness technique. \
             Avoid saying 'don't worry' or 'just relax'."
        }
        Emotion::Anger => {
            "Validate the feeling while helping explore what might be beneath the anger. Offer \
             space without judgment."
        }
        Emotion::Joy => {
            "Share in the positive moment and reinforce what is working for them."
        }
        Emotion::None => {
            "Gently explore their emotional state if appropriate. Use open questions to invite \
             reflection."
        }
    }
}

fn style_guidance(style: ResponseStyle) -> &'static str {
    match style {
        ResponseStyle::Friendly => {
            "The user prefers a friendly, conversational communication style. Use a warm, \
             approachable tone and casual language while maintaining professionalism."
        }
        ResponseStyle::Professional => {
            "The user prefers a professional communication style. Use a formal tone with precise \
             language. Avoid colloquialisms. Be thorough but concise."
        }
        ResponseStyle::Neutral => {
            "The user prefers a balanced communication style, neither too formal nor too casual. \
             Focus on clarity and helpfulness."
        }
    }
}

/// Render the full prompt: system guidance, per-message advisories, the
/// recent context window, and the current user message.
pub fn render_prompt(
    context: &[Message],
    current: &str,
    features: &NlpFeatures,
    style: ResponseStyle,
    severity: Severity,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(BASE_PROMPT);

    let _ = write!(prompt, "\n\nIntent guidance: {}", intent_guidance(features.intent));
    let _ = write!(prompt, "\n\nEmotion guidance: {}", emotion_guidance(features.emotion));
    let _ = write!(prompt, "\n\n{}", style_guidance(style));

    if severity == Severity::Sensitive {
        let _ = write!(prompt, "\n\n{SENSITIVE_ADVISORY}");
    }

    prompt.push_str("\n\nConversation history:\n");
    if context.is_empty() {
        prompt.push_str("(none)\n");
    }
    for message in context {
        if message.deleted {
            continue;
        }
        let speaker = match message.role {
            Role::User => "User",
            Role::Assistant => "Solace",
        };
        let _ = writeln!(prompt, "{speaker}: {}", message.content);
    }

    let _ = write!(
        prompt,
        "\nCurrent user message: {current}\n\nRespond as Solace, providing compassionate mental health support."
    );
    prompt
}

/// Post-process model output before serving: trim, clamp overlong replies
/// at a sentence or word boundary, and append the 988 lifeline when the
/// reply touches self-harm without naming it.
pub fn finalize_reply(text: &str) -> String {
    let mut reply = text.trim().to_string();

    if reply.chars().count() > MAX_REPLY_CHARS {
        let cut: String = reply.chars().take(MAX_REPLY_CHARS).collect();
        let end = cut
            .rfind(['.', '!', '?'])
            .map(|i| i + 1)
            .or_else(|| cut.rfind(' '))
            .unwrap_or(cut.len());
        reply = cut[..end].trim_end().to_string();
    }

    let lower = reply.to_lowercase();
    let crisis_adjacent = ["suicide", "suicidal", "self-harm", "harm yourself", "kill yourself"]
        .iter()
        .any(|term| lower.contains(term));
    if crisis_adjacent && !reply.contains("988") {
        reply.push_str("\n\n");
        reply.push_str(LIFELINE_REMINDER);
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::ProviderKind;

    #[test]
    fn prompt_contains_context_in_order_and_current_message() {
        let context = vec![
            Message::user("I had a rough week"),
            Message::assistant("That sounds heavy. What happened?", ProviderKind::Gemini),
        ];
        let prompt = render_prompt(
            &context,
            "work mostly",
            &NlpFeatures::neutral(),
            ResponseStyle::Neutral,
            Severity::Safe,
        );
        let first = prompt.find("User: I had a rough week").unwrap();
        let second = prompt.find("Solace: That sounds heavy").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Current user message: work mostly"));
    }

    #[test]
    fn sensitive_severity_adds_the_advisory() {
        let safe = render_prompt(
            &[],
            "hi",
            &NlpFeatures::neutral(),
            ResponseStyle::Neutral,
            Severity::Safe,
        );
        let sensitive = render_prompt(
            &[],
            "hi",
            &NlpFeatures::neutral(),
            ResponseStyle::Neutral,
            Severity::Sensitive,
        );
        assert!(!safe.contains("may be in distress"));
        assert!(sensitive.contains("may be in distress"));
    }

    #[test]
    fn deleted_messages_are_omitted() {
        let mut tombstone = Message::user("secret thing");
        tombstone.deleted = true;
        tombstone.content.clear();
        let prompt = render_prompt(
            &[tombstone, Message::user("visible")],
            "next",
            &NlpFeatures::neutral(),
            ResponseStyle::Neutral,
            Severity::Safe,
        );
        assert!(prompt.contains("User: visible"));
        assert!(!prompt.contains("secret"));
    }

    #[test]
    fn finalize_clamps_overlong_replies_at_a_sentence() {
        let long = "A perfectly reasonable sentence. ".repeat(60);
        let finalized = finalize_reply(&long);
        assert!(finalized.chars().count() <= 900);
        assert!(finalized.ends_with('.'));
    }

    #[test]
    fn finalize_appends_lifeline_to_crisis_adjacent_output() {
        let reply = "It sounds like you have been having thoughts of suicide lately.";
        let finalized = finalize_reply(reply);
        assert!(finalized.contains("988"));

        // Already naming the lifeline gets no duplicate.
        let with_line = "Please call 988 right away if you are thinking about suicide.";
        assert_eq!(finalize_reply(with_line).matches("988").count(), 1);

        // Ordinary replies pass through untouched.
        assert_eq!(finalize_reply("  Glad that helped.  "), "Glad that helped.");
    }

    #[test]
    fn style_changes_the_guidance_block() {
        let friendly = render_prompt(
            &[],
            "hi",
            &NlpFeatures::neutral(),
            ResponseStyle::Friendly,
            Severity::Safe,
        );
        assert!(friendly.contains("friendly, conversational"));
    }
}
