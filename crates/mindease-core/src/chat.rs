//! Keyword-matching chat responder.
//!
//! Stateless: the first keyword found in the lowercased message picks the
//! reply, otherwise one of the fallback lines is chosen at random.

use rand::seq::SliceRandom;
use rand::Rng;

const BREATHING_REPLY: &str = "The breathing exercise follows a simple cycle: Inhale for 4 seconds, Hold for 4 seconds, Exhale for 6 seconds. Repeat as many times as feels comfortable. This technique helps activate your body's relaxation response.";
const GREETING_REPLY: &str = "Hi! Welcome to MindEase. I'm here to support your mental wellness. How are you feeling today? Would you like to check your mood, try a breathing exercise, or just chat?";

/// Checked in order; the first substring match wins.
const KEYWORD_REPLIES: &[(&str, &str)] = &[
    ("mood", "How wonderful that you're checking in with your mood! Open the \"How are you feeling today?\" section to log your current feelings. Tracking patterns can help you understand what influences your wellbeing."),
    ("stress", "It's completely normal to feel stressed. Try our guided breathing exercise — even 2-3 minutes can help calm your nervous system. Remember, small steps add up."),
    ("anxiety", "Anxiety can feel overwhelming, but you're not alone. I recommend: 1) Try the guided breathing exercise for immediate relief, 2) Check in with your mood, 3) Take a short break. You've got this."),
    ("breath", BREATHING_REPLY),
    ("breathing", BREATHING_REPLY),
    ("sleep", "Quality sleep is essential for mental health. Try a calming breathing session before bed, and aim for consistency. If sleep is challenging, consider tracking your mood to identify patterns."),
    ("help", "I'm here to support your mental wellness journey. I can help with: mood tracking tips, breathing exercises, stress management, anxiety relief, and general wellness advice. What would help you most right now?"),
    ("thank", "You're welcome! Remember, taking care of your mental health is a gift to yourself. Keep using MindEase to build positive daily habits."),
    ("hello", GREETING_REPLY),
    ("hi", GREETING_REPLY),
];

pub const FALLBACK_REPLIES: [&str; 4] = [
    "That's important to share. Remember, your mental health matters. Is there anything specific I can help with—mood tracking, breathing, or just listening?",
    "I'm here to support you. Would you like to try a guided breathing exercise, check your mood, or just talk?",
    "Thank you for opening up. Taking time for yourself is a positive step. What can I help you with today?",
    "I hear you. Your wellbeing is my priority. Would exploring the features help—like mood tracking or breathing exercises?",
];

/// Reply matched by keyword, if any.
pub fn keyword_reply(message: &str) -> Option<&'static str> {
    let message = message.trim().to_lowercase();
    KEYWORD_REPLIES
        .iter()
        .find(|(keyword, _)| message.contains(keyword))
        .map(|(_, reply)| *reply)
}

/// Reply to a free-text message. Blank input gets no reply.
pub fn respond<R: Rng + ?Sized>(message: &str, rng: &mut R) -> Option<&'static str> {
    if message.trim().is_empty() {
        return None;
    }
    keyword_reply(message).or_else(|| FALLBACK_REPLIES.choose(rng).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn matches_keyword_case_insensitively() {
        let reply = keyword_reply("I feel SO Stressed out").unwrap();
        assert!(reply.starts_with("It's completely normal to feel stressed"));
    }

    #[test]
    fn earlier_keywords_win() {
        // "mood" is checked before "sleep".
        let reply = keyword_reply("my mood after sleep").unwrap();
        assert!(reply.contains("checking in with your mood"));
    }

    #[test]
    fn hi_matches_inside_words() {
        assert_eq!(keyword_reply("this is fine"), Some(GREETING_REPLY));
    }

    #[test]
    fn falls_back_to_default_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let reply = respond("purple elephants", &mut rng).unwrap();
        assert!(FALLBACK_REPLIES.contains(&reply));
    }

    #[test]
    fn blank_message_gets_no_reply() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(respond("   ", &mut rng).is_none());
    }
}
