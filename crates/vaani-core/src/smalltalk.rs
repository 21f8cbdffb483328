//! Canned replies for greetings, menus and goodbyes.
//!
//! Only short messages are considered, and the assistant only asks when the
//! extractor found no question, so "hey, how many satellites?" still goes to
//! the graph.

use crate::tokens::{contains_phrase, tokenize};

/// Messages longer than this are never small talk.
const MAX_SMALLTALK_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmallTalk {
    Greeting,
    Help,
    Capabilities,
    Suggestions,
    Farewell,
}

const GREETINGS: &[&str] = &[
    "hi", "hello", "hey", "namaste", "start", "begin", "good morning", "good afternoon", "good evening",
];
const HELP: &[&str] = &["help", "menu", "options", "what can you do"];
const CAPABILITIES: &[&str] = &["features", "capabilities", "abilities"];
const SUGGESTIONS: &[&str] = &["suggest", "suggestions", "topics", "examples"];
const FAREWELLS: &[&str] = &["thanks", "thank you", "bye", "goodbye"];

/// Ordered so a "thanks, bye" is a farewell and "hi, help" asks for help.
const RULES: &[(&[&str], SmallTalk)] = &[
    (FAREWELLS, SmallTalk::Farewell),
    (HELP, SmallTalk::Help),
    (CAPABILITIES, SmallTalk::Capabilities),
    (SUGGESTIONS, SmallTalk::Suggestions),
    (GREETINGS, SmallTalk::Greeting),
];

const FEATURED_TOPICS: &[&str] = &[
    "🌙 Chandrayaan-3 lunar mission",
    "🚀 PSLV: India's workhorse rocket",
    "🔴 Mars Orbiter Mission achievements",
    "👨‍🚀 Gaganyaan human spaceflight program",
    "🛰️ NavIC navigation constellation",
    "🏢 ISRO vs NASA comparison",
];

/// Classify a short message as small talk.
pub fn detect(text: &str) -> Option<SmallTalk> {
    let tokens = tokenize(text);
    if tokens.is_empty() || tokens.len() > MAX_SMALLTALK_WORDS {
        return None;
    }
    RULES
        .iter()
        .find(|(phrases, _)| phrases.iter().any(|p| contains_phrase(&tokens, p)))
        .map(|(_, kind)| *kind)
}

/// Reply text; farewells are personalised by how many questions were asked.
pub fn reply(kind: SmallTalk, interaction_count: u32) -> String {
    let lines: Vec<String> = match kind {
        SmallTalk::Greeting => [
            "🚀 Namaste! I'm Vaani, your space assistant!",
            "🌟 Ready to explore the cosmos of Indian space technology?",
            "",
            "Try asking me:",
            "• List ISRO satellites 🛰️",
            "• Tell me about Chandrayaan-3 🌙",
            "• Compare PSLV and GSLV 🚀",
            "",
            "What would you like to know about space technology?",
        ]
        .map(String::from)
        .to_vec(),
        SmallTalk::Help => [
            "🤖 Vaani can help you with:",
            "",
            "🛰️ *Satellites*: List, search, and learn about satellites",
            "🚀 *Launch Vehicles*: PSLV, GSLV, LVM3 details",
            "🌍 *Missions*: Chandrayaan, Mars Orbiter Mission, Gaganyaan",
            "🏢 *Agencies*: ISRO, NASA, and other space organizations",
            "👨‍🚀 *People*: Scientists and space leaders",
            "📍 *Locations*: Launch centers and facilities",
            "",
            "Just ask in simple English! Example:",
            "'How many satellites did ISRO launch in 2023?'",
        ]
        .map(String::from)
        .to_vec(),
        SmallTalk::Capabilities => [
            "🧠 What Vaani can do:",
            "",
            "🔢 *Counts*: satellites, missions, launches by year",
            "📋 *Lists*: everything an agency or rocket has launched",
            "📖 *Details*: status, dates, budgets, payload capacity",
            "🔄 *Comparisons*: rockets, missions, agencies side by side",
            "📅 *Timelines*: launches in order since any year",
            "",
            "💡 *Pro tip*: ask follow-ups like 'when was it launched?'",
        ]
        .map(String::from)
        .to_vec(),
        SmallTalk::Suggestions => {
            let mut lines = vec![
                "💡 *Vaani's Featured Topics*:".to_string(),
                String::new(),
                "Here are some interesting space topics to explore:".to_string(),
            ];
            lines.extend(FEATURED_TOPICS.iter().enumerate().map(|(i, t)| format!("{}. {}", i + 1, t)));
            lines.push(String::new());
            lines.push("Just type your question naturally!".to_string());
            lines
        }
        SmallTalk::Farewell => {
            let opener = match interaction_count {
                0 | 1 => "Thanks for trying Vaani! 🚀".to_string(),
                2..=5 => format!("Thanks for the {} questions! Keep exploring space! 🌟", interaction_count),
                _ => format!("Wow, {} questions! You're a space enthusiast! 🚀🌟", interaction_count),
            };
            vec![
                opener,
                String::new(),
                "Feel free to come back anytime to explore".to_string(),
                "the fascinating world of space technology!".to_string(),
            ]
        }
    };
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_short_messages() {
        assert_eq!(detect("Hi!"), Some(SmallTalk::Greeting));
        assert_eq!(detect("good morning Vaani"), Some(SmallTalk::Greeting));
        assert_eq!(detect("help"), Some(SmallTalk::Help));
        assert_eq!(detect("what can you do?"), Some(SmallTalk::Help));
        assert_eq!(detect("topics"), Some(SmallTalk::Suggestions));
        assert_eq!(detect("thanks, bye"), Some(SmallTalk::Farewell));
    }

    #[test]
    fn test_substrings_do_not_trigger() {
        assert_eq!(detect("Which satellites"), None);
        assert_eq!(detect("Chandrayaan history"), None);
    }

    #[test]
    fn test_long_messages_are_questions() {
        assert_eq!(detect("hi can you list every ISRO mission since 2010"), None);
    }

    #[test]
    fn test_farewell_personalised() {
        assert!(reply(SmallTalk::Farewell, 1).starts_with("Thanks for trying Vaani"));
        assert!(reply(SmallTalk::Farewell, 3).contains("3 questions"));
        assert!(reply(SmallTalk::Farewell, 12).contains("space enthusiast"));
    }
}
