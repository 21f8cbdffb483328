//! Intent and entity extraction.
//!
//! Pure function of the input text and the static tables in
//! [`crate::gazetteer`]. Never fails: text with nothing recognizable
//! yields [`Intent::Unknown`] and no mentions.

use serde::Serialize;

use crate::gazetteer::{ALIASES, ATTRIBUTE_WORDS, CATEGORY_PHRASES, PRONOUNS};
use crate::model::{Attribute, Category, EntityMention, Intent, YearBound};
use crate::tokens::{matches_at, phrase_words, tokenize, Token};

/// Earliest year accepted as a time filter (Sputnik).
const MIN_YEAR: i32 = 1957;
const MAX_YEAR: i32 = 2100;

/// Everything the extractor learned from one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    /// Mentions in order of appearance, one per canonical name.
    pub entities: Vec<EntityMention>,
    pub intent: Intent,
    pub year: Option<i32>,
    /// Whether the year is a point or one end of a range.
    pub year_bound: YearBound,
    /// Category named by a plain noun ("satellites"), if any.
    pub subject: Option<Category>,
    pub attribute: Option<Attribute>,
    /// The message leans on a pronoun ("it", "its", ...).
    pub follow_up: bool,
    /// Mentions span more than one category.
    pub ambiguous: bool,
}

impl Extraction {
    /// Mentions of a given category, in order of appearance.
    pub fn mentions_of(&self, category: Category) -> impl Iterator<Item = &EntityMention> {
        self.entities.iter().filter(move |m| m.category == category)
    }

    /// The leftmost mention, used as the tie-break for mixed categories.
    pub fn leftmost(&self) -> Option<&EntityMention> {
        self.entities.first()
    }

    /// Re-run intent classification after mentions were added from context.
    pub fn with_entities(mut self, entities: Vec<EntityMention>) -> Self {
        self.ambiguous = spans_categories(&entities);
        self.entities = entities;
        if self.intent == Intent::Unknown && !self.entities.is_empty() {
            self.intent = Intent::Describe;
        }
        self
    }
}

/// Inputs to the intent predicates.
struct Signals<'a> {
    tokens: &'a [Token],
    has_year: bool,
}

impl Signals<'_> {
    fn any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|phrase| {
            let words = phrase_words(phrase);
            (0..self.tokens.len()).any(|i| matches_at(self.tokens, i, &words))
        })
    }
}

type Predicate = fn(&Signals) -> bool;

/// Intent rules in priority order; first match wins.
const INTENT_RULES: &[(Predicate, Intent)] = &[
    (is_compare, Intent::Compare),
    (is_count, Intent::Count),
    (is_list, Intent::List),
    (is_time_filtered, Intent::TimeFiltered),
    (is_describe, Intent::Describe),
];

fn is_compare(s: &Signals) -> bool {
    s.any(&[
        "compare", "comparison", "vs", "versus", "difference between",
        "differences between", "better than", "bigger than", "which is better",
    ])
}

fn is_count(s: &Signals) -> bool {
    s.any(&["how many", "count", "number of", "total", "tally"])
}

fn is_list(s: &Signals) -> bool {
    s.any(&[
        "list", "show me", "show all", "which", "name all", "name the",
        "what are", "all the", "enumerate", "give me",
    ])
}

fn is_time_filtered(s: &Signals) -> bool {
    s.has_year
        || s.any(&[
            "launched in", "since", "between", "during", "timeline",
            "in the year", "before", "after", "history of",
        ])
}

fn is_describe(s: &Signals) -> bool {
    s.any(&[
        "tell me about", "what is", "what was", "who is", "who was", "describe",
        "details", "detail", "about", "explain", "when was", "when did",
        "where is", "info", "information", "what about",
    ])
}

/// Extract entities, year, subject and intent from raw text.
pub fn extract(input: &str) -> Extraction {
    let tokens = tokenize(input);
    let mut consumed = vec![false; tokens.len()];

    let entities = find_mentions(input, &tokens, &mut consumed);
    let subject = find_subject(&tokens, &mut consumed);
    let (year, year_bound) = match find_year(&tokens, &consumed) {
        Some((at, year)) => (Some(year), year_bound(&tokens, at)),
        None => (None, YearBound::In),
    };
    let attribute = find_attribute(&tokens, &consumed);
    let follow_up = tokens
        .iter()
        .zip(&consumed)
        .any(|(t, used)| !used && PRONOUNS.contains(&t.text.as_str()));

    let signals = Signals { tokens: &tokens, has_year: year.is_some() };
    let intent = classify(&signals, !entities.is_empty() || subject.is_some());

    Extraction {
        ambiguous: spans_categories(&entities),
        entities,
        intent,
        year,
        year_bound,
        subject,
        attribute,
        follow_up,
    }
}

fn classify(signals: &Signals, recognized: bool) -> Intent {
    INTENT_RULES
        .iter()
        .find(|(predicate, _)| predicate(signals))
        .map(|(_, intent)| *intent)
        .unwrap_or(if recognized { Intent::Describe } else { Intent::Unknown })
}

fn find_mentions(input: &str, tokens: &[Token], consumed: &mut [bool]) -> Vec<EntityMention> {
    let mut mentions: Vec<EntityMention> = Vec::new();

    for alias in ALIASES.iter() {
        let len = alias.words.len();
        for i in 0..tokens.len() {
            if i + len > tokens.len() || consumed[i..i + len].iter().any(|c| *c) {
                continue;
            }
            if matches_at(tokens, i, &alias.words) {
                consumed[i..i + len].iter_mut().for_each(|c| *c = true);
                let start = tokens[i].start;
                let end = tokens[i + len - 1].end;
                mentions.push(EntityMention {
                    raw_text_span: input[start..end].to_string(),
                    offset: start,
                    canonical_name: alias.entry.canonical.to_string(),
                    category: alias.entry.category,
                });
            }
        }
    }

    mentions.sort_by_key(|m| m.offset);
    let mut seen: Vec<String> = Vec::new();
    mentions.retain(|m| {
        if seen.contains(&m.canonical_name) {
            false
        } else {
            seen.push(m.canonical_name.clone());
            true
        }
    });
    mentions
}

/// First category noun (by position) outside entity spans.
fn find_subject(tokens: &[Token], consumed: &mut [bool]) -> Option<Category> {
    let mut found: Option<(usize, Category)> = None;

    for (words, category) in CATEGORY_PHRASES.iter() {
        let len = words.len();
        for i in 0..tokens.len() {
            if i + len > tokens.len() || consumed[i..i + len].iter().any(|c| *c) {
                continue;
            }
            if matches_at(tokens, i, words) {
                consumed[i..i + len].iter_mut().for_each(|c| *c = true);
                if found.map_or(true, |(pos, _)| i < pos) {
                    found = Some((i, *category));
                }
            }
        }
    }

    found.map(|(_, category)| category)
}

/// First plausible year and its token index.
fn find_year(tokens: &[Token], consumed: &[bool]) -> Option<(usize, i32)> {
    tokens
        .iter()
        .zip(consumed)
        .enumerate()
        .filter(|(_, (t, used))| !**used && t.text.len() == 4)
        .filter_map(|(i, (t, _))| t.text.parse::<i32>().ok().map(|year| (i, year)))
        .find(|(_, year)| (MIN_YEAR..=MAX_YEAR).contains(year))
}

/// Read the word before the year: "since 2019", "before 2000".
fn year_bound(tokens: &[Token], at: usize) -> YearBound {
    let previous = at.checked_sub(1).map(|i| tokens[i].text.as_str());
    match previous {
        Some("since") => YearBound::Since,
        Some("after") => YearBound::After,
        Some("before" | "until" | "till") => YearBound::Before,
        _ => YearBound::In,
    }
}

fn find_attribute(tokens: &[Token], consumed: &[bool]) -> Option<Attribute> {
    ATTRIBUTE_WORDS.iter().find_map(|(phrase, attribute)| {
        let words = phrase_words(phrase);
        let len = words.len();
        (0..tokens.len())
            .any(|i| {
                i + len <= tokens.len()
                    && !consumed[i..i + len].iter().any(|c| *c)
                    && matches_at(tokens, i, &words)
            })
            .then_some(*attribute)
    })
}

fn spans_categories(entities: &[EntityMention]) -> bool {
    entities
        .first()
        .map_or(false, |first| entities.iter().any(|m| m.category != first.category))
}
