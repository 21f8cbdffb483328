//! Response formatting.
//!
//! Turns a typed [`QueryResult`] into user-facing text plus the structured
//! payload. Pure and deterministic: the same plan and result always give the
//! same response. Surface-specific decoration happens in [`render`].

use serde::Serialize;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::model::{Attribute, Category};
use crate::result::{Item, LabelCount, QueryResult, Record};
use crate::translate::{Filters, QueryPlan, TemplateId};

/// Items shown before the "+N more" line.
pub const MAX_LIST_ITEMS: usize = 8;

/// Longest message sent to a messaging surface.
pub const MAX_MESSAGE_CHARS: usize = 4000;
const TRUNCATE_AT_CHARS: usize = 3900;

pub const SIGNATURE: &str = "🚀 *Vaani* - Space Knowledge AI";

const SUMMARY_CHARS: usize = 140;

/// Presentation-neutral answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub answer_text: String,
    pub structured_data: Value,
    pub confidence: f32,
}

impl Response {
    /// A text-only answer that did not come from the graph.
    pub fn canned(text: impl Into<String>) -> Self {
        Self { answer_text: text.into(), structured_data: Value::Null, confidence: 0.0 }
    }
}

/// Where a response is going to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Web,
    WhatsApp,
}

/// Format a decoded result for the plan that produced it.
pub fn format_response(plan: &QueryPlan, result: &QueryResult) -> Response {
    let template = plan.query.template;
    let answer_text = match result {
        QueryResult::Count { count } => count_sentence(template, &plan.filters, *count),
        QueryResult::Listing { items } => listing(template, &plan.filters, items),
        QueryResult::Timeline { items } => timeline(template, &plan.filters, items),
        QueryResult::Detail { record } => detail(record, plan.focus),
        QueryResult::Comparison { records } => comparison(records),
        QueryResult::Breakdown { counts, total } => breakdown(counts, *total),
        QueryResult::Empty => no_results(),
    };

    let mut confidence = plan.strength.confidence();
    if result.is_empty() {
        confidence /= 2.0;
    }

    Response {
        answer_text,
        structured_data: serde_json::to_value(result).unwrap_or(Value::Null),
        confidence,
    }
}

/// Text shown when the question could not be understood.
pub fn help_text() -> String {
    [
        "🤔 I'm not sure what you're asking, but here's what I can answer:",
        "",
        "🔢 *Counts*: \"How many satellites did ISRO launch in 2023?\"",
        "📋 *Lists*: \"List ISRO missions\"",
        "📖 *Details*: \"Tell me about Chandrayaan-3\"",
        "🔄 *Comparisons*: \"Compare PSLV and GSLV\"",
        "📅 *Timelines*: \"Satellites launched since 2019\"",
        "",
        "Type 'help' anytime for more options.",
    ]
    .join("\n")
}

/// Decorate a response for a surface.
pub fn render(response: &Response, surface: Surface) -> String {
    match surface {
        Surface::Web => response.answer_text.clone(),
        Surface::WhatsApp => {
            let text = format!("{}\n\n{}", SIGNATURE, response.answer_text);
            if text.chars().count() > MAX_MESSAGE_CHARS {
                let kept: String = text.chars().take(TRUNCATE_AT_CHARS).collect();
                format!("{}\n\n... (truncated)\nAsk for more specific details!", kept)
            } else {
                text
            }
        }
    }
}

fn count_sentence(template: TemplateId, filters: &Filters, count: i64) -> String {
    let category = template.category().unwrap_or(Category::Satellite);
    let noun = if count == 1 { category.singular() } else { category.plural() };
    format!(
        "{} I found {} {}{}.",
        category.emoji(),
        count,
        noun,
        filter_phrase(category, filters)
    )
}

/// " operated by ISRO launched in 2023", or empty without filters.
fn filter_phrase(category: Category, filters: &Filters) -> String {
    let mut parts = Vec::new();
    if let Some(agency) = &filters.agency {
        parts.push(format!("operated by {}", agency));
    }
    if let Some(vehicle) = &filters.vehicle {
        parts.push(format!("launched on {}", vehicle));
    }
    if let Some(site) = &filters.site {
        parts.push(format!("launched from {}", site));
    }
    if let Some(year) = filters.year {
        let launched = matches!(category, Category::Satellite | Category::Mission)
            && filters.vehicle.is_none()
            && filters.site.is_none();
        let bound = filters.year_bound.as_str();
        if launched {
            parts.push(format!("launched {} {}", bound, year));
        } else {
            parts.push(format!("{} {}", bound, year));
        }
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" {}", parts.join(" "))
    }
}

fn list_title(template: TemplateId, filters: &Filters) -> (String, String) {
    match template.category() {
        Some(c) => (c.emoji().to_string(), format!("*{}*{}", capitalize(c.plural()), filter_phrase(c, filters))),
        None => ("🚀".to_string(), format!("*Recent launches*{}", filter_phrase(Category::Satellite, filters))),
    }
}

fn listing(template: TemplateId, filters: &Filters, items: &[Item]) -> String {
    let (emoji, title) = list_title(template, filters);
    let mut lines = vec![format!("{} {} ({} found):", emoji, title, items.len()), String::new()];

    for (i, item) in items.iter().take(MAX_LIST_ITEMS).enumerate() {
        lines.push(format!("*{}. {}*", i + 1, item.name));
        let meta: Vec<String> = [
            item.date.as_ref().map(|d| format!("📅 {}", d)),
            item.status.as_ref().map(|s| format!("📊 {}", s)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !meta.is_empty() {
            lines.push(format!("   {}", meta.join(" · ")));
        }
        if let Some(summary) = &item.summary {
            lines.push(format!("   {}", clip(summary, SUMMARY_CHARS)));
        }
    }

    if items.len() > MAX_LIST_ITEMS {
        lines.push(format!("+{} more", items.len() - MAX_LIST_ITEMS));
    }
    lines.push(String::new());
    lines.push("💡 Ask for details about any of these!".to_string());
    lines.join("\n")
}

fn timeline(template: TemplateId, filters: &Filters, items: &[Item]) -> String {
    let (_, title) = list_title(template, filters);
    let mut lines = vec![format!("📅 Timeline of {} ({} found):", title, items.len()), String::new()];

    for item in items.iter().take(MAX_LIST_ITEMS) {
        let date = item.date.as_deref().unwrap_or("date unknown");
        lines.push(format!("• {} - *{}*", date, item.name));
    }
    if items.len() > MAX_LIST_ITEMS {
        lines.push(format!("+{} more", items.len() - MAX_LIST_ITEMS));
    }
    lines.join("\n")
}

fn detail(record: &Record, focus: Option<Attribute>) -> String {
    let mut lines = Vec::new();
    if let Some(attribute) = focus {
        lines.push(focused_answer(record, attribute));
        lines.push(String::new());
    }
    lines.extend(card(record));
    lines.join("\n")
}

fn focused_answer(record: &Record, attribute: Attribute) -> String {
    let name = &record.name;
    let answer = match attribute {
        Attribute::LaunchDate => record.date.as_ref().map(|d| {
            let verb = match record.category {
                Some(Category::Vehicle) => "first flew on",
                Some(Category::Agency) => "was founded on",
                Some(Category::Satellite | Category::Mission) | None => "was launched on",
                Some(_) => "dates from",
            };
            format!("📅 {} {} {}.", name, verb, d)
        }),
        Attribute::Status => record.status.as_ref().map(|s| format!("📊 {} is currently {}.", name, s)),
        Attribute::Objective => record.summary.as_ref().map(|s| format!("🎯 {}", s)),
        Attribute::Agency => record.agency.as_ref().map(|a| format!("🏢 {} is operated by {}.", name, a)),
        Attribute::Vehicle => record.vehicle.as_ref().map(|v| format!("🚀 {} was launched on {}.", name, v)),
        Attribute::Budget => record.budget_usd.map(|b| format!("💰 {} has a budget of {}.", name, money(b))),
        Attribute::Payload => record
            .payload_capacity_kg
            .map(|kg| format!("📦 {} can lift {} kg.", name, trim_float(kg))),
        Attribute::Site => record.site.as_ref().map(|s| format!("📍 {} was launched from {}.", name, s)),
    };
    answer.unwrap_or_else(|| format!("🤷 I don't have the {} of {} on record.", attribute_name(attribute), name))
}

fn attribute_name(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::LaunchDate => "launch date",
        Attribute::Status => "status",
        Attribute::Objective => "objective",
        Attribute::Agency => "operating agency",
        Attribute::Vehicle => "launch vehicle",
        Attribute::Budget => "budget",
        Attribute::Payload => "payload capacity",
        Attribute::Site => "launch site",
    }
}

fn card(record: &Record) -> Vec<String> {
    let emoji = record.category.map_or("🔭", |c| c.emoji());
    let mut lines = vec![format!("{} *{}*", emoji, record.name)];
    if let Some(full) = record.full_name.as_ref().filter(|f| **f != record.name) {
        lines.push(format!("   {}", full));
    }
    if let Some(summary) = &record.summary {
        lines.push(format!("   {}", summary));
    }
    for (label, value) in facts(record) {
        lines.push(format!("   {}: {}", label, value));
    }
    lines
}

/// Labelled facts present on a record, in display order.
fn facts(record: &Record) -> Vec<(&'static str, String)> {
    [
        ("📊 Status", record.status.clone()),
        ("📅 Date", record.date.clone()),
        ("🏢 Agency", record.agency.clone()),
        ("🚀 Vehicle", record.vehicle.clone()),
        ("📍 Site", record.site.clone()),
        ("🌍 Country", record.country.clone()),
        ("📦 Payload", record.payload_capacity_kg.map(|kg| format!("{} kg", trim_float(kg)))),
        ("✅ Success rate", record.success_rate.map(|r| format!("{}%", trim_float(r)))),
        ("💰 Budget", record.budget_usd.map(money)),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect()
}

fn comparison(records: &[Record]) -> String {
    let (left, right) = match records {
        [left, right, ..] => (left, right),
        [only] => {
            let mut lines = vec![
                format!("🔄 I only found *{}* in my records, so there's nothing to compare it with.", only.name),
                String::new(),
            ];
            lines.extend(card(only));
            return lines.join("\n");
        }
        [] => return no_results(),
    };

    let rows: Vec<(&str, String, String)> = [
        ("Full name", left.full_name.clone(), right.full_name.clone()),
        ("Status", left.status.clone(), right.status.clone()),
        ("Date", left.date.clone(), right.date.clone()),
        ("Agency", left.agency.clone(), right.agency.clone()),
        ("Country", left.country.clone(), right.country.clone()),
        (
            "Payload",
            left.payload_capacity_kg.map(|kg| format!("{} kg", trim_float(kg))),
            right.payload_capacity_kg.map(|kg| format!("{} kg", trim_float(kg))),
        ),
        (
            "Success",
            left.success_rate.map(|r| format!("{}%", trim_float(r))),
            right.success_rate.map(|r| format!("{}%", trim_float(r))),
        ),
        ("Budget", left.budget_usd.map(money), right.budget_usd.map(money)),
    ]
    .into_iter()
    .filter(|(_, l, r)| l.is_some() || r.is_some())
    .map(|(label, l, r)| (label, l.unwrap_or_else(|| "-".into()), r.unwrap_or_else(|| "-".into())))
    .collect();

    let label_width = rows.iter().map(|(l, _, _)| l.width()).max().unwrap_or(0);
    let left_width = rows
        .iter()
        .map(|(_, l, _)| l.width())
        .chain(std::iter::once(left.name.width()))
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!("🔄 *{}* vs *{}*", left.name, right.name), String::new(), "```".to_string()];
    lines.push(format!(
        "{}  {}  {}",
        pad("", label_width),
        pad(&left.name, left_width),
        right.name
    ));
    for (label, l, r) in &rows {
        lines.push(format!("{}  {}  {}", pad(label, label_width), pad(l, left_width), r));
    }
    lines.push("```".to_string());
    lines.join("\n")
}

fn breakdown(counts: &[LabelCount], total: i64) -> String {
    let mut lines = vec!["📊 *What I know about*:".to_string(), String::new()];
    for entry in counts {
        lines.push(format!(
            "{} {}: *{}*",
            entry.category.emoji(),
            capitalize(entry.category.plural()),
            entry.count
        ));
    }
    lines.push(String::new());
    lines.push(format!("📈 Total: *{}* records", total));
    lines.join("\n")
}

fn no_results() -> String {
    [
        "🔍 I looked, but found no matching data for that question.",
        "",
        "💡 *Try these instead*:",
        "• Use simpler terms (e.g., 'ISRO satellites')",
        "• Check the spelling of names",
        "• Type 'help' for more options",
    ]
    .join("\n")
}

/// Pad to a display width, counting wide glyphs correctly.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn money(usd: f64) -> String {
    if usd >= 1e9 {
        format!("${:.1}B USD", usd / 1e9)
    } else if usd >= 1e6 {
        format!("${:.1}M USD", usd / 1e6)
    } else {
        format!("${:.0} USD", usd)
    }
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Intent, YearBound};
    use crate::translate::{BindingStrength, BoundQuery};

    fn plan(template: TemplateId, filters: Filters, focus: Option<Attribute>) -> QueryPlan {
        QueryPlan {
            query: BoundQuery::new(template, "MATCH (n) RETURN n"),
            intent: Intent::Count,
            filters,
            focus,
            strength: BindingStrength::Entity,
        }
    }

    fn item(name: &str) -> Item {
        Item { name: name.into(), category: None, summary: None, date: None, status: None }
    }

    #[test]
    fn test_count_sentence_contains_number() {
        let filters = Filters { agency: Some("ISRO".into()), year: Some(2023), ..Filters::default() };
        let plan = plan(TemplateId::Count(Category::Satellite), filters, None);
        let response = format_response(&plan, &QueryResult::Count { count: 12 });
        assert_eq!(response.answer_text, "🛰️ I found 12 satellites operated by ISRO launched in 2023.");
        assert!(!response.answer_text.contains('\n'));
        assert_eq!(response.structured_data["count"], 12);
        assert!((response.confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_count_sentence_keeps_year_qualifier() {
        let filters = Filters { year: Some(2019), year_bound: YearBound::Since, ..Filters::default() };
        let plan = plan(TemplateId::Count(Category::Satellite), filters, None);
        let response = format_response(&plan, &QueryResult::Count { count: 7 });
        assert_eq!(response.answer_text, "🛰️ I found 7 satellites launched since 2019.");
    }

    #[test]
    fn test_count_of_one_is_singular() {
        let plan = plan(TemplateId::Count(Category::Vehicle), Filters::default(), None);
        let response = format_response(&plan, &QueryResult::Count { count: 1 });
        assert_eq!(response.answer_text, "🚀 I found 1 launch vehicle.");
    }

    #[test]
    fn test_listing_caps_items() {
        let items: Vec<Item> = (1..=11).map(|i| item(&format!("SAT-{}", i))).collect();
        let plan = plan(TemplateId::List(Category::Satellite), Filters::default(), None);
        let text = format_response(&plan, &QueryResult::Listing { items }).answer_text;
        assert!(text.contains("(11 found)"));
        assert!(text.contains("*8. SAT-8*"));
        assert!(!text.contains("SAT-9"));
        assert!(text.contains("+3 more"));
    }

    #[test]
    fn test_detail_answers_focus_first() {
        let record = Record {
            name: "Chandrayaan-3".into(),
            category: Some(Category::Mission),
            date: Some("2023-07-14".into()),
            status: Some("Completed".into()),
            ..Record::default()
        };
        let plan = plan(TemplateId::Describe(Category::Mission), Filters::default(), Some(Attribute::LaunchDate));
        let text = format_response(&plan, &QueryResult::Detail { record }).answer_text;
        assert!(text.starts_with("📅 Chandrayaan-3 was launched on 2023-07-14."));
        assert!(text.contains("*Chandrayaan-3*"));
    }

    #[test]
    fn test_detail_missing_focus() {
        let record = Record { name: "Gaganyaan".into(), ..Record::default() };
        assert_eq!(
            focused_answer(&record, Attribute::Budget),
            "🤷 I don't have the budget of Gaganyaan on record."
        );
    }

    #[test]
    fn test_comparison_columns_align() {
        let left = Record {
            name: "GSLV".into(),
            payload_capacity_kg: Some(6000.0),
            success_rate: Some(75.0),
            ..Record::default()
        };
        let right = Record {
            name: "PSLV".into(),
            payload_capacity_kg: Some(1750.0),
            success_rate: Some(94.4),
            ..Record::default()
        };
        let plan = plan(TemplateId::Compare(Category::Vehicle), Filters::default(), None);
        let text = format_response(&plan, &QueryResult::Comparison { records: vec![left, right] }).answer_text;
        assert!(text.starts_with("🔄 *GSLV* vs *PSLV*"));
        let table: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != "```")
            .skip(1)
            .take_while(|l| *l != "```")
            .collect();
        assert_eq!(table.len(), 3, "{}", text);
        let offsets: Vec<Option<usize>> = vec![table[0].find("PSLV"), table[1].find("1750"), table[2].find("94.4")];
        assert!(offsets.iter().all(|o| *o == offsets[0] && o.is_some()), "{}", text);
        assert!(text.contains("94.4%"));
        assert!(!text.contains("Budget"));
    }

    #[test]
    fn test_empty_lowers_confidence() {
        let plan = plan(TemplateId::List(Category::Mission), Filters::default(), None);
        let response = format_response(&plan, &QueryResult::Empty);
        assert!(response.answer_text.starts_with("🔍 I looked"));
        assert!(response.confidence < 0.5);
    }

    #[test]
    fn test_format_is_deterministic() {
        let plan = plan(TemplateId::List(Category::Satellite), Filters::default(), None);
        let result = QueryResult::Listing { items: vec![item("A"), item("B")] };
        assert_eq!(format_response(&plan, &result), format_response(&plan, &result));
    }

    #[test]
    fn test_whatsapp_signature_and_truncation() {
        let short = Response::canned("hello");
        assert_eq!(render(&short, Surface::Web), "hello");
        assert_eq!(render(&short, Surface::WhatsApp), format!("{}\n\nhello", SIGNATURE));

        let long = Response::canned("🛰".repeat(5000));
        let text = render(&long, Surface::WhatsApp);
        assert!(text.chars().count() < MAX_MESSAGE_CHARS);
        assert!(text.contains("(truncated)"));
    }
}
