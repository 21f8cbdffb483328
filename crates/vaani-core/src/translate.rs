//! Query translation: (intent, category) to a bound Cypher template.
//!
//! Template selection is an exhaustive match over closed enums, so every
//! reachable combination has a template or the explicit help fallback.
//! Labels come from [`Category::label`]; everything that originates in user
//! text travels as a query parameter.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::extract::Extraction;
use crate::model::{Attribute, Category, EntityMention, Intent, YearBound};

/// Maximum rows fetched by listing templates.
pub const LIST_LIMIT: i64 = 50;

/// Relationship types linking a node to the agency that owns it.
const AGENCY_RELS: &str = "OPERATED_BY|CONDUCTED_BY|DEVELOPED_BY|AFFILIATED_WITH";

/// The node's primary date, whichever property its label uses.
const DATE_EXPR: &str = "coalesce(n.launch_date, n.first_flight, n.founded)";

const LISTING_PROJECTION: &str = "RETURN DISTINCT n.name AS name, labels(n)[0] AS label,
       coalesce(n.description, n.objective, n.purpose) AS summary,
       coalesce(n.launch_date, n.first_flight, n.founded) AS date,
       n.status AS status";

const DETAIL_LINKS: &str = "OPTIONAL MATCH (n)-[:OPERATED_BY|CONDUCTED_BY|DEVELOPED_BY|AFFILIATED_WITH]->(a:Agency)
OPTIONAL MATCH (n)-[:LAUNCHED_BY]->(v:LaunchVehicle)
OPTIONAL MATCH (n)-[:LAUNCHED_FROM]->(l:Location)";

const DETAIL_PROJECTION: &str = "RETURN n.name AS name, labels(n)[0] AS label, n.full_name AS full_name,
       coalesce(n.description, n.objective, n.purpose) AS summary, n.status AS status,
       coalesce(n.launch_date, n.first_flight, n.founded) AS date,
       head(collect(DISTINCT a.name)) AS agency, head(collect(DISTINCT v.name)) AS vehicle,
       head(collect(DISTINCT l.name)) AS site, n.country AS country,
       n.budget_usd AS budget_usd, n.payload_capacity_kg AS payload_capacity_kg,
       n.success_rate AS success_rate";

/// Identifies a query template. Category-bearing variants are keyed by the
/// category they query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "template", content = "category", rename_all = "snake_case")]
pub enum TemplateId {
    Count(Category),
    List(Category),
    Timeline(Category),
    Describe(Category),
    Compare(Category),
    /// Node counts per label; category-agnostic.
    Overview,
    /// Latest satellites and missions; category-agnostic.
    RecentLaunches,
}

impl TemplateId {
    /// Shape of the rows this template returns.
    pub fn shape(&self) -> Shape {
        match self {
            TemplateId::Count(_) => Shape::Count,
            TemplateId::List(_) | TemplateId::RecentLaunches => Shape::Listing,
            TemplateId::Timeline(_) => Shape::Timeline,
            TemplateId::Describe(_) => Shape::Detail,
            TemplateId::Compare(_) => Shape::Comparison,
            TemplateId::Overview => Shape::Breakdown,
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            TemplateId::Count(c)
            | TemplateId::List(c)
            | TemplateId::Timeline(c)
            | TemplateId::Describe(c)
            | TemplateId::Compare(c) => Some(*c),
            TemplateId::Overview | TemplateId::RecentLaunches => None,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateId::Count(_) => "count",
            TemplateId::List(_) => "list",
            TemplateId::Timeline(_) => "timeline",
            TemplateId::Describe(_) => "describe",
            TemplateId::Compare(_) => "compare",
            TemplateId::Overview => "overview",
            TemplateId::RecentLaunches => "recent_launches",
        };
        match self.category() {
            Some(c) => write!(f, "{}:{}", name, c.label()),
            None => f.write_str(name),
        }
    }
}

/// Row layout produced by a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Count,
    Listing,
    Timeline,
    Detail,
    Comparison,
    Breakdown,
}

impl Shape {
    /// Columns returned by templates of this shape.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Shape::Count => &["count"],
            Shape::Listing | Shape::Timeline => &["name", "label", "summary", "date", "status"],
            Shape::Detail | Shape::Comparison => &[
                "name", "label", "full_name", "summary", "status", "date", "agency",
                "vehicle", "site", "country", "budget_usd", "payload_capacity_kg", "success_rate",
            ],
            Shape::Breakdown => &["label", "count"],
        }
    }
}

/// A parameter value bound to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    TextList(Vec<String>),
}

/// A template with its parameters bound, ready for the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundQuery {
    pub template: TemplateId,
    pub cypher: String,
    pub params: BTreeMap<String, ParamValue>,
}

impl BoundQuery {
    pub fn new(template: TemplateId, cypher: impl Into<String>) -> Self {
        Self { template, cypher: cypher.into(), params: BTreeMap::new() }
    }

    pub fn param(mut self, key: &str, value: ParamValue) -> Self {
        self.params.insert(key.to_string(), value);
        self
    }

    pub fn text(self, key: &str, value: impl Into<String>) -> Self {
        self.param(key, ParamValue::Text(value.into()))
    }

    pub fn shape(&self) -> Shape {
        self.template.shape()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.shape().columns()
    }
}

/// Filters applied to counting and listing templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub year_bound: YearBound,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.agency.is_none() && self.vehicle.is_none() && self.site.is_none() && self.year.is_none()
    }
}

/// How much of the question the bound query actually captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingStrength {
    /// Named entities bound as targets or filters.
    Entity,
    /// Only a category was recognized.
    Category,
    /// Category-agnostic fallback template.
    Fallback,
}

impl BindingStrength {
    pub fn confidence(&self) -> f32 {
        match self {
            BindingStrength::Entity => 0.9,
            BindingStrength::Category => 0.75,
            BindingStrength::Fallback => 0.5,
        }
    }
}

/// A query ready to run plus what the formatter needs to phrase the answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    pub query: BoundQuery,
    /// Intent after downgrades (e.g. Compare with one target becomes Describe).
    pub intent: Intent,
    pub filters: Filters,
    pub focus: Option<Attribute>,
    pub strength: BindingStrength,
}

/// Outcome of translation.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Unknown intent: answer with help text, never touch the store.
    Canned,
    Query(QueryPlan),
}

/// The static (intent, category) to template table.
///
/// Returns `None` only for [`Intent::Unknown`], which maps to the canned help reply.
pub fn select_template(intent: Intent, category: Option<Category>) -> Option<TemplateId> {
    let template = match (intent, category) {
        (Intent::Unknown, _) => return None,
        (Intent::Count, Some(c)) => TemplateId::Count(c),
        (Intent::List, Some(c)) => TemplateId::List(c),
        (Intent::TimeFiltered, Some(c)) => TemplateId::Timeline(c),
        (Intent::Describe, Some(c)) => TemplateId::Describe(c),
        (Intent::Compare, Some(c)) => TemplateId::Compare(c),
        (Intent::Count | Intent::Describe | Intent::Compare, None) => TemplateId::Overview,
        (Intent::List | Intent::TimeFiltered, None) => TemplateId::RecentLaunches,
    };
    Some(template)
}

/// Categories that can own or launch other things and so act as filters.
fn is_owner(category: Category) -> bool {
    matches!(category, Category::Agency | Category::Vehicle | Category::Location)
}

fn owner_attribute(category: Category) -> Option<Attribute> {
    match category {
        Category::Agency => Some(Attribute::Agency),
        Category::Vehicle => Some(Attribute::Vehicle),
        Category::Location => Some(Attribute::Site),
        _ => None,
    }
}

/// Translate an extraction into a query plan.
pub fn translate(ex: &Extraction) -> Plan {
    if ex.intent == Intent::Unknown {
        return Plan::Canned;
    }

    let mut intent = ex.intent;
    let mut category = ex.subject.or_else(|| ex.leftmost().map(|m| m.category));
    let mut focus = ex.attribute;

    // "Which agency built Cartosat-3?" asks for a property of the named thing.
    if let Some(subject) = ex.subject.filter(|s| is_owner(*s)) {
        if matches!(intent, Intent::List | Intent::Describe) {
            if let Some(thing) = ex.entities.iter().find(|m| !is_owner(m.category)) {
                intent = Intent::Describe;
                category = Some(thing.category);
                focus = owner_attribute(subject);
            }
        }
    }

    // Counting or listing a named owner means counting what it launched.
    if ex.subject.is_none() && matches!(intent, Intent::Count | Intent::List | Intent::TimeFiltered) {
        match category {
            Some(c) if is_owner(c) => category = Some(Category::Satellite),
            Some(_) => intent = Intent::Describe,
            None => {}
        }
    }

    let targets: Vec<&EntityMention> = match category {
        Some(c) => ex.mentions_of(c).collect(),
        None => Vec::new(),
    };

    if category.is_some() {
        match intent {
            Intent::Compare if targets.len() == 1 => intent = Intent::Describe,
            Intent::Compare if targets.is_empty() => intent = Intent::List,
            Intent::Describe if targets.is_empty() => intent = Intent::List,
            _ => {}
        }
    }

    if ex.ambiguous {
        debug!(
            categories = ?ex.entities.iter().map(|m| m.category).collect::<Vec<_>>(),
            chosen = ?category,
            "Mentions span several categories, leftmost wins"
        );
    }

    let Some(template) = select_template(intent, category) else {
        return Plan::Canned;
    };

    let filters = match template.shape() {
        Shape::Count | Shape::Listing | Shape::Timeline => collect_filters(ex, category),
        _ => Filters::default(),
    };

    let query = bind(template, &targets, &filters);

    let strength = if !targets.is_empty() && matches!(template.shape(), Shape::Detail | Shape::Comparison) {
        BindingStrength::Entity
    } else if filters.agency.is_some() || filters.vehicle.is_some() || filters.site.is_some() {
        BindingStrength::Entity
    } else if template.category().is_some() {
        BindingStrength::Category
    } else {
        BindingStrength::Fallback
    };

    debug!(template = %template, intent = %intent, params = query.params.len(), "Query template bound");

    Plan::Query(QueryPlan {
        query,
        intent,
        filters,
        focus: if template.shape() == Shape::Detail { focus } else { None },
        strength,
    })
}

/// Unfiltered listing of one category, newest first.
pub fn explore_query(category: Category) -> BoundQuery {
    bind(TemplateId::List(category), &[], &Filters::default())
}

/// Node counts per category label.
pub fn overview_query() -> BoundQuery {
    bind(TemplateId::Overview, &[], &Filters::default())
}

fn collect_filters(ex: &Extraction, category: Option<Category>) -> Filters {
    let first_of = |owner: Category| -> Option<String> {
        if Some(owner) == category {
            return None;
        }
        ex.mentions_of(owner).next().map(|m| m.canonical_name.clone())
    };

    Filters {
        agency: first_of(Category::Agency),
        vehicle: first_of(Category::Vehicle),
        site: first_of(Category::Location),
        year: ex.year,
        year_bound: ex.year_bound,
    }
}

/// Bind parameters into the template text.
fn bind(template: TemplateId, targets: &[&EntityMention], filters: &Filters) -> BoundQuery {
    match template {
        TemplateId::Count(c) => {
            let (clauses, query) = filtered_match(template, Some(c), filters);
            let cypher = format!("{}\nRETURN count(DISTINCT n) AS count", clauses);
            BoundQuery { cypher, ..query }
        }
        TemplateId::List(c) => listing(template, Some(c), filters, "date DESC, name"),
        TemplateId::Timeline(c) => listing(template, Some(c), filters, "date ASC, name"),
        TemplateId::RecentLaunches => listing(template, None, filters, "date DESC, name"),
        TemplateId::Describe(c) => {
            let cypher = format!(
                "MATCH (n:{})\nWHERE toLower(n.name) = toLower($name)\n{}\n{}\nLIMIT 1",
                c.label(),
                DETAIL_LINKS,
                DETAIL_PROJECTION
            );
            let name = targets.first().map(|m| m.canonical_name.clone()).unwrap_or_default();
            BoundQuery::new(template, cypher).text("name", name)
        }
        TemplateId::Compare(c) => {
            let cypher = format!(
                "MATCH (n:{})\nWHERE toLower(n.name) IN [toLower($left), toLower($right)]\n{}\n{}\nORDER BY CASE WHEN toLower(name) = toLower($left) THEN 0 ELSE 1 END\nLIMIT 2",
                c.label(),
                DETAIL_LINKS,
                DETAIL_PROJECTION
            );
            let left = targets.first().map(|m| m.canonical_name.clone()).unwrap_or_default();
            let right = targets.get(1).map(|m| m.canonical_name.clone()).unwrap_or_default();
            BoundQuery::new(template, cypher).text("left", left).text("right", right)
        }
        TemplateId::Overview => {
            let labels = Category::ALL.iter().map(|c| c.label().to_string()).collect();
            let cypher = "MATCH (n)\nWHERE any(l IN labels(n) WHERE l IN $labels)\nRETURN labels(n)[0] AS label, count(n) AS count\nORDER BY count DESC, label";
            BoundQuery::new(template, cypher).param("labels", ParamValue::TextList(labels))
        }
    }
}

fn listing(template: TemplateId, category: Option<Category>, filters: &Filters, order: &str) -> BoundQuery {
    let (clauses, query) = filtered_match(template, category, filters);
    let cypher = format!("{}\n{}\nORDER BY {}\nLIMIT $limit", clauses, LISTING_PROJECTION, order);
    BoundQuery { cypher, ..query }.param("limit", ParamValue::Int(LIST_LIMIT))
}

/// MATCH clauses for a category plus filter patterns and the year range.
fn filtered_match(template: TemplateId, category: Option<Category>, filters: &Filters) -> (String, BoundQuery) {
    let mut query = BoundQuery::new(template, String::new());
    let mut lines = Vec::new();
    let mut conditions = Vec::new();

    match category {
        Some(c) => lines.push(format!("MATCH (n:{})", c.label())),
        None => {
            lines.push("MATCH (n)".to_string());
            conditions.push(format!(
                "(n:{} OR n:{})",
                Category::Satellite.label(),
                Category::Mission.label()
            ));
        }
    }

    if let Some(agency) = &filters.agency {
        lines.push(format!("MATCH (n)-[:{}]->(:Agency {{name: $agency}})", AGENCY_RELS));
        query = query.text("agency", agency.clone());
    }
    if let Some(vehicle) = &filters.vehicle {
        lines.push("MATCH (n)-[:LAUNCHED_BY]->(:LaunchVehicle {name: $vehicle})".to_string());
        query = query.text("vehicle", vehicle.clone());
    }
    if let Some(site) = &filters.site {
        lines.push("MATCH (n)-[:LAUNCHED_FROM]->(:Location {name: $site})".to_string());
        query = query.text("site", site.clone());
    }
    if let Some(year) = filters.year {
        let (from, until) = filters.year_bound.range(year);
        if let Some(from) = from {
            conditions.push(format!("{} >= $date_from", DATE_EXPR));
            query = query.text("date_from", from);
        }
        if let Some(until) = until {
            conditions.push(format!("{} < $date_until", DATE_EXPR));
            query = query.text("date_until", until);
        }
    }

    if !conditions.is_empty() {
        lines.push(format!("WHERE {}", conditions.join(" AND ")));
    }

    (lines.join("\n"), query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;

    const INTENTS: [Intent; 6] = [
        Intent::Count,
        Intent::List,
        Intent::Describe,
        Intent::Compare,
        Intent::TimeFiltered,
        Intent::Unknown,
    ];

    fn plan(text: &str) -> QueryPlan {
        match translate(&extract(text)) {
            Plan::Query(plan) => plan,
            Plan::Canned => panic!("expected a query plan for {:?}", text),
        }
    }

    #[test]
    fn test_template_table_is_total() {
        let categories = Category::ALL.into_iter().map(Some).chain(std::iter::once(None));
        for category in categories {
            for intent in INTENTS {
                let selected = select_template(intent, category);
                assert_eq!(selected.is_none(), intent == Intent::Unknown, "{:?}/{:?}", intent, category);
            }
        }
    }

    #[test]
    fn test_every_template_binds_well_formed() {
        let mention = EntityMention {
            raw_text_span: "x".into(),
            offset: 0,
            canonical_name: "X".into(),
            category: Category::Satellite,
        };
        let filters = Filters { year: Some(2020), ..Filters::default() };
        for category in Category::ALL.into_iter().map(Some).chain(std::iter::once(None)) {
            for intent in INTENTS {
                let Some(template) = select_template(intent, category) else { continue };
                let query = bind(template, &[&mention, &mention], &filters);
                assert!(query.cypher.starts_with("MATCH"), "{}", template);
                assert!(query.cypher.contains("RETURN"), "{}", template);
                for key in query.params.keys() {
                    assert!(query.cypher.contains(&format!("${}", key)), "{} missing ${}", template, key);
                }
            }
        }
    }

    #[test]
    fn test_unknown_is_canned() {
        assert_eq!(translate(&extract("asdkjasd")), Plan::Canned);
    }

    #[test]
    fn test_count_with_agency_and_year() {
        let plan = plan("How many satellites did ISRO launch in 2023?");
        assert_eq!(plan.query.template, TemplateId::Count(Category::Satellite));
        assert_eq!(plan.intent, Intent::Count);
        assert_eq!(plan.query.params["agency"], ParamValue::Text("ISRO".into()));
        assert_eq!(plan.query.params["date_from"], ParamValue::Text("2023-01-01".into()));
        assert_eq!(plan.query.params["date_until"], ParamValue::Text("2024-01-01".into()));
        assert!(plan.query.cypher.contains("$date_from"));
        assert_eq!(plan.filters.year, Some(2023));
        assert_eq!(plan.strength, BindingStrength::Entity);
    }

    #[test]
    fn test_user_text_never_interpolated() {
        let plan = plan("Tell me about Chandrayaan-3'}) DETACH DELETE n //");
        assert_eq!(plan.query.template, TemplateId::Describe(Category::Mission));
        assert!(!plan.query.cypher.contains("DELETE"));
        assert!(!plan.query.cypher.contains("Chandrayaan"));
        assert_eq!(plan.query.params["name"], ParamValue::Text("Chandrayaan-3".into()));
    }

    #[test]
    fn test_compare_binds_left_and_right() {
        let plan = plan("Compare PSLV and GSLV");
        assert_eq!(plan.query.template, TemplateId::Compare(Category::Vehicle));
        assert_eq!(plan.query.params["left"], ParamValue::Text("PSLV".into()));
        assert_eq!(plan.query.params["right"], ParamValue::Text("GSLV".into()));
        // Rows come back in the order the names were asked, not alphabetically.
        assert!(plan.query.cypher.contains("ORDER BY CASE WHEN toLower(name) = toLower($left) THEN 0 ELSE 1 END"));
        assert!(!plan.query.cypher.contains("ORDER BY name"));
    }

    #[test]
    fn test_compare_with_single_target_describes() {
        let plan = plan("Compare PSLV with other rockets");
        assert_eq!(plan.intent, Intent::Describe);
        assert_eq!(plan.query.template, TemplateId::Describe(Category::Vehicle));
    }

    #[test]
    fn test_no_entities_falls_back() {
        let overview = plan("How many things are there in total?");
        assert_eq!(overview.query.template, TemplateId::Overview);
        assert_eq!(overview.strength, BindingStrength::Fallback);

        let recent = plan("List everything");
        assert_eq!(recent.query.template, TemplateId::RecentLaunches);
    }

    #[test]
    fn test_listing_named_agency_lists_its_satellites() {
        let plan = plan("List ISRO launches");
        assert_eq!(plan.query.template, TemplateId::List(Category::Satellite));
        assert_eq!(plan.filters.agency.as_deref(), Some("ISRO"));
        assert!(plan.query.params.contains_key("limit"));
        // Several agency edges must not repeat the same satellite.
        assert!(plan.query.cypher.contains("RETURN DISTINCT n.name AS name"));
    }

    #[test]
    fn test_mixed_categories_leftmost_wins() {
        let plan = plan("Tell me about PSLV and ISRO");
        assert_eq!(plan.query.template, TemplateId::Describe(Category::Vehicle));
    }

    #[test]
    fn test_owner_subject_becomes_attribute_focus() {
        let plan = plan("Which agency built Cartosat-3?");
        assert_eq!(plan.query.template, TemplateId::Describe(Category::Satellite));
        assert_eq!(plan.focus, Some(Attribute::Agency));
    }

    #[test]
    fn test_describe_category_without_target_lists() {
        let plan = plan("Tell me about ISRO missions");
        assert_eq!(plan.query.template, TemplateId::List(Category::Mission));
        assert_eq!(plan.filters.agency.as_deref(), Some("ISRO"));
    }

    #[test]
    fn test_timeline_vehicle_filter() {
        let plan = plan("Timeline of satellites launched by PSLV since 2019");
        assert_eq!(plan.query.template, TemplateId::Timeline(Category::Satellite));
        assert_eq!(plan.filters.vehicle.as_deref(), Some("PSLV"));
        assert_eq!(plan.filters.year, Some(2019));
        assert!(plan.query.cypher.contains("ORDER BY date ASC"));
    }

    #[test]
    fn test_open_ended_year_ranges() {
        let since = plan("Satellites launched since 2019");
        assert_eq!(since.query.params["date_from"], ParamValue::Text("2019-01-01".into()));
        assert!(!since.query.params.contains_key("date_until"));
        assert!(!since.query.cypher.contains("$date_until"));

        let after = plan("Missions after 2015");
        assert_eq!(after.query.params["date_from"], ParamValue::Text("2016-01-01".into()));
        assert!(!after.query.params.contains_key("date_until"));

        let before = plan("ISRO satellites before 2000");
        assert_eq!(before.query.params["date_until"], ParamValue::Text("2000-01-01".into()));
        assert!(!before.query.params.contains_key("date_from"));
        assert!(!before.query.cypher.contains("$date_from"));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TemplateId::Count(Category::Vehicle).to_string(), "count:LaunchVehicle");
        assert_eq!(TemplateId::Overview.to_string(), "overview");
    }
}
