//! Core domain types shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};

/// Kind of space-domain object a mention refers to.
///
/// Each category maps to exactly one node label in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Satellite,
    Mission,
    Agency,
    Vehicle,
    Person,
    Location,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Category::Satellite,
        Category::Mission,
        Category::Agency,
        Category::Vehicle,
        Category::Person,
        Category::Location,
    ];

    /// The Neo4j node label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Satellite => "Satellite",
            Category::Mission => "Mission",
            Category::Agency => "Agency",
            Category::Vehicle => "LaunchVehicle",
            Category::Person => "Person",
            Category::Location => "Location",
        }
    }

    /// Parse a node label back into a category.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Parse from a URL path segment or CLI argument (case-insensitive, singular or plural).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "satellite" | "satellites" => Some(Self::Satellite),
            "mission" | "missions" => Some(Self::Mission),
            "agency" | "agencies" => Some(Self::Agency),
            "vehicle" | "vehicles" | "launchvehicle" | "launch_vehicle" | "rockets" => Some(Self::Vehicle),
            "person" | "people" | "persons" => Some(Self::Person),
            "location" | "locations" | "sites" => Some(Self::Location),
            _ => None,
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Category::Satellite => "satellite",
            Category::Mission => "mission",
            Category::Agency => "space agency",
            Category::Vehicle => "launch vehicle",
            Category::Person => "person",
            Category::Location => "launch site",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Category::Satellite => "satellites",
            Category::Mission => "missions",
            Category::Agency => "space agencies",
            Category::Vehicle => "launch vehicles",
            Category::Person => "people",
            Category::Location => "launch sites",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Satellite => "🛰️",
            Category::Mission => "🌙",
            Category::Agency => "🏢",
            Category::Vehicle => "🚀",
            Category::Person => "👨‍🚀",
            Category::Location => "📍",
        }
    }
}

/// A recognized reference to a known object inside the user's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    /// The text exactly as the user wrote it.
    pub raw_text_span: String,
    /// Byte offset of the span in the input.
    pub offset: usize,
    /// Name of the node in the graph.
    pub canonical_name: String,
    pub category: Category,
}

/// Classified purpose of a question. Exactly one per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Count,
    List,
    Describe,
    Compare,
    TimeFiltered,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Count => "count",
            Intent::List => "list",
            Intent::Describe => "describe",
            Intent::Compare => "compare",
            Intent::TimeFiltered => "time_filtered",
            Intent::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a year in the question limits the dates matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearBound {
    /// Within the year.
    #[default]
    In,
    /// From the start of the year on.
    Since,
    /// From the start of the following year on.
    After,
    /// Up to the start of the year.
    Before,
}

impl YearBound {
    pub fn as_str(&self) -> &'static str {
        match self {
            YearBound::In => "in",
            YearBound::Since => "since",
            YearBound::After => "after",
            YearBound::Before => "before",
        }
    }

    /// Half-open `[from, until)` date range as ISO dates; `None` is unbounded.
    pub fn range(&self, year: i32) -> (Option<String>, Option<String>) {
        let start = |y: i32| format!("{:04}-01-01", y);
        match self {
            YearBound::In => (Some(start(year)), Some(start(year + 1))),
            YearBound::Since => (Some(start(year)), None),
            YearBound::After => (Some(start(year + 1)), None),
            YearBound::Before => (None, Some(start(year))),
        }
    }
}

/// A single property the user asked about, e.g. "when was it launched?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    LaunchDate,
    Status,
    Objective,
    Agency,
    Vehicle,
    Budget,
    Payload,
    Site,
}
