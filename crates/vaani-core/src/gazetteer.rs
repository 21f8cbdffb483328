//! Static vocabularies: known entity names, category nouns, attribute words.
//!
//! Canonical names must match the `name` property of the corresponding node
//! in the graph.

use std::sync::LazyLock;

use crate::model::{Attribute, Category};
use crate::tokens::phrase_words;

/// A known object and the ways users refer to it.
#[derive(Debug)]
pub struct GazetteerEntry {
    pub canonical: &'static str,
    pub category: Category,
    pub aliases: &'static [&'static str],
}

pub const ENTITIES: &[GazetteerEntry] = &[
    // Agencies
    GazetteerEntry { canonical: "ISRO", category: Category::Agency, aliases: &["Indian Space Research Organisation", "Indian Space Research Organization"] },
    GazetteerEntry { canonical: "NASA", category: Category::Agency, aliases: &["National Aeronautics and Space Administration"] },
    GazetteerEntry { canonical: "ESA", category: Category::Agency, aliases: &["European Space Agency"] },
    GazetteerEntry { canonical: "CNSA", category: Category::Agency, aliases: &["China National Space Administration"] },
    GazetteerEntry { canonical: "JAXA", category: Category::Agency, aliases: &["Japan Aerospace Exploration Agency"] },
    GazetteerEntry { canonical: "Roscosmos", category: Category::Agency, aliases: &[] },
    GazetteerEntry { canonical: "SpaceX", category: Category::Agency, aliases: &["Space X"] },
    // Missions
    GazetteerEntry { canonical: "Chandrayaan-1", category: Category::Mission, aliases: &["Chandrayaan 1", "Chandrayaan-I"] },
    GazetteerEntry { canonical: "Chandrayaan-2", category: Category::Mission, aliases: &["Chandrayaan 2", "Chandrayaan-II"] },
    GazetteerEntry { canonical: "Chandrayaan-3", category: Category::Mission, aliases: &["Chandrayaan 3", "Chandrayaan-III"] },
    GazetteerEntry { canonical: "Mars Orbiter Mission", category: Category::Mission, aliases: &["Mangalyaan"] },
    GazetteerEntry { canonical: "Gaganyaan", category: Category::Mission, aliases: &["Gaganyaan-1"] },
    GazetteerEntry { canonical: "Aditya-L1", category: Category::Mission, aliases: &["Aditya L1", "Aditya"] },
    GazetteerEntry { canonical: "Artemis II", category: Category::Mission, aliases: &["Artemis 2", "Artemis-II"] },
    GazetteerEntry { canonical: "Europa Clipper", category: Category::Mission, aliases: &[] },
    GazetteerEntry { canonical: "Chang'e 6", category: Category::Mission, aliases: &["Chang'e-6"] },
    GazetteerEntry { canonical: "Apollo 11", category: Category::Mission, aliases: &["Apollo-11"] },
    // Satellites
    GazetteerEntry { canonical: "Cartosat-3", category: Category::Satellite, aliases: &["Cartosat 3"] },
    GazetteerEntry { canonical: "RISAT-2B", category: Category::Satellite, aliases: &["RISAT 2B"] },
    GazetteerEntry { canonical: "GSAT-24", category: Category::Satellite, aliases: &["GSAT 24"] },
    GazetteerEntry { canonical: "EOS-06", category: Category::Satellite, aliases: &["EOS 06", "Oceansat-3"] },
    GazetteerEntry { canonical: "NavIC", category: Category::Satellite, aliases: &["IRNSS", "Navigation with Indian Constellation"] },
    GazetteerEntry { canonical: "AstroSat", category: Category::Satellite, aliases: &[] },
    GazetteerEntry { canonical: "Hubble Space Telescope", category: Category::Satellite, aliases: &["Hubble", "HST"] },
    GazetteerEntry { canonical: "James Webb Space Telescope", category: Category::Satellite, aliases: &["James Webb", "JWST", "Webb telescope"] },
    GazetteerEntry { canonical: "International Space Station", category: Category::Satellite, aliases: &["ISS", "space station"] },
    GazetteerEntry { canonical: "NOAA-21", category: Category::Satellite, aliases: &["NOAA 21"] },
    // Launch vehicles
    GazetteerEntry { canonical: "PSLV", category: Category::Vehicle, aliases: &["Polar Satellite Launch Vehicle"] },
    GazetteerEntry { canonical: "GSLV", category: Category::Vehicle, aliases: &["Geosynchronous Satellite Launch Vehicle", "GSLV Mk II"] },
    GazetteerEntry { canonical: "LVM3", category: Category::Vehicle, aliases: &["LVM 3", "GSLV Mk III", "GSLV Mk3", "GSLV Mark III"] },
    GazetteerEntry { canonical: "SSLV", category: Category::Vehicle, aliases: &["Small Satellite Launch Vehicle"] },
    GazetteerEntry { canonical: "Falcon 9", category: Category::Vehicle, aliases: &["Falcon-9"] },
    GazetteerEntry { canonical: "Space Launch System", category: Category::Vehicle, aliases: &["SLS"] },
    GazetteerEntry { canonical: "Ariane 5", category: Category::Vehicle, aliases: &["Ariane-5"] },
    GazetteerEntry { canonical: "Soyuz", category: Category::Vehicle, aliases: &[] },
    // People
    GazetteerEntry { canonical: "Vikram Sarabhai", category: Category::Person, aliases: &[] },
    GazetteerEntry { canonical: "A. P. J. Abdul Kalam", category: Category::Person, aliases: &["Abdul Kalam", "APJ Abdul Kalam", "Kalam"] },
    GazetteerEntry { canonical: "S. Somanath", category: Category::Person, aliases: &["Somanath"] },
    GazetteerEntry { canonical: "K. Sivan", category: Category::Person, aliases: &["Sivan"] },
    GazetteerEntry { canonical: "Kalpana Chawla", category: Category::Person, aliases: &[] },
    GazetteerEntry { canonical: "Rakesh Sharma", category: Category::Person, aliases: &[] },
    // Locations
    GazetteerEntry { canonical: "Satish Dhawan Space Centre", category: Category::Location, aliases: &["SHAR", "Sriharikota", "Satish Dhawan Space Center"] },
    GazetteerEntry { canonical: "Vikram Sarabhai Space Centre", category: Category::Location, aliases: &["VSSC", "Vikram Sarabhai Space Center"] },
    GazetteerEntry { canonical: "Kennedy Space Center", category: Category::Location, aliases: &["Cape Canaveral", "KSC"] },
    GazetteerEntry { canonical: "Baikonur Cosmodrome", category: Category::Location, aliases: &["Baikonur"] },
];

/// Nouns naming a whole category ("how many *satellites*").
pub const CATEGORY_NOUNS: &[(&str, Category)] = &[
    ("satellite", Category::Satellite),
    ("satellites", Category::Satellite),
    ("spacecraft", Category::Satellite),
    ("mission", Category::Mission),
    ("missions", Category::Mission),
    ("agency", Category::Agency),
    ("agencies", Category::Agency),
    ("space agency", Category::Agency),
    ("space agencies", Category::Agency),
    ("organisation", Category::Agency),
    ("organisations", Category::Agency),
    ("organization", Category::Agency),
    ("organizations", Category::Agency),
    ("rocket", Category::Vehicle),
    ("rockets", Category::Vehicle),
    ("launcher", Category::Vehicle),
    ("launchers", Category::Vehicle),
    ("launch vehicle", Category::Vehicle),
    ("launch vehicles", Category::Vehicle),
    ("vehicle", Category::Vehicle),
    ("vehicles", Category::Vehicle),
    ("scientist", Category::Person),
    ("scientists", Category::Person),
    ("astronaut", Category::Person),
    ("astronauts", Category::Person),
    ("people", Category::Person),
    ("person", Category::Person),
    ("launch site", Category::Location),
    ("launch sites", Category::Location),
    ("spaceport", Category::Location),
    ("spaceports", Category::Location),
    ("launch pad", Category::Location),
    ("launch pads", Category::Location),
    ("space centre", Category::Location),
    ("space centres", Category::Location),
    ("space center", Category::Location),
    ("space centers", Category::Location),
];

/// Words that point to a single property of the subject.
pub const ATTRIBUTE_WORDS: &[(&str, Attribute)] = &[
    ("launch date", Attribute::LaunchDate),
    ("launched", Attribute::LaunchDate),
    ("when", Attribute::LaunchDate),
    ("first flight", Attribute::LaunchDate),
    ("status", Attribute::Status),
    ("operational", Attribute::Status),
    ("still active", Attribute::Status),
    ("objective", Attribute::Objective),
    ("objectives", Attribute::Objective),
    ("goal", Attribute::Objective),
    ("purpose", Attribute::Objective),
    ("built", Attribute::Agency),
    ("operates", Attribute::Agency),
    ("operated", Attribute::Agency),
    ("budget", Attribute::Budget),
    ("payload", Attribute::Payload),
    ("capacity", Attribute::Payload),
    ("from where", Attribute::Site),
    ("launch site", Attribute::Site),
];

/// Words that refer back to the previous turn's subject.
pub const PRONOUNS: &[&str] = &[
    "it", "its", "they", "them", "their", "this", "that", "he", "she", "his", "her",
];

/// A gazetteer alias prepared for token matching.
#[derive(Debug)]
pub struct CompiledAlias {
    pub words: Vec<String>,
    pub entry: &'static GazetteerEntry,
}

/// Every canonical name and alias, longest first so that "GSLV Mk III"
/// wins over "GSLV" and "Vikram Sarabhai Space Centre" over "Vikram Sarabhai".
pub static ALIASES: LazyLock<Vec<CompiledAlias>> = LazyLock::new(|| {
    let mut aliases: Vec<CompiledAlias> = ENTITIES
        .iter()
        .flat_map(|entry| {
            std::iter::once(entry.canonical)
                .chain(entry.aliases.iter().copied())
                .map(move |alias| CompiledAlias { words: phrase_words(alias), entry })
        })
        .filter(|alias| !alias.words.is_empty())
        .collect();
    aliases.sort_by(|a, b| {
        b.words
            .len()
            .cmp(&a.words.len())
            .then_with(|| b.words.concat().len().cmp(&a.words.concat().len()))
    });
    aliases
});

/// Category nouns, longest first.
pub static CATEGORY_PHRASES: LazyLock<Vec<(Vec<String>, Category)>> = LazyLock::new(|| {
    let mut phrases: Vec<(Vec<String>, Category)> = CATEGORY_NOUNS
        .iter()
        .map(|(noun, category)| (phrase_words(noun), *category))
        .collect();
    phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    phrases
});

/// Look up a gazetteer entry by canonical name (case-insensitive).
pub fn find_canonical(name: &str) -> Option<&'static GazetteerEntry> {
    ENTITIES.iter().find(|e| e.canonical.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_unique() {
        let mut names: Vec<String> = ENTITIES.iter().map(|e| e.canonical.to_lowercase()).collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn test_aliases_sorted_longest_first() {
        let lengths: Vec<usize> = ALIASES.iter().map(|a| a.words.len()).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_find_canonical() {
        let entry = find_canonical("chandrayaan-3").expect("known mission");
        assert_eq!(entry.category, Category::Mission);
        assert!(find_canonical("Voyager 1").is_none());
    }
}
