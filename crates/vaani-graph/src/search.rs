//! Full-text name search over the `space_name_search` index.

use anyhow::Result;
use neo4rs::Query;
use serde::Serialize;

use vaani_core::Category;

use crate::schema::NAME_INDEX;
use crate::GraphClient;

/// A node whose name matched a search.
#[derive(Debug, Clone, Serialize)]
pub struct NameMatch {
    pub name: String,
    pub category: Option<Category>,
    pub score: f64,
}

/// Escape Lucene query syntax so user text is searched literally.
pub fn escape_lucene(text: &str) -> String {
    const SPECIAL: &[char] = &[
        '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/',
    ];
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if SPECIAL.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Search node names, best matches first.
pub async fn search_names(client: &GraphClient, text: &str, limit: usize) -> Result<Vec<NameMatch>> {
    let query = Query::new(
        "CALL db.index.fulltext.queryNodes($index, $query)
         YIELD node, score
         RETURN node.name AS name, labels(node)[0] AS label, score
         LIMIT $limit"
            .to_string(),
    )
    .param("index", NAME_INDEX)
    .param("query", escape_lucene(text))
    .param("limit", limit as i64);

    let rows = client.query(query).await?;
    Ok(rows
        .into_iter()
        .map(|row| NameMatch {
            name: row.get("name").unwrap_or_default(),
            category: Category::from_label(&row.get::<String>("label").unwrap_or_default()),
            score: row.get("score").unwrap_or_default(),
        })
        .filter(|m| !m.name.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_lucene() {
        assert_eq!(escape_lucene("Chandrayaan-3"), "Chandrayaan\\-3");
        assert_eq!(escape_lucene("GSLV Mk III"), "GSLV Mk III");
        assert_eq!(escape_lucene("a:b*"), "a\\:b\\*");
    }
}
