//! Neo4j schema initialization (constraints and indexes).

use anyhow::Result;
use neo4rs::Query;
use tracing::info;

use vaani_core::Category;

use crate::GraphClient;

/// Name of the full-text index over node names.
pub const NAME_INDEX: &str = "space_name_search";

/// Cypher statements for schema initialization: one name-uniqueness
/// constraint per category label, then the full-text name index.
pub fn schema_statements() -> Vec<String> {
    let mut statements: Vec<String> = Category::ALL
        .iter()
        .map(|c| {
            format!(
                "CREATE CONSTRAINT {}_name IF NOT EXISTS FOR (n:{}) REQUIRE n.name IS UNIQUE",
                c.label().to_lowercase(),
                c.label()
            )
        })
        .collect();

    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    statements.push(format!(
        "CREATE FULLTEXT INDEX {} IF NOT EXISTS FOR (n:{}) ON EACH [n.name, n.full_name]",
        NAME_INDEX,
        labels.join("|")
    ));
    statements
}

/// Initialize Neo4j schema with constraints and indexes.
///
/// Safe to run multiple times - uses IF NOT EXISTS clauses.
pub async fn initialize_schema(client: &GraphClient) -> Result<usize> {
    info!("Initializing Neo4j schema...");

    let statements = schema_statements();
    for statement in &statements {
        client.execute(Query::new(statement.clone())).await?;
    }

    info!(statements = statements.len(), "Neo4j schema initialized");
    Ok(statements.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_per_label() {
        let statements = schema_statements();
        assert_eq!(statements.len(), Category::ALL.len() + 1);
        assert!(statements.iter().all(|s| s.contains("IF NOT EXISTS")));
        assert!(statements
            .iter()
            .any(|s| s.contains("FOR (n:LaunchVehicle) REQUIRE n.name IS UNIQUE")));
    }

    #[test]
    fn test_fulltext_index_covers_all_labels() {
        let statements = schema_statements();
        let index = statements.last().unwrap();
        assert!(index.starts_with("CREATE FULLTEXT INDEX space_name_search"));
        assert!(index.contains("Satellite|Mission|Agency|LaunchVehicle|Person|Location"));
    }
}
