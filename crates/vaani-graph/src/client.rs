//! Neo4j connection client.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use vaani_core::translate::ParamValue;
use vaani_core::{BoundQuery, Category, GraphStore, Row, StoreError};

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub db: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            db: "neo4j".to_string(),
            max_connections: 16,
            fetch_size: 50,
        }
    }
}

/// Client for the space knowledge graph.
///
/// The pool sits behind a lock so [`GraphStore::reconnect`] can swap it out
/// while other requests keep using their clone of the old one.
pub struct GraphClient {
    config: GraphConfig,
    graph: RwLock<Graph>,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds a lazy pool, so a `RETURN 1` ping forces a
    /// real handshake and callers get a fast failure when Neo4j is down.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let graph = open(config).await?;
        info!(uri = %config.uri, db = %config.db, "Connected to Neo4j");
        Ok(Self { config: config.clone(), graph: RwLock::new(graph) })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    async fn graph(&self) -> Graph {
        self.graph.read().await.clone()
    }

    /// Execute a Cypher statement that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph().await.run(query).await.context("Neo4j query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return raw rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph().await.execute(query).await.context("Neo4j query failed")?;
        drain(&mut result).await.context("Neo4j row stream failed")
    }

    /// Node count for every category label, zero for labels with no nodes.
    pub async fn label_counts(&self) -> Result<Vec<(Category, i64)>> {
        let labels: Vec<String> = Category::ALL.iter().map(|c| c.label().to_string()).collect();
        let query = Query::new(
            "MATCH (n)
             WHERE any(l IN labels(n) WHERE l IN $labels)
             RETURN labels(n)[0] AS label, count(n) AS count"
                .to_string(),
        )
        .param("labels", labels);

        let mut counts: BTreeMap<Category, i64> = Category::ALL.iter().map(|c| (*c, 0)).collect();
        for row in self.query(query).await? {
            let label: String = row.get("label").unwrap_or_default();
            if let Some(category) = Category::from_label(&label) {
                *counts.entry(category).or_default() += row.get::<i64>("count").unwrap_or_default();
            }
        }
        Ok(Category::ALL.iter().map(|c| (*c, counts[c])).collect())
    }
}

/// A result stream read one row at a time.
#[async_trait]
trait RowCursor {
    type Row: Send;
    type Error: Send;

    async fn next_row(&mut self) -> Result<Option<Self::Row>, Self::Error>;
}

#[async_trait]
impl RowCursor for neo4rs::DetachedRowStream {
    type Row = neo4rs::Row;
    type Error = neo4rs::Error;

    async fn next_row(&mut self) -> Result<Option<neo4rs::Row>, neo4rs::Error> {
        self.next().await
    }
}

/// Read a cursor to the end. An error partway through fails the whole read
/// instead of returning the rows seen so far.
async fn drain<C: RowCursor + Send>(cursor: &mut C) -> Result<Vec<C::Row>, C::Error> {
    let mut rows = Vec::new();
    while let Some(row) = cursor.next_row().await? {
        rows.push(row);
    }
    Ok(rows)
}

async fn open(config: &GraphConfig) -> Result<Graph> {
    let neo4j_config = ConfigBuilder::default()
        .uri(&config.uri)
        .user(&config.user)
        .password(&config.password)
        .db(config.db.as_str())
        .max_connections(config.max_connections)
        .fetch_size(config.fetch_size)
        .build()
        .context("Failed to build Neo4j config")?;

    let graph = Graph::connect(neo4j_config)
        .await
        .context("Failed to create Neo4j connection pool")?;

    graph
        .run(Query::new("RETURN 1".to_string()))
        .await
        .context("Neo4j is not responding to queries")?;

    Ok(graph)
}

/// Turn a bound template into a neo4rs query. Values only ever travel as
/// parameters.
pub fn to_neo4j_query(bound: &BoundQuery) -> Query {
    bound.params.iter().fold(Query::new(bound.cypher.clone()), |query, (key, value)| match value {
        ParamValue::Text(s) => query.param(key, s.clone()),
        ParamValue::Int(i) => query.param(key, *i),
        ParamValue::TextList(list) => query.param(key, list.clone()),
    })
}

/// Decode the declared columns of a row. Types are tried from most to least
/// specific; anything else (nulls, temporal values) becomes `null`.
fn decode_row(row: &neo4rs::Row, columns: &[&str]) -> Row {
    columns
        .iter()
        .map(|column| {
            let value = if let Ok(i) = row.get::<i64>(column) {
                serde_json::Value::from(i)
            } else if let Ok(f) = row.get::<f64>(column) {
                serde_json::Value::from(f)
            } else if let Ok(b) = row.get::<bool>(column) {
                serde_json::Value::from(b)
            } else if let Ok(s) = row.get::<String>(column) {
                serde_json::Value::from(s)
            } else if let Ok(list) = row.get::<Vec<String>>(column) {
                serde_json::Value::from(list)
            } else {
                serde_json::Value::Null
            };
            (column.to_string(), value)
        })
        .collect()
}

/// Server-side rejections of the statement itself are not worth retrying.
pub fn classify(err: &neo4rs::Error) -> StoreError {
    classify_detail(err.to_string())
}

fn classify_detail(detail: String) -> StoreError {
    if detail.contains("Neo.ClientError") || detail.contains("SyntaxError") {
        StoreError::Query(detail)
    } else {
        StoreError::Unavailable(detail)
    }
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn run(&self, query: &BoundQuery) -> Result<Vec<Row>, StoreError> {
        let graph = self.graph().await;
        let mut stream = graph.execute(to_neo4j_query(query)).await.map_err(|e| classify(&e))?;

        let columns = query.columns();
        let rows = drain(&mut stream).await.map_err(|e| classify(&e))?;
        Ok(rows.iter().map(|row| decode_row(row, columns)).collect())
    }

    async fn reconnect(&self) -> Result<(), StoreError> {
        let fresh = open(&self.config)
            .await
            .map_err(|e| StoreError::Unavailable(format!("{:#}", e)))?;
        *self.graph.write().await = fresh;
        info!(uri = %self.config.uri, "Reconnected to Neo4j");
        Ok(())
    }

    async fn ping(&self) -> bool {
        match self.graph().await.run(Query::new("RETURN 1".to_string())).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Neo4j ping failed");
                false
            }
        }
    }
}
