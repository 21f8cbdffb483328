//! Boundary to the graph database.
//!
//! The pipeline only sees [`GraphStore`]; the Neo4j implementation lives in
//! `vaani-graph`, tests use in-memory fakes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::error::{VaaniError, VaaniResult};
use crate::translate::BoundQuery;

/// One result row: column name to value.
pub type Row = BTreeMap<String, serde_json::Value>;

/// Failures reported by a store implementation.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Transient: connection refused, session dropped, pool exhausted.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the query itself. Not retried.
    #[error("query rejected: {0}")]
    Query(String),
}

/// A read-only graph store.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute a bound query and return its rows in order (empty on no match).
    async fn run(&self, query: &BoundQuery) -> Result<Vec<Row>, StoreError>;

    /// Drop and re-establish the underlying connection.
    async fn reconnect(&self) -> Result<(), StoreError>;

    /// Cheap liveness check for status endpoints.
    async fn ping(&self) -> bool;
}

/// Run a query, reconnecting and retrying once on a transient failure.
pub async fn execute_with_retry(store: &dyn GraphStore, query: &BoundQuery) -> VaaniResult<Vec<Row>> {
    match store.run(query).await {
        Ok(rows) => Ok(rows),
        Err(StoreError::Unavailable(first)) => {
            warn!(template = %query.template, error = %first, "Graph store unavailable, reconnecting once");
            if let Err(e) = store.reconnect().await {
                warn!(error = %e, "Reconnect failed, retrying on the existing session");
            }
            store.run(query).await.map_err(|second| {
                warn!(template = %query.template, error = %second, "Graph store still unavailable after retry");
                VaaniError::from(second)
            })
        }
        Err(err) => {
            warn!(template = %query.template, error = %err, "Graph query rejected");
            Err(err.into())
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory store shared by the crate's tests.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    pub struct ScriptedStore {
        script: Mutex<VecDeque<Result<Vec<Row>, StoreError>>>,
        fallback: Vec<Row>,
        pub runs: AtomicUsize,
        pub reconnects: AtomicUsize,
        pub seen: Mutex<Vec<BoundQuery>>,
    }

    impl ScriptedStore {
        /// Always answers with `rows`.
        pub fn returning(rows: Vec<Row>) -> Self {
            Self::scripted(Vec::new(), rows)
        }

        /// Pops scripted results first, then falls back to `fallback`.
        pub fn scripted(script: Vec<Result<Vec<Row>, StoreError>>, fallback: Vec<Row>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback,
                runs: AtomicUsize::new(0),
                reconnects: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn run_count(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }

        pub fn last_query(&self) -> Option<BoundQuery> {
            self.seen.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl GraphStore for ScriptedStore {
        async fn run(&self, query: &BoundQuery) -> Result<Vec<Row>, StoreError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(query.clone());
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(self.fallback.clone()))
        }

        async fn reconnect(&self) -> Result<(), StoreError> {
            self.reconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    pub fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::testing::{row, ScriptedStore};
    use super::*;
    use crate::model::Category;
    use crate::translate::{BoundQuery, TemplateId};

    fn count_query() -> BoundQuery {
        BoundQuery::new(TemplateId::Count(Category::Satellite), "MATCH (n:Satellite) RETURN count(n) AS count")
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let store = ScriptedStore::returning(vec![row(&[("count", json!(3))])]);
        let rows = execute_with_retry(&store, &count_query()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.run_count(), 1);
        assert_eq!(store.reconnects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unavailable_then_success() {
        let store = ScriptedStore::scripted(
            vec![Err(StoreError::Unavailable("connection reset".into()))],
            vec![row(&[("count", json!(12))])],
        );
        let rows = execute_with_retry(&store, &count_query()).await.unwrap();
        assert_eq!(rows[0]["count"], json!(12));
        assert_eq!(store.run_count(), 2);
        assert_eq!(store.reconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_twice_surfaces() {
        let store = ScriptedStore::scripted(
            vec![
                Err(StoreError::Unavailable("down".into())),
                Err(StoreError::Unavailable("still down".into())),
            ],
            Vec::new(),
        );
        let err = execute_with_retry(&store, &count_query()).await.unwrap_err();
        assert!(matches!(err, VaaniError::StoreUnavailable(_)));
        assert_eq!(store.run_count(), 2);
    }

    #[tokio::test]
    async fn test_query_error_not_retried() {
        let store = ScriptedStore::scripted(vec![Err(StoreError::Query("bad cypher".into()))], Vec::new());
        let err = execute_with_retry(&store, &count_query()).await.unwrap_err();
        assert!(matches!(err, VaaniError::Query(_)));
        assert_eq!(store.run_count(), 1);
    }
}
