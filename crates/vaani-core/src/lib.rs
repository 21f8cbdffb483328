//! # Vaani Core
//!
//! Question understanding and answer shaping for the Vaani space assistant.
//!
//! A request flows through the [`extract`] stage (entities, year, intent),
//! the [`translate`] stage (template selection and parameter binding), a
//! [`store::GraphStore`] implementation, and finally the [`format`] stage.
//! [`assistant::Assistant`] wires the stages together for the surfaces.

pub mod assistant;
pub mod conversation;
pub mod error;
pub mod extract;
pub mod format;
pub mod gazetteer;
pub mod model;
pub mod result;
pub mod smalltalk;
pub mod store;
pub mod tokens;
pub mod translate;

pub use assistant::{Assistant, MAX_INPUT_CHARS};
pub use conversation::{ConversationConfig, ConversationContext, ConversationStore};
pub use error::{VaaniError, VaaniResult};
pub use extract::{extract, Extraction};
pub use format::{format_response, render, Response, Surface};
pub use model::{Attribute, Category, EntityMention, Intent, YearBound};
pub use result::QueryResult;
pub use store::{GraphStore, Row, StoreError};
pub use translate::{translate, BoundQuery, Plan, TemplateId};
