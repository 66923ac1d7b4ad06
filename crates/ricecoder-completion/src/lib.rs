//! RiceCoder Completion Broker
//!
//! Brokers code completion for composite buffers: one root document built from
//! several virtual documents, each analyzed on its own. A request is expressed
//! in editor coordinates, routed to the backends that can answer for the
//! document owning the token, and answered with a single reply whose
//! replacement range is valid in the editor.
//!
//! # Architecture
//!
//! 1. **Trigger Layer**: [`TriggerPolicy`] suppresses completion inside strings
//!    and comments and decides whether a typed character auto-invokes it
//! 2. **Request Layer**: [`RequestBuilder`] maps the token and cursor through
//!    `ricecoder-vdoc` into the owning virtual document
//! 3. **Dispatch Layer**: [`CompletionFetcher`] asks the analysis backend and,
//!    when its language matches, the runtime session, concurrently
//! 4. **Merge Layer**: [`ResultMerger`] reconciles the two replies over the
//!    analysis reply's range
//! 5. **Fallback Layer**: [`ContextConnector`] and [`CombinedConnector`] answer
//!    when the analysis backend cannot
//!
//! # Example
//!
//! ```ignore
//! use ricecoder_completion::*;
//! use std::sync::Arc;
//!
//! let connections = Arc::new(SharedConnections::new());
//! connections.connect("notebook.ipynb", Arc::new(my_language_server));
//!
//! let broker = CompletionBroker::new(CompletionFetcher::new(connections, Some(kernel)));
//! let outcome = broker
//!     .complete(&mapper, &registry, &editor_request, TriggerKind::Invoked)
//!     .await?;
//! ```

pub mod backend;
pub mod broker;
pub mod config;
pub mod connectors;
pub mod error;
pub mod fetcher;
pub mod hint;
pub mod merger;
pub mod request;
pub mod trigger;
pub mod types;

// Re-export public types and traits
pub use backend::{AnalysisBackend, ConnectionLookup, ReplyConnector, RuntimeBackend, SharedConnections};
pub use broker::CompletionBroker;
pub use config::{CompletionConfig, ConfigFormat, ConfigLoader};
pub use connectors::{CombinedConnector, ContextConnector};
pub use error::{CompletionError, CompletionResult};
pub use fetcher::CompletionFetcher;
pub use hint::{hint, reply_from_items};
pub use merger::ResultMerger;
pub use request::{typed_character, RequestBuilder};
pub use trigger::TriggerPolicy;
pub use types::*;
