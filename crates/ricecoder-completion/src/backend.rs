//! Backend capability traits and the connection table
//!
//! Two kinds of backend answer completion requests:
//!
//! - [`AnalysisBackend`]: a language-analysis connection working on one virtual
//!   document. It receives the normalized [`CompletionRequest`] data and returns
//!   raw [`CompletionItem`]s.
//! - [`ReplyConnector`]: anything that answers an editor-level request with a
//!   finished [`CompletionReply`]. Runtime sessions ([`RuntimeBackend`]) and the
//!   fallback connectors are reply connectors.
//!
//! Analysis connections are owned by the document-management layer, which
//! publishes them through a [`ConnectionLookup`].
//!
//! [`CompletionRequest`]: crate::types::CompletionRequest

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use ricecoder_vdoc::VirtualPosition;

use crate::error::CompletionResult;
use crate::types::{CompletionItem, CompletionReply, EditorRequest, TriggerKind, VirtualToken};

/// Language-analysis connection for one virtual document
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Backend name, used in logs and errors
    fn name(&self) -> &str;

    /// Request completion items at a position of the virtual document
    async fn completion(
        &self,
        cursor: VirtualPosition,
        token: &VirtualToken,
        typed_character: Option<char>,
        trigger_kind: TriggerKind,
    ) -> CompletionResult<Vec<CompletionItem>>;

    /// Trigger characters the connection declared, if any
    fn trigger_characters(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Answers editor-level requests with finished replies
#[async_trait]
pub trait ReplyConnector: Send + Sync {
    /// Connector name, used in logs and errors
    fn name(&self) -> &str;

    /// Fetch a reply for an editor-level request
    async fn fetch(&self, request: &EditorRequest) -> CompletionResult<CompletionReply>;
}

/// Live execution session able to complete against program state
pub trait RuntimeBackend: ReplyConnector {
    /// Language the session executes
    fn language(&self) -> &str;
}

/// Read access to analysis connections keyed by document id path
pub trait ConnectionLookup: Send + Sync {
    /// Analysis connection of a document, if one is open
    fn analysis_for(&self, id_path: &str) -> Option<Arc<dyn AnalysisBackend>>;
}

impl ConnectionLookup for HashMap<String, Arc<dyn AnalysisBackend>> {
    fn analysis_for(&self, id_path: &str) -> Option<Arc<dyn AnalysisBackend>> {
        self.get(id_path).cloned()
    }
}

/// Connection table shared with the document-management layer
///
/// The owner connects and disconnects documents while completion reads.
#[derive(Default)]
pub struct SharedConnections {
    connections: RwLock<HashMap<String, Arc<dyn AnalysisBackend>>>,
}

impl SharedConnections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or replace) the connection of a document
    pub fn connect(&self, id_path: impl Into<String>, backend: Arc<dyn AnalysisBackend>) {
        let mut connections = match self.connections.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        connections.insert(id_path.into(), backend);
    }

    /// Drop the connection of a document
    pub fn disconnect(&self, id_path: &str) -> Option<Arc<dyn AnalysisBackend>> {
        let mut connections = match self.connections.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        connections.remove(id_path)
    }

    /// Id paths with an open connection
    pub fn documents(&self) -> Vec<String> {
        let connections = match self.connections.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut documents: Vec<String> = connections.keys().cloned().collect();
        documents.sort();
        documents
    }
}

impl ConnectionLookup for SharedConnections {
    fn analysis_for(&self, id_path: &str) -> Option<Arc<dyn AnalysisBackend>> {
        let connections = match self.connections.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        connections.get(id_path).cloned()
    }
}
