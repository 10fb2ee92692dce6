use std::sync::Arc;

use crate::clients::{Extractor, Generator, ResumeStore};
use crate::config::Config;
use crate::wizard::registry::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Collaborators are trait objects so tests can swap in-process fakes for
/// the real HTTP clients.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    pub extractor: Arc<dyn Extractor>,
    pub generator: Arc<dyn Generator>,
    pub store: Arc<dyn ResumeStore>,
    /// Runtime settings; read at startup, kept here for handlers that grow
    /// per-request needs.
    #[allow(dead_code)]
    pub config: Config,
}
