// ── Address pipeline facade ──
//
// One search field plus one cascading selector over a shared backend,
// the way a checkout form wires them together.

use std::sync::Arc;

use tracing::info;

use crate::backend::AddressBackend;
use crate::config::PipelineConfig;
use crate::error::CoreError;
use crate::model::PlaceSuggestion;
use crate::search::AutocompleteController;
use crate::selector::{AddressSelector, DecompositionReport};

pub struct AddressPipeline<B: AddressBackend> {
    config: PipelineConfig,
    search: AutocompleteController<B>,
    selector: AddressSelector<B>,
}

impl<B: AddressBackend> AddressPipeline<B> {
    pub fn new(backend: B, config: PipelineConfig) -> Self {
        Self::from_shared(Arc::new(backend), config)
    }

    pub fn from_shared(backend: Arc<B>, config: PipelineConfig) -> Self {
        Self {
            search: AutocompleteController::new(Arc::clone(&backend), &config),
            selector: AddressSelector::new(backend, &config),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn search(&self) -> &AutocompleteController<B> {
        &self.search
    }

    pub fn selector(&self) -> &AddressSelector<B> {
        &self.selector
    }

    /// Take the dropdown entry `id` and resolve it into the selector.
    pub async fn choose(&self, id: &str) -> Result<DecompositionReport, CoreError> {
        let suggestion = self
            .search
            .select(id)
            .ok_or_else(|| CoreError::UnknownSuggestion { id: id.to_owned() })?;
        Ok(self.resolve(&suggestion).await)
    }

    /// Resolve a suggestion obtained elsewhere (e.g. from `search().search()`).
    pub async fn resolve(&self, suggestion: &PlaceSuggestion) -> DecompositionReport {
        let report = self.selector.resolve_suggestion(suggestion).await;
        info!(
            label = %report.display_label,
            success = report.success,
            "suggestion resolved"
        );
        report
    }

    /// Release timers, in-flight requests and the suggestion cache.
    pub fn shutdown(&self) {
        self.search.shutdown();
        self.selector.reset();
    }
}
