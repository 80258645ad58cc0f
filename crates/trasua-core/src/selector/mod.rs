//! Province → district → ward cascade with debounced geocoding.
//!
//! [`AddressSelector`] keeps a [`SelectionState`] in a `watch` channel.
//! Every tier fetch is tagged with a per-tier generation at dispatch; a
//! response is applied only if no newer request for that tier was issued
//! meanwhile. Failures are recorded in [`SelectionState::error`]; the
//! previous selection stays in place but the failed tier's list is emptied.

mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::backend::AddressBackend;
use crate::config::PipelineConfig;
use crate::error::CoreError;
use crate::model::{AdministrativeUnit, Coordinates, PlaceSuggestion, Tier, UnitCode};
use crate::resolve::{LocaleRules, MatchStrategy, ParsedLabel, decompose_label, match_unit};

pub use state::{SelectionStage, SelectionState};

// ── Request generations ──────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Fetch {
    Provinces,
    Districts,
    Wards,
    Geocode,
}

#[derive(Default)]
struct Generations {
    provinces: AtomicU64,
    districts: AtomicU64,
    wards: AtomicU64,
    geocode: AtomicU64,
}

impl Generations {
    fn counter(&self, fetch: Fetch) -> &AtomicU64 {
        match fetch {
            Fetch::Provinces => &self.provinces,
            Fetch::Districts => &self.districts,
            Fetch::Wards => &self.wards,
            Fetch::Geocode => &self.geocode,
        }
    }

    fn next(&self, fetch: Fetch) -> u64 {
        self.counter(fetch).fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, fetch: Fetch, generation: u64) -> bool {
        self.counter(fetch).load(Ordering::SeqCst) == generation
    }
}

/// Increments `pending` for its lifetime, so the spinner clears on every exit path.
struct LoadingGuard<'a>(&'a watch::Sender<SelectionState>);

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<SelectionState>) -> Self {
        state.send_modify(|s| s.pending += 1);
        Self(state)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|s| s.pending = s.pending.saturating_sub(1));
    }
}

// ── Decomposition report ─────────────────────────────────────────

/// Outcome of resolving a chosen suggestion into the cascade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompositionReport {
    /// At least the province resolved.
    pub success: bool,
    pub parsed: ParsedLabel,
    pub province: Option<AdministrativeUnit>,
    pub district: Option<AdministrativeUnit>,
    pub ward: Option<AdministrativeUnit>,
    pub street: String,
    /// Why resolution stopped early, if it did.
    pub stopped: Option<String>,
    /// Always the raw suggestion label, for free-text display.
    pub display_label: String,
}

// ── Selector ─────────────────────────────────────────────────────

/// Four-tier address selection driving dependent dropdowns.
pub struct AddressSelector<B: AddressBackend> {
    inner: Arc<Inner<B>>,
    geocode_task: Mutex<Option<JoinHandle<()>>>,
}

struct Inner<B> {
    backend: Arc<B>,
    rules: LocaleRules,
    country: String,
    geocode_debounce: Duration,
    state: watch::Sender<SelectionState>,
    generations: Generations,
}

impl<B: AddressBackend> AddressSelector<B> {
    pub fn new(backend: Arc<B>, config: &PipelineConfig) -> Self {
        Self::with_rules(backend, config, LocaleRules::for_locale(config.locale))
    }

    /// Use a custom label rule table instead of the configured locale's.
    pub fn with_rules(backend: Arc<B>, config: &PipelineConfig, rules: LocaleRules) -> Self {
        let (state, _) = watch::channel(SelectionState::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                rules,
                country: config.country_suffix.clone(),
                geocode_debounce: config.geocode_debounce,
                state,
                generations: Generations::default(),
            }),
            geocode_task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SelectionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.inner.state.subscribe()
    }

    pub fn rules(&self) -> &LocaleRules {
        &self.inner.rules
    }

    /// The geocoder query for the current selection, country suffix included.
    pub fn full_address(&self) -> Option<String> {
        self.inner.state.borrow().full_address(&self.inner.country)
    }

    /// Fetch the province list.
    pub async fn load_provinces(&self) -> Result<(), CoreError> {
        self.inner.load_provinces().await
    }

    /// Choose a province and load its districts. An empty code resets the form.
    pub async fn select_province(&self, code: impl Into<UnitCode>) -> Result<(), CoreError> {
        self.cancel_geocode();
        self.inner.select_province(code.into()).await
    }

    /// Choose a district of the selected province and load its wards.
    /// An empty code clears the district and everything below it.
    pub async fn select_district(&self, code: impl Into<UnitCode>) -> Result<(), CoreError> {
        self.cancel_geocode();
        self.inner.select_district(code.into()).await
    }

    /// Choose a ward from the loaded list. No network call.
    pub fn select_ward(&self, code: impl Into<UnitCode>) -> Result<(), CoreError> {
        self.cancel_geocode();
        self.inner.select_ward(&code.into())
    }

    pub fn set_street(&self, street: &str) {
        self.inner.state.send_if_modified(|s| {
            if s.street == street {
                return false;
            }
            street.clone_into(&mut s.street);
            true
        });
    }

    /// Geocode the assembled address right away.
    pub async fn geocode_now(&self) -> Result<Coordinates, CoreError> {
        self.cancel_geocode();
        self.inner.geocode().await
    }

    /// Geocode once the address has stopped changing for the debounce window.
    ///
    /// Each call restarts the window. Must be called inside a Tokio runtime.
    pub fn schedule_geocode(&self) {
        let inner = Arc::clone(&self.inner);
        let delay = inner.geocode_debounce;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match inner.geocode().await {
                Err(e) if !e.is_cancelled() => warn!(error = %e, "debounced geocode failed"),
                _ => {}
            }
        });
        if let Some(previous) = self.lock_task().replace(task) {
            previous.abort();
        }
    }

    /// Decompose a suggestion's label and drive the cascade to match it.
    ///
    /// Supersedes every tier request in flight. Resolution stops at the
    /// first tier that cannot be matched; shallower tiers stay selected.
    pub async fn resolve_suggestion(&self, suggestion: &PlaceSuggestion) -> DecompositionReport {
        self.cancel_geocode();
        self.inner.resolve(suggestion).await
    }

    /// Back to an empty form, keeping the loaded province list.
    pub fn reset(&self) {
        self.cancel_geocode();
        self.inner.supersede_all();
        self.inner.state.send_modify(|s| {
            s.clear_from(Tier::Province);
            s.error = None;
        });
    }

    fn cancel_geocode(&self) {
        if let Some(task) = self.lock_task().take() {
            task.abort();
        }
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.geocode_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B: AddressBackend> Drop for AddressSelector<B> {
    fn drop(&mut self) {
        self.cancel_geocode();
    }
}

impl<B: AddressBackend> Inner<B> {
    fn supersede_all(&self) -> [u64; 4] {
        [
            self.generations.next(Fetch::Provinces),
            self.generations.next(Fetch::Districts),
            self.generations.next(Fetch::Wards),
            self.generations.next(Fetch::Geocode),
        ]
    }

    fn record_error(&self, fetch: Fetch, generation: u64, err: &CoreError) {
        if err.is_cancelled() || !self.generations.is_current(fetch, generation) {
            return;
        }
        warn!(error = %err, "address selector request failed");
        let message = err.to_string();
        self.state.send_modify(|s| s.error = Some(message));
    }

    async fn load_provinces(&self) -> Result<(), CoreError> {
        let generation = self.generations.next(Fetch::Provinces);
        let _loading = LoadingGuard::new(&self.state);

        match self.backend.provinces().await {
            Ok(provinces) => {
                if !self.generations.is_current(Fetch::Provinces, generation) {
                    trace!("dropping superseded province list");
                    return Err(CoreError::Cancelled);
                }
                debug!(count = provinces.len(), "provinces loaded");
                self.state.send_modify(|s| {
                    s.provinces = provinces;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                let err = CoreError::fetch("provinces", e);
                self.record_error(Fetch::Provinces, generation, &err);
                Err(err)
            }
        }
    }

    async fn ensure_provinces(&self) -> Result<(), CoreError> {
        let loaded = !self.state.borrow().provinces.is_empty();
        if !loaded {
            self.load_provinces().await?;
        }
        Ok(())
    }

    async fn select_province(&self, code: UnitCode) -> Result<(), CoreError> {
        let generation = self.generations.next(Fetch::Districts);
        self.generations.next(Fetch::Wards);
        self.generations.next(Fetch::Geocode);

        if code.is_empty() {
            self.state.send_modify(|s| {
                s.clear_from(Tier::Province);
                s.error = None;
            });
            return Ok(());
        }

        self.ensure_provinces().await?;
        let Some(province) = self.lookup(Tier::Province, &code) else {
            let err = CoreError::UnknownCode {
                tier: Tier::Province,
                code: code.to_string(),
            };
            self.record_error(Fetch::Districts, generation, &err);
            return Err(err);
        };

        let districts = {
            let _loading = LoadingGuard::new(&self.state);
            self.backend.districts(&code).await
        };
        match districts {
            Ok(districts) => {
                if !self.generations.is_current(Fetch::Districts, generation) {
                    trace!(province = %code, "dropping superseded district list");
                    return Err(CoreError::Cancelled);
                }
                debug!(province = %province.name, count = districts.len(), "province selected");
                // A district chosen from the previous list must not land under this province.
                self.generations.next(Fetch::Wards);
                self.state.send_modify(|s| {
                    s.clear_from(Tier::Province);
                    s.selected_province = Some(province);
                    s.districts = districts;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                let err = CoreError::fetch("districts", e);
                if self.generations.is_current(Fetch::Districts, generation) {
                    self.state.send_modify(|s| s.districts.clear());
                }
                self.record_error(Fetch::Districts, generation, &err);
                Err(err)
            }
        }
    }

    async fn select_district(&self, code: UnitCode) -> Result<(), CoreError> {
        let generation = self.generations.next(Fetch::Wards);
        self.generations.next(Fetch::Geocode);

        if code.is_empty() {
            self.state.send_modify(|s| {
                s.clear_from(Tier::District);
                s.error = None;
            });
            return Ok(());
        }

        let Some(district) = self.lookup(Tier::District, &code) else {
            let err = CoreError::UnknownCode {
                tier: Tier::District,
                code: code.to_string(),
            };
            self.record_error(Fetch::Wards, generation, &err);
            return Err(err);
        };

        let wards = {
            let _loading = LoadingGuard::new(&self.state);
            self.backend.wards(&code).await
        };
        match wards {
            Ok(wards) => {
                if !self.generations.is_current(Fetch::Wards, generation) {
                    trace!(district = %code, "dropping superseded ward list");
                    return Err(CoreError::Cancelled);
                }
                debug!(district = %district.name, count = wards.len(), "district selected");
                self.state.send_modify(|s| {
                    s.clear_from(Tier::District);
                    s.selected_district = Some(district);
                    s.wards = wards;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                let err = CoreError::fetch("wards", e);
                if self.generations.is_current(Fetch::Wards, generation) {
                    self.state.send_modify(|s| s.wards.clear());
                }
                self.record_error(Fetch::Wards, generation, &err);
                Err(err)
            }
        }
    }

    fn select_ward(&self, code: &UnitCode) -> Result<(), CoreError> {
        let generation = self.generations.next(Fetch::Geocode);

        if code.is_empty() {
            self.state.send_modify(|s| s.clear_from(Tier::Ward));
            return Ok(());
        }

        let Some(ward) = self.lookup(Tier::Ward, code) else {
            let err = CoreError::UnknownCode {
                tier: Tier::Ward,
                code: code.to_string(),
            };
            self.record_error(Fetch::Geocode, generation, &err);
            return Err(err);
        };
        self.state.send_modify(|s| {
            s.clear_from(Tier::Ward);
            s.selected_ward = Some(ward);
            s.error = None;
        });
        Ok(())
    }

    fn lookup(&self, tier: Tier, code: &UnitCode) -> Option<AdministrativeUnit> {
        self.state
            .borrow()
            .units(tier)
            .iter()
            .find(|u| &u.code == code)
            .cloned()
    }

    async fn geocode(&self) -> Result<Coordinates, CoreError> {
        let generation = self.generations.next(Fetch::Geocode);
        let address = self.state.borrow().full_address(&self.country);
        let Some(address) = address else {
            let err = CoreError::ValidationEmpty {
                message: "Choose a province, district, ward or street before locating the address"
                    .into(),
            };
            self.record_error(Fetch::Geocode, generation, &err);
            return Err(err);
        };

        debug!(%address, "geocoding");
        let result = {
            let _loading = LoadingGuard::new(&self.state);
            self.backend.geocode(&address).await
        };
        match result {
            Ok(coordinates) => {
                if !self.generations.is_current(Fetch::Geocode, generation) {
                    trace!(%address, "dropping superseded coordinates");
                    return Err(CoreError::Cancelled);
                }
                self.state.send_modify(|s| {
                    s.coordinates = Some(coordinates);
                    s.error = None;
                });
                Ok(coordinates)
            }
            Err(e) => {
                let err = CoreError::fetch("coordinates", e);
                if self.generations.is_current(Fetch::Geocode, generation) {
                    self.state.send_modify(|s| s.coordinates = None);
                }
                self.record_error(Fetch::Geocode, generation, &err);
                Err(err)
            }
        }
    }

    async fn resolve(&self, suggestion: &PlaceSuggestion) -> DecompositionReport {
        let parsed = decompose_label(&suggestion.label, &self.rules);
        let street = parsed
            .street
            .clone()
            .or_else(|| suggestion.address.clone())
            .unwrap_or_default();

        let mut report = DecompositionReport {
            success: false,
            parsed,
            province: None,
            district: None,
            ward: None,
            street: street.clone(),
            stopped: None,
            display_label: suggestion.label.clone(),
        };

        if let Err(e) = self.ensure_provinces().await {
            report.stopped = Some(e.to_string());
            return report;
        }

        let [_, districts_gen, wards_gen, _] = self.supersede_all();
        self.state.send_modify(|s| {
            s.clear_from(Tier::Province);
            s.street.clone_from(&street);
            s.error = None;
        });

        if let Err(stop) = self.resolve_tiers(&mut report, districts_gen, wards_gen).await {
            debug!(label = %suggestion.label, reason = %stop, "label resolved partially");
            report.stopped = Some(stop.to_string());
        }
        report.success = report.province.is_some();
        report
    }

    async fn resolve_tiers(
        &self,
        report: &mut DecompositionReport,
        districts_gen: u64,
        wards_gen: u64,
    ) -> Result<(), CoreError> {
        let province = self.match_fragment(&report.parsed, Tier::Province, MatchStrategy::Loose)?;
        let districts = {
            let _loading = LoadingGuard::new(&self.state);
            self.backend.districts(&province.code).await
        }
        .map_err(|e| CoreError::fetch("districts", e))
        .inspect_err(|err| self.record_error(Fetch::Districts, districts_gen, err))?;
        if !self.generations.is_current(Fetch::Districts, districts_gen) {
            return Err(CoreError::Cancelled);
        }
        self.state.send_modify(|s| {
            s.selected_province = Some(province.clone());
            s.districts = districts;
        });
        report.province = Some(province);

        let district =
            self.match_fragment(&report.parsed, Tier::District, MatchStrategy::Numbered)?;
        let wards = {
            let _loading = LoadingGuard::new(&self.state);
            self.backend.wards(&district.code).await
        }
        .map_err(|e| CoreError::fetch("wards", e))
        .inspect_err(|err| self.record_error(Fetch::Wards, wards_gen, err))?;
        if !self.generations.is_current(Fetch::Wards, wards_gen) {
            return Err(CoreError::Cancelled);
        }
        self.state.send_modify(|s| {
            s.selected_district = Some(district.clone());
            s.wards = wards;
        });
        report.district = Some(district);

        let ward = self.match_fragment(&report.parsed, Tier::Ward, MatchStrategy::Numbered)?;
        self.state
            .send_modify(|s| s.selected_ward = Some(ward.clone()));
        report.ward = Some(ward);
        Ok(())
    }

    fn match_fragment(
        &self,
        parsed: &ParsedLabel,
        tier: Tier,
        strategy: MatchStrategy,
    ) -> Result<AdministrativeUnit, CoreError> {
        let fragment = match tier {
            Tier::Province => parsed.province.as_deref(),
            Tier::District => parsed.district.as_deref(),
            Tier::Ward => parsed.ward.as_deref(),
        }
        .unwrap_or_default();

        let state = self.state.borrow();
        match_unit(fragment, state.units(tier), strategy, &self.rules)
            .cloned()
            .ok_or_else(|| CoreError::NoMatch {
                tier,
                fragment: fragment.to_owned(),
            })
    }
}
