// ── Backend seam ──
//
// The pipeline talks to the outside world through `AddressBackend`.
// `trasua_api::AddressClient` is the production implementation; tests
// plug in in-memory fakes with scripted latency.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use trasua_api::AddressClient;

use crate::convert;
use crate::error::CoreError;
use crate::model::{AdministrativeUnit, Coordinates, PlaceSuggestion, Tier, UnitCode};

/// Remote collaborators of the address pipeline.
///
/// Unit lists are returned sorted by display name. `search_places` must
/// honor `cancel` and report a fired token as `CoreError::Cancelled`.
pub trait AddressBackend: Send + Sync + 'static {
    /// All provinces.
    fn provinces(&self) -> impl Future<Output = Result<Vec<AdministrativeUnit>, CoreError>> + Send;

    /// Districts of one province.
    fn districts(
        &self,
        province: &UnitCode,
    ) -> impl Future<Output = Result<Vec<AdministrativeUnit>, CoreError>> + Send;

    /// Wards of one district.
    fn wards(
        &self,
        district: &UnitCode,
    ) -> impl Future<Output = Result<Vec<AdministrativeUnit>, CoreError>> + Send;

    /// Free-text place search.
    fn search_places(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<PlaceSuggestion>, CoreError>> + Send;

    /// Forward geocode of an assembled address string.
    fn geocode(&self, address: &str) -> impl Future<Output = Result<Coordinates, CoreError>> + Send;
}

/// Translate a client error, logging outages louder than rejected requests.
fn upstream(err: trasua_api::Error) -> CoreError {
    if err.is_transient() {
        warn!(error = %err, "address service unavailable");
    } else if !err.is_cancelled() {
        debug!(error = %err, "address request failed");
    }
    err.into()
}

impl AddressBackend for AddressClient {
    async fn provinces(&self) -> Result<Vec<AdministrativeUnit>, CoreError> {
        let raw = self.list_provinces().await.map_err(upstream)?;
        debug!(count = raw.len(), "loaded provinces");
        Ok(convert::units(raw, Tier::Province))
    }

    async fn districts(&self, province: &UnitCode) -> Result<Vec<AdministrativeUnit>, CoreError> {
        let detail = self.get_province(province.as_str()).await.map_err(upstream)?;
        debug!(province = %province, count = detail.districts.len(), "loaded districts");
        Ok(convert::province_districts(detail))
    }

    async fn wards(&self, district: &UnitCode) -> Result<Vec<AdministrativeUnit>, CoreError> {
        let detail = self.get_district(district.as_str()).await.map_err(upstream)?;
        debug!(district = %district, count = detail.wards.len(), "loaded wards");
        Ok(convert::district_wards(detail))
    }

    async fn search_places(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<PlaceSuggestion>, CoreError> {
        let resp = self
            .autocomplete_place(query, cancel)
            .await
            .map_err(upstream)?;
        Ok(resp
            .suggestions
            .into_iter()
            .map(PlaceSuggestion::from)
            .collect())
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates, CoreError> {
        let raw = AddressClient::geocode(self, address)
            .await
            .map_err(upstream)?;
        Ok(raw.into())
    }
}
