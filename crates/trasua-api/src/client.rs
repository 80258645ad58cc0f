// Address lookup HTTP client
//
// Wraps `reqwest::Client` with URL construction against two bases: the
// administrative-division service (provinces, districts, wards) and the
// places proxy (autocomplete, geocode). Endpoint methods return decoded
// wire models; mapping into domain types happens in `trasua-core`.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    ApiMessage, AutocompleteResponse, DistrictDetail, GeocodeResponse, ProvinceDetail, RawUnit,
};
use crate::transport::TransportConfig;

/// Async client for the division lookup and places endpoints.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
#[derive(Debug, Clone)]
pub struct AddressClient {
    http: reqwest::Client,
    divisions_url: Url,
    places_url: Url,
}

impl AddressClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from the two base URLs and a transport config.
    pub fn new(
        divisions_url: &str,
        places_url: &str,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(divisions_url, places_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        divisions_url: &str,
        places_url: &str,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            divisions_url: normalize_base_url(divisions_url)?,
            places_url: normalize_base_url(places_url)?,
        })
    }

    /// Base URL of the division lookup service.
    pub fn divisions_url(&self) -> &Url {
        &self.divisions_url
    }

    /// Base URL of the places proxy.
    pub fn places_url(&self) -> &Url {
        &self.places_url
    }

    // ── Administrative divisions ─────────────────────────────────────

    /// `GET /provinces?depth=1`
    pub async fn list_provinces(&self) -> Result<Vec<RawUnit>, Error> {
        let url = endpoint(&self.divisions_url, &["provinces"])?;
        self.get(url, &[("depth", "1")]).await
    }

    /// `GET /provinces/{code}?depth=2` -- the province with its districts.
    pub async fn get_province(&self, code: &str) -> Result<ProvinceDetail, Error> {
        let url = endpoint(&self.divisions_url, &["provinces", code])?;
        self.get(url, &[("depth", "2")]).await
    }

    /// `GET /districts/{code}?depth=2` -- the district with its wards.
    pub async fn get_district(&self, code: &str) -> Result<DistrictDetail, Error> {
        let url = endpoint(&self.divisions_url, &["districts", code])?;
        self.get(url, &[("depth", "2")]).await
    }

    // ── Places ───────────────────────────────────────────────────────

    /// `GET /autocomplete-place?text={text}`
    ///
    /// The request races `cancel`; once the token fires the in-flight
    /// request is dropped and `Error::Cancelled` is returned.
    pub async fn autocomplete_place(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<AutocompleteResponse, Error> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let url = endpoint(&self.places_url, &["autocomplete-place"])?;
        let params = [("text", text)];
        let request = self.get::<AutocompleteResponse>(url, &params);

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                trace!(text, "autocomplete request cancelled");
                Err(Error::Cancelled)
            }
            result = request => result,
        }
    }

    /// `GET /geocode?address={address}`
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResponse, Error> {
        let url = endpoint(&self.places_url, &["geocode"])?;
        self.get(url, &[("address", address)]).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url, params: &[(&str, &str)]) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        handle_response(resp).await
    }
}

// ── URL builders ─────────────────────────────────────────────────────

/// Parse a base URL and make sure its path ends with `/`.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidBaseUrl { url: raw.to_owned() });
    }
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

/// Append percent-encoded path segments to a normalized base URL.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::InvalidBaseUrl {
            url: base.to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|m| m.message)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.chars().take(200).collect()
                }
            });
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}
