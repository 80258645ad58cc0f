// In-memory backend for unit tests, with scripted latency and failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::backend::AddressBackend;
use crate::error::CoreError;
use crate::model::{
    AdministrativeUnit, Coordinates, PlaceSuggestion, Tier, UnitCode, sort_by_name,
};

pub(crate) struct FakeBackend {
    provinces: Vec<AdministrativeUnit>,
    districts: HashMap<String, Vec<AdministrativeUnit>>,
    wards: HashMap<String, Vec<AdministrativeUnit>>,
    places: Vec<PlaceSuggestion>,
    search_latency: Duration,
    district_latency: Mutex<HashMap<String, Duration>>,
    ward_latency: Mutex<HashMap<String, Duration>>,
    fail_searches: AtomicBool,
    ignore_cancellation: AtomicBool,
    fail_tiers: AtomicBool,
    fail_geocode: AtomicBool,
    calls: Mutex<Calls>,
}

#[derive(Default, Clone)]
pub(crate) struct Calls {
    pub provinces: usize,
    pub districts: Vec<String>,
    pub wards: Vec<String>,
    pub searches: Vec<String>,
    pub geocodes: Vec<String>,
}

fn units(tier: Tier, items: &[(&str, &str)]) -> Vec<AdministrativeUnit> {
    let mut out: Vec<_> = items
        .iter()
        .map(|(code, name)| AdministrativeUnit::new(*code, *name, tier))
        .collect();
    sort_by_name(&mut out);
    out
}

fn place(id: &str, name: &str, label: &str) -> PlaceSuggestion {
    PlaceSuggestion {
        id: id.into(),
        name: name.into(),
        label: label.into(),
        region: None,
        address: None,
    }
}

impl FakeBackend {
    /// One English-labelled province ("City X") and one Vietnamese one.
    pub(crate) fn sample() -> Self {
        let provinces = units(
            Tier::Province,
            &[("1", "City X"), ("79", "Thành phố Hồ Chí Minh"), ("48", "Thành phố Đà Nẵng")],
        );

        let mut districts = HashMap::new();
        districts.insert(
            "1".to_owned(),
            units(Tier::District, &[("11", "District 1"), ("111", "District 11")]),
        );
        districts.insert(
            "79".to_owned(),
            units(
                Tier::District,
                &[
                    ("760", "Quận 1"),
                    ("772", "Quận 11"),
                    ("765", "Quận Bình Thạnh"),
                    ("769", "Thành phố Thủ Đức"),
                ],
            ),
        );
        districts.insert("48".to_owned(), Vec::new());

        let mut wards = HashMap::new();
        wards.insert(
            "111".to_owned(),
            units(Tier::Ward, &[("1115", "Ward 15"), ("1116", "Ward 16")]),
        );
        wards.insert("11".to_owned(), units(Tier::Ward, &[("110", "Ward 1")]));
        wards.insert(
            "772".to_owned(),
            units(
                Tier::Ward,
                &[("27205", "Phường 5"), ("27208", "Phường 15"), ("27211", "Phường 16")],
            ),
        );
        wards.insert(
            "760".to_owned(),
            units(Tier::Ward, &[("26734", "Phường Bến Nghé")]),
        );
        wards.insert("765".to_owned(), units(Tier::Ward, &[("26905", "Phường 25")]));
        wards.insert(
            "769".to_owned(),
            units(Tier::Ward, &[("26800", "Phường Thảo Điền")]),
        );

        let places = vec![
            place(
                "p1",
                "Coffee Shop",
                "Coffee Shop 184 Main St, 184 Main Street, Ward 15, District 11, City X",
            ),
            place(
                "p2",
                "184 Lê Đại Hành",
                "184 Lê Đại Hành, Phường 15, Quận 11, Thành phố Hồ Chí Minh",
            ),
            place("p3", "Quận 1", "Quận 1, Thành phố Hồ Chí Minh"),
        ];

        Self {
            provinces,
            districts,
            wards,
            places,
            search_latency: Duration::ZERO,
            district_latency: Mutex::new(HashMap::new()),
            ward_latency: Mutex::new(HashMap::new()),
            fail_searches: AtomicBool::new(false),
            ignore_cancellation: AtomicBool::new(false),
            fail_tiers: AtomicBool::new(false),
            fail_geocode: AtomicBool::new(false),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub(crate) fn with_search_latency(mut self, latency: Duration) -> Self {
        self.search_latency = latency;
        self
    }

    pub(crate) fn with_district_latency(self, province: &str, latency: Duration) -> Self {
        self.district_latency
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(province.to_owned(), latency);
        self
    }

    pub(crate) fn with_ward_latency(self, district: &str, latency: Duration) -> Self {
        self.ward_latency
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(district.to_owned(), latency);
        self
    }

    pub(crate) fn fail_searches(&self, fail: bool) {
        self.fail_searches.store(fail, Ordering::SeqCst);
    }

    /// Let searches run to completion even after their token is cancelled.
    pub(crate) fn ignore_cancellation(&self, ignore: bool) {
        self.ignore_cancellation.store(ignore, Ordering::SeqCst);
    }

    pub(crate) fn fail_tiers(&self, fail: bool) {
        self.fail_tiers.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_geocode(&self, fail: bool) {
        self.fail_geocode.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> Calls {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn search_calls(&self) -> Vec<String> {
        self.calls().searches
    }

    fn record(&self, f: impl FnOnce(&mut Calls)) {
        f(&mut self.calls.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn tier_failure(&self) -> Result<(), CoreError> {
        if self.fail_tiers.load(Ordering::SeqCst) {
            return Err(CoreError::Api {
                message: "division service unavailable".into(),
                status: Some(503),
            });
        }
        Ok(())
    }
}

impl AddressBackend for FakeBackend {
    async fn provinces(&self) -> Result<Vec<AdministrativeUnit>, CoreError> {
        self.record(|c| c.provinces += 1);
        self.tier_failure()?;
        Ok(self.provinces.clone())
    }

    async fn districts(&self, province: &UnitCode) -> Result<Vec<AdministrativeUnit>, CoreError> {
        self.record(|c| c.districts.push(province.to_string()));
        let latency = self
            .district_latency
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(province.as_str())
            .copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.tier_failure()?;
        self.districts
            .get(province.as_str())
            .cloned()
            .ok_or_else(|| CoreError::Api {
                message: "Not Found".into(),
                status: Some(404),
            })
    }

    async fn wards(&self, district: &UnitCode) -> Result<Vec<AdministrativeUnit>, CoreError> {
        self.record(|c| c.wards.push(district.to_string()));
        let latency = self
            .ward_latency
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(district.as_str())
            .copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.tier_failure()?;
        self.wards
            .get(district.as_str())
            .cloned()
            .ok_or_else(|| CoreError::Api {
                message: "Not Found".into(),
                status: Some(404),
            })
    }

    async fn search_places(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<PlaceSuggestion>, CoreError> {
        self.record(|c| c.searches.push(query.to_owned()));
        if self.ignore_cancellation.load(Ordering::SeqCst) {
            tokio::time::sleep(self.search_latency).await;
        } else {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(CoreError::Cancelled),
                () = tokio::time::sleep(self.search_latency) => {}
            }
        }
        if self.fail_searches.load(Ordering::SeqCst) {
            return Err(CoreError::Api {
                message: "places proxy unavailable".into(),
                status: Some(502),
            });
        }
        let needle = query.to_lowercase();
        Ok(self
            .places
            .iter()
            .filter(|p| p.label.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates, CoreError> {
        self.record(|c| c.geocodes.push(address.to_owned()));
        if self.fail_geocode.load(Ordering::SeqCst) {
            return Err(CoreError::Api {
                message: "Address not found".into(),
                status: Some(422),
            });
        }
        Ok(Coordinates {
            lat: 10.7626,
            lng: 106.6502,
        })
    }
}
