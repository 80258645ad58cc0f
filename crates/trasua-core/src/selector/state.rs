// ── Selection snapshot ──

use serde::Serialize;

use crate::model::{AdministrativeUnit, Coordinates, Tier};

/// How far down the hierarchy the selection reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelectionStage {
    NoProvince,
    ProvinceSelected,
    DistrictSelected,
    WardSelected,
}

/// Everything the address form renders, published on every change.
///
/// Selecting a unit clears every field below it, including the street and
/// the coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    pub provinces: Vec<AdministrativeUnit>,
    pub districts: Vec<AdministrativeUnit>,
    pub wards: Vec<AdministrativeUnit>,
    pub selected_province: Option<AdministrativeUnit>,
    pub selected_district: Option<AdministrativeUnit>,
    pub selected_ward: Option<AdministrativeUnit>,
    pub street: String,
    pub coordinates: Option<Coordinates>,
    /// Requests in flight; the form shows a spinner while non-zero.
    pub pending: usize,
    /// Last user-facing failure, cleared by the next success.
    pub error: Option<String>,
}

impl SelectionState {
    pub fn loading(&self) -> bool {
        self.pending > 0
    }

    pub fn stage(&self) -> SelectionStage {
        if self.selected_ward.is_some() {
            SelectionStage::WardSelected
        } else if self.selected_district.is_some() {
            SelectionStage::DistrictSelected
        } else if self.selected_province.is_some() {
            SelectionStage::ProvinceSelected
        } else {
            SelectionStage::NoProvince
        }
    }

    /// Loaded units of `tier`.
    pub fn units(&self, tier: Tier) -> &[AdministrativeUnit] {
        match tier {
            Tier::Province => &self.provinces,
            Tier::District => &self.districts,
            Tier::Ward => &self.wards,
        }
    }

    /// The address sent to the geocoder: street, ward, district, province, `country`.
    ///
    /// `None` when nothing but the country would be left.
    pub fn full_address(&self, country: &str) -> Option<String> {
        let mut parts: Vec<&str> = [
            Some(self.street.trim()),
            self.selected_ward.as_ref().map(|u| u.name.as_str()),
            self.selected_district.as_ref().map(|u| u.name.as_str()),
            self.selected_province.as_ref().map(|u| u.name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect();

        if parts.is_empty() {
            return None;
        }
        let country = country.trim();
        if !country.is_empty() {
            parts.push(country);
        }
        Some(parts.join(", "))
    }

    /// Drop the selection at `tier` and everything beneath it.
    pub(crate) fn clear_from(&mut self, tier: Tier) {
        match tier {
            Tier::Province => {
                self.selected_province = None;
                self.districts.clear();
                self.selected_district = None;
                self.wards.clear();
                self.selected_ward = None;
            }
            Tier::District => {
                self.selected_district = None;
                self.wards.clear();
                self.selected_ward = None;
            }
            Tier::Ward => self.selected_ward = None,
        }
        self.street.clear();
        self.coordinates = None;
    }
}
