// ── Wire → domain conversion ──
//
// Maps `trasua_api` response models into canonical domain types. Unit
// lists leave here already sorted by display name.

use trasua_api::{DistrictDetail, GeocodeResponse, ProvinceDetail, RawSuggestion, RawUnit};

use crate::model::{AdministrativeUnit, Coordinates, PlaceSuggestion, Tier, sort_by_name};

/// Convert a raw unit list into sorted domain units of `tier`.
pub(crate) fn units(raw: Vec<RawUnit>, tier: Tier) -> Vec<AdministrativeUnit> {
    let mut units: Vec<AdministrativeUnit> = raw
        .into_iter()
        .map(|u| AdministrativeUnit::new(u.code, u.name, tier))
        .collect();
    sort_by_name(&mut units);
    units
}

/// Districts of a province, sorted.
pub(crate) fn province_districts(detail: ProvinceDetail) -> Vec<AdministrativeUnit> {
    units(detail.districts, Tier::District)
}

/// Wards of a district, sorted.
pub(crate) fn district_wards(detail: DistrictDetail) -> Vec<AdministrativeUnit> {
    units(detail.wards, Tier::Ward)
}

impl From<RawSuggestion> for PlaceSuggestion {
    fn from(raw: RawSuggestion) -> Self {
        // Hits without an id are keyed by label so selection still works.
        let id = raw
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| raw.label.clone());
        Self {
            id,
            name: raw.name,
            label: raw.label,
            region: raw.region.filter(|r| !r.is_empty()),
            address: raw.address.filter(|a| !a.is_empty()),
        }
    }
}

impl From<GeocodeResponse> for Coordinates {
    fn from(raw: GeocodeResponse) -> Self {
        Self {
            lat: raw.lat,
            lng: raw.lng,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn raw(code: &str, name: &str) -> RawUnit {
        RawUnit {
            code: code.into(),
            name: name.into(),
        }
    }

    #[test]
    fn unit_lists_are_sorted_and_tagged() {
        let out = units(
            vec![raw("79", "Thành phố Hồ Chí Minh"), raw("1", "Thành phố Hà Nội")],
            Tier::Province,
        );
        assert_eq!(out[0].name, "Thành phố Hà Nội");
        assert_eq!(out[0].code.as_str(), "1");
        assert!(out.iter().all(|u| u.tier == Tier::Province));
    }

    #[test]
    fn district_detail_children_become_wards() {
        let detail = DistrictDetail {
            code: "772".into(),
            name: "Quận 11".into(),
            wards: vec![raw("27211", "Phường 16"), raw("27208", "Phường 15")],
        };
        let wards = district_wards(detail);
        assert_eq!(wards[0].name, "Phường 15");
        assert_eq!(wards[0].tier, Tier::Ward);
    }

    #[test]
    fn suggestion_without_id_falls_back_to_label() {
        let s = PlaceSuggestion::from(RawSuggestion {
            id: None,
            name: "Shop".into(),
            label: "Shop, City X".into(),
            region: Some(String::new()),
            address: None,
        });
        assert_eq!(s.id, "Shop, City X");
        assert_eq!(s.region, None);
    }
}
