// ── Label decomposition ──
//
// The place search returns a single denormalized label such as
// "Coffee Shop 184 Main St, 184 Main Street, Ward 15, District 11, City X".
// Each comma-separated fragment is tagged with the slot it names.

use serde::Serialize;

use super::rules::{LocaleRules, Slot};

/// A label fragment together with the slot it ended up filling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedFragment {
    pub text: String,
    pub slot: Option<Slot>,
}

/// Per-slot text recovered from a suggestion label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedLabel {
    pub province: Option<String>,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub street: Option<String>,
    pub fragments: Vec<ClassifiedFragment>,
}

impl ParsedLabel {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Province => self.province.as_deref(),
            Slot::District => self.district.as_deref(),
            Slot::Ward => self.ward.as_deref(),
            Slot::Street => self.street.as_deref(),
        }
    }

    /// True when no fragment could be classified at all.
    pub fn is_empty(&self) -> bool {
        self.province.is_none()
            && self.district.is_none()
            && self.ward.is_none()
            && self.street.is_none()
    }
}

#[derive(Default)]
struct Picks {
    provinces: Vec<usize>,
    district: Option<usize>,
    ward: Option<usize>,
    street: Option<usize>,
}

/// Split `label` into fragments and assign each to a slot using `rules`.
///
/// Keyword rules run over every fragment first. Street candidates are
/// replaced only by strictly longer ones; an unclassified fragment that
/// starts with a digit becomes the street when nothing else has. Fallback
/// patterns then run over the still-unclassified fragments, but only while
/// the district or the ward is missing. When several fragments name a
/// province, the last one wins and the one before it fills an empty
/// district.
pub fn decompose_label(label: &str, rules: &LocaleRules) -> ParsedLabel {
    let parts: Vec<&str> = label
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut picks = Picks::default();
    let mut seen = vec![false; parts.len()];

    for (i, part) in parts.iter().enumerate() {
        match rules.classify(part) {
            Some(Slot::Province) => picks.provinces.push(i),
            Some(Slot::District) => {
                picks.district.get_or_insert(i);
            }
            Some(Slot::Ward) => {
                picks.ward.get_or_insert(i);
            }
            Some(Slot::Street) => {
                let longer = picks
                    .street
                    .is_none_or(|s| part.chars().count() > parts[s].chars().count());
                if longer {
                    picks.street = Some(i);
                }
            }
            None => {
                if picks.street.is_none() && part.starts_with(|c: char| c.is_ascii_digit()) {
                    picks.street = Some(i);
                }
                continue;
            }
        }
        seen[i] = true;
    }

    if picks.district.is_none() || picks.ward.is_none() {
        for (i, part) in parts.iter().enumerate() {
            if seen[i] || picks.street == Some(i) {
                continue;
            }
            match rules.classify_fallback(part) {
                Some(Slot::District) if picks.district.is_none() => picks.district = Some(i),
                Some(Slot::Ward) if picks.ward.is_none() => picks.ward = Some(i),
                Some(Slot::Province) if picks.provinces.is_empty() => picks.provinces.push(i),
                _ => {}
            }
        }
    }

    let province = picks.provinces.last().copied();
    if picks.district.is_none() && picks.provinces.len() > 1 {
        picks.district = picks.provinces.get(picks.provinces.len() - 2).copied();
    }

    let slot_of = |i: usize| {
        if province == Some(i) {
            Some(Slot::Province)
        } else if picks.district == Some(i) {
            Some(Slot::District)
        } else if picks.ward == Some(i) {
            Some(Slot::Ward)
        } else if picks.street == Some(i) {
            Some(Slot::Street)
        } else {
            None
        }
    };
    let text = |i: Option<usize>| i.map(|i| parts[i].to_owned());

    ParsedLabel {
        province: text(province),
        district: text(picks.district),
        ward: text(picks.ward),
        street: text(picks.street),
        fragments: parts
            .iter()
            .enumerate()
            .map(|(i, part)| ClassifiedFragment {
                text: (*part).to_owned(),
                slot: slot_of(i),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn english_label_from_storefront_search() {
        let parsed = decompose_label(
            "Coffee Shop 184 Main St, 184 Main Street, Ward 15, District 11, City X",
            &LocaleRules::english(),
        );
        assert_eq!(parsed.province.as_deref(), Some("City X"));
        assert_eq!(parsed.district.as_deref(), Some("District 11"));
        assert_eq!(parsed.ward.as_deref(), Some("Ward 15"));
        assert_eq!(parsed.street.as_deref(), Some("184 Main Street"));
        assert_eq!(parsed.fragments[0].slot, None);
        assert_eq!(parsed.fragments.len(), 5);
    }

    #[test]
    fn vietnamese_label_with_digit_street() {
        let parsed = decompose_label(
            "184 Lê Đại Hành, Phường 15, Quận 11, Thành phố Hồ Chí Minh",
            &LocaleRules::vietnamese(),
        );
        assert_eq!(parsed.street.as_deref(), Some("184 Lê Đại Hành"));
        assert_eq!(parsed.ward.as_deref(), Some("Phường 15"));
        assert_eq!(parsed.district.as_deref(), Some("Quận 11"));
        assert_eq!(parsed.province.as_deref(), Some("Thành phố Hồ Chí Minh"));
    }

    #[test]
    fn longer_street_candidate_wins() {
        let parsed = decompose_label(
            "Hẻm 5, 12 Hẻm 5 Đường Nguyễn Trãi, Quận 1",
            &LocaleRules::vietnamese(),
        );
        assert_eq!(parsed.street.as_deref(), Some("12 Hẻm 5 Đường Nguyễn Trãi"));
        assert_eq!(parsed.fragments[0].slot, None);
    }

    #[test]
    fn digit_fallback_only_without_keyword_street() {
        let parsed = decompose_label(
            "Đường Lê Lợi, 7 Bến Thành, Quận 1",
            &LocaleRules::vietnamese(),
        );
        assert_eq!(parsed.street.as_deref(), Some("Đường Lê Lợi"));

        let parsed = decompose_label("7 Bến Thành, 9 Lê Lợi, Quận 1", &LocaleRules::vietnamese());
        assert_eq!(parsed.street.as_deref(), Some("7 Bến Thành"));
    }

    #[test]
    fn abbreviations_recovered_by_fallback() {
        let parsed = decompose_label("12 Lý Tự Trọng, P.15, Q.1, TP HCM", &LocaleRules::vietnamese());
        assert_eq!(parsed.ward.as_deref(), Some("P.15"));
        assert_eq!(parsed.district.as_deref(), Some("Q.1"));
        assert_eq!(parsed.province.as_deref(), Some("TP HCM"));
    }

    #[test]
    fn fallback_skipped_once_district_and_ward_known() {
        let parsed = decompose_label(
            "Q.1 Coffee, Phường Bến Nghé, Quận 1, Hồ Chí Minh",
            &LocaleRules::vietnamese(),
        );
        assert_eq!(parsed.district.as_deref(), Some("Quận 1"));
        assert_eq!(parsed.province, None);
        assert_eq!(parsed.fragments[0].slot, None);
    }

    #[test]
    fn city_level_district_demoted_from_province() {
        let parsed = decompose_label(
            "Phường Thảo Điền, Thành phố Thủ Đức, Thành phố Hồ Chí Minh",
            &LocaleRules::vietnamese(),
        );
        assert_eq!(parsed.province.as_deref(), Some("Thành phố Hồ Chí Minh"));
        assert_eq!(parsed.district.as_deref(), Some("Thành phố Thủ Đức"));
        assert_eq!(parsed.fragments[1].slot, Some(Slot::District));
    }

    #[test]
    fn first_district_and_ward_are_kept() {
        let parsed = decompose_label("Ward 3, Ward 4, District 9, District 7", &LocaleRules::english());
        assert_eq!(parsed.ward.as_deref(), Some("Ward 3"));
        assert_eq!(parsed.district.as_deref(), Some("District 9"));
    }

    #[test]
    fn blank_label_parses_to_nothing() {
        let parsed = decompose_label(" , ,", &LocaleRules::vietnamese());
        assert!(parsed.is_empty());
        assert!(parsed.fragments.is_empty());
        assert_eq!(parsed.get(Slot::Street), None);
    }
}
