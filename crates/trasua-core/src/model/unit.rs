// ── Administrative units ──
//
// Province, district and ward share one shape; the tier travels with the
// unit so a stray ward can never be offered where a district is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ── UnitCode ────────────────────────────────────────────────────────

/// Stable identifier of an administrative unit, unique within its tier.
///
/// Upstream codes are numeric; they are kept in their decimal string form
/// so proxies that re-serialize them as strings compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCode(String);

impl UnitCode {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UnitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UnitCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for UnitCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UnitCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<u32> for UnitCode {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

// ── Tier ────────────────────────────────────────────────────────────

/// A level of the administrative hierarchy, outermost first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tier {
    Province,
    District,
    Ward,
}

impl Tier {
    /// The tier directly below this one, if any.
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Province => Some(Self::District),
            Self::District => Some(Self::Ward),
            Self::Ward => None,
        }
    }
}

// ── AdministrativeUnit ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrativeUnit {
    pub code: UnitCode,
    pub name: String,
    pub tier: Tier,
}

impl AdministrativeUnit {
    pub fn new(code: impl Into<UnitCode>, name: impl Into<String>, tier: Tier) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            tier,
        }
    }
}

/// Sort units by display name, ignoring case and diacritics.
///
/// `Đà Nẵng` sorts with the D names rather than after `Yên Bái`. Names that
/// fold to the same key keep a stable order by raw name, then code.
pub fn sort_by_name(units: &mut [AdministrativeUnit]) {
    units.sort_by_cached_key(|u| {
        (
            deunicode::deunicode(&u.name).to_lowercase(),
            u.name.to_lowercase(),
            u.code.clone(),
        )
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unit_code_trims_and_displays() {
        let code = UnitCode::new(" 79 ");
        assert_eq!(code.as_str(), "79");
        assert_eq!(code.to_string(), "79");
        assert_eq!(UnitCode::from(79), code);
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("District".parse::<Tier>().unwrap(), Tier::District);
        assert_eq!(Tier::Ward.to_string(), "ward");
        assert!("county".parse::<Tier>().is_err());
    }

    #[test]
    fn tier_children() {
        assert_eq!(Tier::Province.child(), Some(Tier::District));
        assert_eq!(Tier::District.child(), Some(Tier::Ward));
        assert_eq!(Tier::Ward.child(), None);
    }

    #[test]
    fn sorting_ignores_case() {
        let mut units = vec![
            AdministrativeUnit::new("2", "quận 3", Tier::District),
            AdministrativeUnit::new("1", "Quận 1", Tier::District),
            AdministrativeUnit::new("3", "Huyện Bình Chánh", Tier::District),
        ];
        sort_by_name(&mut units);
        let names: Vec<_> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Huyện Bình Chánh", "Quận 1", "quận 3"]);
    }

    #[test]
    fn sorting_folds_vietnamese_letters() {
        let mut units: Vec<_> = ["Yên Bái", "Đà Nẵng", "Điện Biên", "An Giang"]
            .iter()
            .enumerate()
            .map(|(i, name)| AdministrativeUnit::new(i.to_string(), *name, Tier::Province))
            .collect();
        sort_by_name(&mut units);
        let names: Vec<_> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["An Giang", "Đà Nẵng", "Điện Biên", "Yên Bái"]);
    }
}
