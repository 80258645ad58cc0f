// Wire types for the address endpoints.
//
// The division lookup serves numeric codes while some proxies re-serialize
// them as strings, so every `code` is decoded into its string form.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Number(i64),
    Text(String),
}

impl From<CodeRepr> for String {
    fn from(repr: CodeRepr) -> Self {
        match repr {
            CodeRepr::Number(n) => n.to_string(),
            CodeRepr::Text(s) => s,
        }
    }
}

fn code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    CodeRepr::deserialize(deserializer).map(String::from)
}

fn optional_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<CodeRepr>::deserialize(deserializer).map(|repr| repr.map(String::from))
}

/// One administrative unit as listed by `GET /provinces?depth=1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUnit {
    #[serde(deserialize_with = "code")]
    pub code: String,
    pub name: String,
}

/// `GET /provinces/{code}?depth=2`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceDetail {
    #[serde(deserialize_with = "code")]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub districts: Vec<RawUnit>,
}

/// `GET /districts/{code}?depth=2`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictDetail {
    #[serde(deserialize_with = "code")]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub wards: Vec<RawUnit>,
}

/// `GET /autocomplete-place?text=..`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub suggestions: Vec<RawSuggestion>,
}

/// A single place hit. Only `label` is guaranteed to be meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSuggestion {
    #[serde(default, deserialize_with = "optional_code")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// `GET /geocode?address=..`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub lat: f64,
    pub lng: f64,
}

/// Error body shape used by the places proxy on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}
