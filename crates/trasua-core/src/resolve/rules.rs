// ── Locale rule tables ──
//
// Label fragments are classified by an ordered list of rules. Keyword
// rules match whole words case-insensitively; pattern rules are anchored
// regexes for abbreviated forms. Fallback rules only run for fragments
// left unclassified once the primary rules have seen the whole label.

use regex::Regex;
use serde::Serialize;

use crate::config::Locale;
use crate::model::Tier;

/// What a label fragment names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Province,
    District,
    Ward,
    Street,
}

impl Slot {
    /// The administrative tier this slot resolves against, if any.
    pub fn tier(self) -> Option<Tier> {
        match self {
            Self::Province => Some(Tier::Province),
            Self::District => Some(Tier::District),
            Self::Ward => Some(Tier::Ward),
            Self::Street => None,
        }
    }
}

#[derive(Debug, Clone)]
enum RuleMatcher {
    /// Each entry is a lowercased word sequence, e.g. `["thị", "xã"]`.
    Keywords(Vec<Vec<String>>),
    Pattern(Regex),
}

/// One `(predicate, slot)` entry of a rule table.
#[derive(Debug, Clone)]
pub struct TierRule {
    slot: Slot,
    matcher: RuleMatcher,
    fallback: bool,
}

impl TierRule {
    /// Whole-word, case-insensitive keyword rule.
    pub fn keywords(slot: Slot, words: &[&str]) -> Self {
        Self {
            slot,
            matcher: RuleMatcher::Keywords(words.iter().map(|w| words_of(w)).collect()),
            fallback: false,
        }
    }

    /// Anchored regex rule, applied case-insensitively.
    pub fn pattern(slot: Slot, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            slot,
            matcher: RuleMatcher::Pattern(Regex::new(&format!("(?i){pattern}"))?),
            fallback: false,
        })
    }

    /// Only consulted after the primary sweep, and only while `slot` is unresolved.
    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn matches(&self, fragment: &str) -> bool {
        match &self.matcher {
            RuleMatcher::Keywords(sets) => {
                let words = words_of(fragment);
                sets.iter().any(|kw| contains_words(&words, kw))
            }
            RuleMatcher::Pattern(re) => re.is_match(fragment.trim()),
        }
    }

    fn keyword_sets(&self) -> &[Vec<String>] {
        match &self.matcher {
            RuleMatcher::Keywords(sets) => sets,
            RuleMatcher::Pattern(_) => &[],
        }
    }
}

/// Lowercased words of `text`, split on anything that is not alphanumeric.
pub(crate) fn words_of(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_words(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

// ── Rule tables ──────────────────────────────────────────────────

/// Ordered rule table for one jurisdiction's administrative vocabulary.
#[derive(Debug, Clone)]
pub struct LocaleRules {
    rules: Vec<TierRule>,
}

impl LocaleRules {
    pub fn new(rules: Vec<TierRule>) -> Self {
        Self { rules }
    }

    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Vietnamese => Self::vietnamese(),
            Locale::English => Self::english(),
        }
    }

    /// Vietnamese tiers: tỉnh/thành phố → quận/huyện/thị xã → phường/xã/thị trấn → đường.
    pub fn vietnamese() -> Self {
        let mut rules = vec![
            TierRule::keywords(Slot::Province, &["tỉnh", "thành phố", "tp"]),
            TierRule::keywords(Slot::District, &["quận", "huyện", "thị xã"]),
            TierRule::keywords(Slot::Ward, &["phường", "xã", "thị trấn"]),
            TierRule::keywords(Slot::Street, &["đường", "phố", "hẻm", "ngõ"]),
        ];
        rules.extend(
            [
                (Slot::District, r"^(q|h)\.?\s*\d+$"),
                (Slot::District, r"^(q|h)\.\s*\S+"),
                (Slot::Ward, r"^p\.?\s*\d+$"),
                (Slot::Ward, r"^(p|x|tt)\.\s*\S+"),
                (Slot::Province, r"^t\.\s*\S+"),
            ]
            .into_iter()
            .filter_map(|(slot, pattern)| TierRule::pattern(slot, pattern).ok())
            .map(TierRule::as_fallback),
        );
        Self { rules }
    }

    /// English tiers: city/province → district → ward → street/road/avenue.
    pub fn english() -> Self {
        let mut rules = vec![
            TierRule::keywords(Slot::Province, &["city", "province"]),
            TierRule::keywords(Slot::District, &["district", "county", "town"]),
            TierRule::keywords(Slot::Ward, &["ward", "commune"]),
            TierRule::keywords(
                Slot::Street,
                &["street", "road", "avenue", "boulevard", "lane", "alley"],
            ),
        ];
        rules.extend(
            [
                (Slot::District, r"^dist\.?\s*\S+"),
                (Slot::Ward, r"^w\.?\s*\d+$"),
            ]
            .into_iter()
            .filter_map(|(slot, pattern)| TierRule::pattern(slot, pattern).ok())
            .map(TierRule::as_fallback),
        );
        Self { rules }
    }

    pub fn rules(&self) -> &[TierRule] {
        &self.rules
    }

    /// First primary rule matching `fragment`.
    pub fn classify(&self, fragment: &str) -> Option<Slot> {
        self.rules
            .iter()
            .filter(|r| !r.fallback)
            .find(|r| r.matches(fragment))
            .map(TierRule::slot)
    }

    /// First fallback rule matching `fragment`.
    pub fn classify_fallback(&self, fragment: &str) -> Option<Slot> {
        self.rules
            .iter()
            .filter(|r| r.fallback)
            .find(|r| r.matches(fragment))
            .map(TierRule::slot)
    }

    /// The words of `name` with every tier keyword removed.
    ///
    /// "Thành phố Hồ Chí Minh" and "TP Hồ Chí Minh" both reduce to "hồ chí minh".
    pub fn core_name(&self, name: &str) -> String {
        let mut words = words_of(name);
        for set in self.rules.iter().flat_map(TierRule::keyword_sets) {
            if set.is_empty() {
                continue;
            }
            while let Some(pos) = words.windows(set.len()).position(|w| w == set.as_slice()) {
                words.drain(pos..pos + set.len());
            }
        }
        words.join(" ")
    }
}

impl Default for LocaleRules {
    fn default() -> Self {
        Self::vietnamese()
    }
}
