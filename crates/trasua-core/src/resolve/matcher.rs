// ── Fragment → unit matching ──

use crate::model::AdministrativeUnit;

use super::rules::{LocaleRules, words_of};

/// Largest character-length difference tolerated by containment matching
/// at the numbered tiers.
pub const MAX_LENGTH_DELTA: usize = 3;

/// How aggressively a fragment is matched against a tier's units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Exact name, then containment in either direction. Used for provinces.
    Loose,
    /// Exact name, then embedded numbers, then length-gated containment.
    /// Used for districts and wards, whose names often differ only by a number.
    Numbered,
}

fn normalized(text: &str) -> String {
    words_of(text).join(" ")
}

/// Runs of ASCII digits with leading zeros stripped: "Phường 05" → ["5"].
fn numbers(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| {
            let trimmed = run.trim_start_matches('0');
            if trimmed.is_empty() { "0" } else { trimmed }
        })
        .collect()
}

/// Find the unit in `candidates` that `fragment` most plausibly names.
pub fn match_unit<'a>(
    fragment: &str,
    candidates: &'a [AdministrativeUnit],
    strategy: MatchStrategy,
    rules: &LocaleRules,
) -> Option<&'a AdministrativeUnit> {
    let needle = normalized(fragment);
    if needle.is_empty() {
        return None;
    }

    if let Some(unit) = candidates.iter().find(|u| normalized(&u.name) == needle) {
        return Some(unit);
    }

    let core = rules.core_name(fragment);
    if !core.is_empty() {
        if let Some(unit) = candidates.iter().find(|u| rules.core_name(&u.name) == core) {
            return Some(unit);
        }
    }

    let wanted = numbers(fragment);
    if strategy == MatchStrategy::Numbered && !wanted.is_empty() {
        if let Some(unit) = candidates.iter().find(|u| numbers(&u.name) == wanted) {
            return Some(unit);
        }
    }

    let needle_len = needle.chars().count();
    candidates
        .iter()
        .filter_map(|unit| {
            let name = normalized(&unit.name);
            if name.is_empty() || !(name.contains(&needle) || needle.contains(&name)) {
                return None;
            }
            let delta = name.chars().count().abs_diff(needle_len);
            match strategy {
                MatchStrategy::Loose => Some((delta, unit)),
                MatchStrategy::Numbered => {
                    let theirs = numbers(&unit.name);
                    // "District 11" containing "District 1" is not a match.
                    let numbers_clash =
                        !wanted.is_empty() && !theirs.is_empty() && theirs != wanted;
                    (delta <= MAX_LENGTH_DELTA && !numbers_clash).then_some((delta, unit))
                }
            }
        })
        .min_by_key(|(delta, _)| *delta)
        .map(|(_, unit)| unit)
}
