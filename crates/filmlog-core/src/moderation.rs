// Content moderation for catalog search and trending results

use filmlog_config::ModerationConfig;
use filmlog_models::CatalogEntry;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Moderation rules in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    AllowListed,
    DenyListed,
    MissingPoster,
    Adult,
    BannedKeyword,
    RegionalAllowance,
    SouthAsianLowVotes,
    EastAsianLowVotes,
    ForeignLowVotes,
    Obscure,
    LowReputation,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Drop,
}

/// Outcome for one entry together with the rule that decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    pub rule: Rule,
}

impl Verdict {
    fn keep(rule: Rule) -> Self {
        Self { decision: Decision::Keep, rule }
    }

    fn drop(rule: Rule) -> Self {
        Self { decision: Decision::Drop, rule }
    }

    pub fn is_kept(&self) -> bool {
        self.decision == Decision::Keep
    }
}

/// Immutable, pre-normalized moderation policy
///
/// Built once from configuration and passed to the filter, which keeps the
/// filter itself stateless.
#[derive(Debug, Clone)]
pub struct ModerationPolicy {
    allow_ids: HashSet<u64>,
    deny_ids: HashSet<u64>,
    banned_keywords: Vec<String>,
    always_allowed_languages: HashSet<String>,
    always_allowed_countries: HashSet<String>,
    south_asian_languages: HashSet<String>,
    east_asian_languages: HashSet<String>,
    open_languages: HashSet<String>,
    south_asian_min_votes: u64,
    east_asian_min_votes: u64,
    foreign_min_votes: u64,
    obscure_max_votes: u64,
    obscure_max_popularity: f64,
    min_reputation: f64,
}

fn lowercase_set(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

impl ModerationPolicy {
    pub fn from_config(config: &ModerationConfig) -> Self {
        Self {
            allow_ids: config.allow_ids.iter().copied().collect(),
            deny_ids: config.deny_ids.iter().copied().collect(),
            banned_keywords: config
                .banned_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            always_allowed_languages: lowercase_set(&config.always_allowed_languages),
            always_allowed_countries: lowercase_set(&config.always_allowed_countries),
            south_asian_languages: lowercase_set(&config.south_asian_languages),
            east_asian_languages: lowercase_set(&config.east_asian_languages),
            open_languages: lowercase_set(&config.open_languages),
            south_asian_min_votes: config.south_asian_min_votes,
            east_asian_min_votes: config.east_asian_min_votes,
            foreign_min_votes: config.foreign_min_votes,
            obscure_max_votes: config.obscure_max_votes,
            obscure_max_popularity: config.obscure_max_popularity,
            min_reputation: config.min_reputation,
        }
    }

    /// Case-insensitive substring match against the banned keyword list
    pub fn contains_banned_keyword(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        self.banned_keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self::from_config(&ModerationConfig::default())
    }
}

/// Decide whether one catalog entry may be displayed; the first matching rule wins
pub fn moderate(entry: &CatalogEntry, policy: &ModerationPolicy) -> Verdict {
    if policy.allow_ids.contains(&entry.id) {
        return Verdict::keep(Rule::AllowListed);
    }
    if policy.deny_ids.contains(&entry.id) {
        return Verdict::drop(Rule::DenyListed);
    }
    if !entry.has_poster() {
        return Verdict::drop(Rule::MissingPoster);
    }
    if entry.adult {
        return Verdict::drop(Rule::Adult);
    }
    if policy.contains_banned_keyword(&entry.title)
        || policy.contains_banned_keyword(&entry.original_title)
        || policy.contains_banned_keyword(&entry.overview)
    {
        return Verdict::drop(Rule::BannedKeyword);
    }

    let language = entry.original_language.trim().to_lowercase();
    let regional = policy.always_allowed_languages.contains(&language)
        || entry
            .origin_country
            .iter()
            .any(|c| policy.always_allowed_countries.contains(&c.trim().to_lowercase()));
    if regional {
        return Verdict::keep(Rule::RegionalAllowance);
    }

    let votes = entry.vote_count;
    if policy.south_asian_languages.contains(&language) && votes < policy.south_asian_min_votes {
        return Verdict::drop(Rule::SouthAsianLowVotes);
    }
    if policy.east_asian_languages.contains(&language) && votes < policy.east_asian_min_votes {
        return Verdict::drop(Rule::EastAsianLowVotes);
    }
    if !policy.open_languages.contains(&language) && votes < policy.foreign_min_votes {
        return Verdict::drop(Rule::ForeignLowVotes);
    }
    if votes < policy.obscure_max_votes && entry.popularity < policy.obscure_max_popularity {
        return Verdict::drop(Rule::Obscure);
    }
    if entry.reputation() < policy.min_reputation {
        return Verdict::drop(Rule::LowReputation);
    }

    Verdict::keep(Rule::Default)
}

/// Return the subset of `entries` permitted for display, in input order
///
/// Input is never mutated; kept entries are cloned into the result.
pub fn filter_catalog(entries: &[CatalogEntry], policy: &ModerationPolicy) -> Vec<CatalogEntry> {
    let mut kept = Vec::with_capacity(entries.len());
    let mut dropped_by_rule: BTreeMap<Rule, usize> = BTreeMap::new();

    for entry in entries {
        let verdict = moderate(entry, policy);
        if verdict.is_kept() {
            kept.push(entry.clone());
        } else {
            *dropped_by_rule.entry(verdict.rule).or_insert(0) += 1;
        }
    }

    debug!(
        "filter_catalog: input_count={}, kept_count={}, dropped={:?}",
        entries.len(),
        kept.len(),
        dropped_by_rule
    );

    kept
}

/// True when the raw search text should not be sent to the catalog at all
pub fn is_query_banned(query: &str, policy: &ModerationPolicy) -> bool {
    let query = query.trim();
    !query.is_empty() && policy.contains_banned_keyword(query)
}
