//! Name matching shared by the card stores.
//!
//! Candidates are ranked: exact (case-insensitive) match, then prefix, then
//! substring, then by Levenshtein distance when the distance stays within a
//! third of the query length (minimum 2). Ties sort by name.

use deck_types::CardRecord;

const EXACT: usize = 0;
const PREFIX: usize = 1;
const SUBSTRING: usize = 2;
const EDIT_BASE: usize = 3;

/// Score a candidate name against a lowercase query. Lower is better.
pub fn match_score(query: &str, candidate: &str) -> Option<usize> {
    let candidate = candidate.to_lowercase();
    if query.is_empty() {
        return None;
    }
    if candidate == query {
        return Some(EXACT);
    }
    if candidate.starts_with(query) {
        return Some(PREFIX);
    }
    if candidate.contains(query) {
        return Some(SUBSTRING);
    }

    let max_distance = (query.chars().count() / 3).max(2);
    let distance = levenshtein_distance(query, &candidate);
    (distance <= max_distance).then_some(EDIT_BASE + distance)
}

/// Rank `candidates` against `query` and keep the best `limit`.
pub fn rank_candidates<I>(query: &str, candidates: I, limit: usize) -> Vec<CardRecord>
where
    I: IntoIterator<Item = CardRecord>,
{
    let query = query.trim().to_lowercase();
    let mut scored: Vec<(usize, CardRecord)> = candidates
        .into_iter()
        .filter_map(|card| match_score(&query, &card.name).map(|score| (score, card)))
        .collect();

    scored.sort_by(|(a_score, a), (b_score, b)| a_score.cmp(b_score).then_with(|| a.name.cmp(&b.name)));
    scored.into_iter().take(limit).map(|(_, card)| card).collect()
}

pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
