//! Term extraction and ranking for message search.

use crate::entities::MessageSearchHit;

const MAX_TERMS: usize = 8;

/// Split a query into distinct lowercase terms.
pub fn search_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for raw in query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|raw| !raw.is_empty())
    {
        let term = raw.to_lowercase();
        if !terms.contains(&term) {
            terms.push(term);
        }
        if terms.len() == MAX_TERMS {
            break;
        }
    }
    terms
}

/// Total occurrences of all terms, or `None` if any term is missing.
pub fn match_score(text: &str, terms: &[String]) -> Option<usize> {
    let haystack = text.to_lowercase();
    let mut score = 0;
    for term in terms {
        let occurrences = haystack.matches(term.as_str()).count();
        if occurrences == 0 {
            return None;
        }
        score += occurrences;
    }
    Some(score)
}

/// Keep hits containing every term, best score first, newest first on ties.
///
/// Input order is preserved among hits with equal score and timestamp.
pub fn rank_hits(
    hits: Vec<MessageSearchHit>,
    terms: &[String],
    limit: usize,
) -> Vec<MessageSearchHit> {
    let mut scored: Vec<(usize, MessageSearchHit)> = hits
        .into_iter()
        .filter_map(|hit| match_score(&hit.text, terms).map(|score| (score, hit)))
        .collect();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.created_at.cmp(&a.1.created_at))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, hit)| hit)
        .collect()
}
