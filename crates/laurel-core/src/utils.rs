//! Small string utilities shared by resolver diagnostics.
//!
//! Only helpers that are pass-agnostic live here; anything that knows about
//! symbols or namespaces belongs next to its pass.

/// Simple edit distance for fuzzy matching (Levenshtein).
///
/// Optimized for correctness on small inputs (identifiers), not for very
/// large strings.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Candidates within `max_distance` of `name`, closest first, capped at `limit`.
///
/// Ties are broken by candidate order, so callers that iterate tables in
/// insertion order get deterministic suggestions.
pub fn similar_names<'a, I>(
    name: &str,
    candidates: I,
    max_distance: usize,
    limit: usize,
) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(&str, usize)> = candidates
        .into_iter()
        .filter(|c| *c != name)
        .map(|c| (c, edit_distance(name, c)))
        .filter(|(_, d)| *d <= max_distance)
        .collect();
    scored.sort_by_key(|(_, d)| *d);
    scored.truncate(limit);
    scored.into_iter().map(|(c, _)| c).collect()
}
