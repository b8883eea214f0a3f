//! Best-effort name matching between a reference and a set of candidates.
//!
//! This is a heuristic, not a join: when several candidates share a substring with the
//! reference, the first one encountered wins, which can pair the wrong objects (`arm` matches
//! both `arm_L` and `forearm_L`). Callers should treat a [`MatchKind::Partial`] result as a
//! guess and log it as such.

/// Leaf name of a DAG path with any namespace removed (`|grp|ns:body` -> `body`).
pub fn short_name(name: &str) -> &str {
    let leaf = name.rsplit('|').next().unwrap_or(name);
    leaf.rsplit(':').next().unwrap_or(leaf)
}

/// How a candidate was selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// Leaf names are equal (case-sensitive).
    Exact,
    /// One leaf name contains the other.
    Partial,
}

/// A selected candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameMatch<'a> {
    pub index: usize,
    pub name: &'a str,
    pub kind: MatchKind,
}

/// Pick the candidate that best matches `reference`.
///
/// Exact leaf-name equality is preferred over every partial match; otherwise the first
/// candidate whose leaf contains, or is contained in, the reference's leaf is returned.
pub fn best_match<'a, S>(reference: &str, candidates: &'a [S]) -> Option<NameMatch<'a>>
where
    S: AsRef<str>,
{
    let want = short_name(reference);
    if want.is_empty() {
        return None;
    }

    let exact = candidates
        .iter()
        .enumerate()
        .find(|(_, c)| short_name(c.as_ref()) == want);
    if let Some((index, c)) = exact {
        return Some(NameMatch {
            index,
            name: c.as_ref(),
            kind: MatchKind::Exact,
        });
    }

    candidates
        .iter()
        .enumerate()
        .find(|(_, c)| {
            let have = short_name(c.as_ref());
            !have.is_empty() && (have.contains(want) || want.contains(have))
        })
        .map(|(index, c)| NameMatch {
            index,
            name: c.as_ref(),
            kind: MatchKind::Partial,
        })
}

/// All candidates matching `reference`, exact matches only if there are any.
pub fn all_matches<'a, S>(reference: &str, candidates: &'a [S]) -> Vec<NameMatch<'a>>
where
    S: AsRef<str>,
{
    let want = short_name(reference);
    if want.is_empty() {
        return Vec::new();
    }

    let exact: Vec<_> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| short_name(c.as_ref()) == want)
        .map(|(index, c)| NameMatch {
            index,
            name: c.as_ref(),
            kind: MatchKind::Exact,
        })
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            let have = short_name(c.as_ref());
            !have.is_empty() && (have.contains(want) || want.contains(have))
        })
        .map(|(index, c)| NameMatch {
            index,
            name: c.as_ref(),
            kind: MatchKind::Partial,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/naming/matching.rs"]
mod tests;
