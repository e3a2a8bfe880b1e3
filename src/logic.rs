use itertools::Itertools;
use varisat::Lit;

// Binomial encodings: no auxiliary variables, fine for the at most 8 literals one island contributes.

/// `a` implies `b`; `!a + b`.
pub(crate) fn implies(a: Lit, b: Lit) -> Vec<Lit> {
    vec![!a, b]
}

/// At most `k` of `lits` are true.
pub(crate) fn at_most_k(lits: &[Lit], k: usize) -> Vec<Vec<Lit>> {
    if k >= lits.len() {
        return Vec::new();
    }

    // among any k + 1 literals, at least one is false
    lits.iter()
        .combinations(k + 1)
        .map(|selection| selection.into_iter().map(|lit| !*lit).collect_vec())
        .collect_vec()
}

/// At least `k` of `lits` are true.
pub(crate) fn at_least_k(lits: &[Lit], k: usize) -> Vec<Vec<Lit>> {
    if k == 0 {
        return Vec::new();
    }
    if k > lits.len() {
        // the empty clause; unsatisfiable
        return vec![Vec::new()];
    }

    // among any n - k + 1 literals, at least one is true
    lits.iter()
        .combinations(lits.len() - k + 1)
        .map(|selection| selection.into_iter().copied().collect_vec())
        .collect_vec()
}

/// Exactly `k` of `lits` are true.
pub(crate) fn exactly_k(lits: &[Lit], k: usize) -> Vec<Vec<Lit>> {
    let mut clauses = at_most_k(lits, k);
    clauses.extend(at_least_k(lits, k));
    clauses
}
