//! Greedy ordered-subsequence matching over a node's children.

/// Finds an ordered, possibly non-contiguous subsequence of `children`
/// satisfying `predicates` in order.
///
/// A single left-to-right scan: the current predicate is tried against the
/// current child; on success both advance and the child is recorded,
/// otherwise only the child cursor moves. A pairing is never revisited, so a
/// child consumed by predicate `k` is unavailable to predicate `k + 1`.
///
/// Returns `None` when the children run out before every predicate has been
/// satisfied. Children left over after the last predicate are ignored.
pub fn match_subsequence<N, P>(children: &[N], predicates: &[P]) -> Option<Vec<N>>
where
    N: Clone,
    P: Fn(&N) -> bool,
{
    let mut pending = predicates.iter().peekable();
    let mut matched = Vec::with_capacity(predicates.len());

    for child in children {
        let Some(predicate) = pending.peek() else {
            break;
        };

        if predicate(child) {
            matched.push(child.clone());
            pending.next();
        }
    }

    pending.peek().is_none().then_some(matched)
}

/// Fixed-arity form of [`match_subsequence`].
///
/// # Panics
/// Panics if the matcher reports success with a subsequence whose length
/// differs from `K`, which would break the matcher's own contract.
pub fn match_exact<N, P, const K: usize>(children: &[N], predicates: [P; K]) -> Option<[N; K]>
where
    N: Clone,
    P: Fn(&N) -> bool,
{
    let matched = match_subsequence(children, &predicates)?;

    Some(matched.try_into().unwrap_or_else(|matched: Vec<N>| {
        panic!(
            "subsequence matcher returned {} children for {K} predicates",
            matched.len()
        )
    }))
}
