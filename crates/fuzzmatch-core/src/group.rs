//! Transitive grouping of pairwise matches
//!
//! Matches are edges between documents. Each connected component becomes
//! one group, so A~B and B~C put A, B and C together even when A and C do
//! not match directly.

use ahash::{AHashMap, AHashSet};
use std::collections::hash_map::Entry;
use std::hash::Hash;
use tracing::debug;

use crate::domain::Match;

/// Split `matches` into connected components.
///
/// Traversal follows matches leaving and entering each visited node and
/// uses an explicit stack. Within a group a pair appears once: a match
/// whose reverse is already in the group is left out. Groups come out in
/// the order their first subject appears in `matches`.
pub fn group_matches<T>(matches: Vec<Match<T>>) -> Vec<Vec<Match<T>>>
where
    T: Clone + Eq + Hash,
{
    let mut order: Vec<T> = Vec::new();
    let mut outgoing: AHashMap<T, Vec<Match<T>>> = AHashMap::new();
    let mut incoming: AHashMap<T, Vec<T>> = AHashMap::new();

    for m in matches {
        incoming
            .entry(m.candidate().clone())
            .or_default()
            .push(m.subject().clone());
        match outgoing.entry(m.subject().clone()) {
            Entry::Occupied(mut slot) => slot.get_mut().push(m),
            Entry::Vacant(slot) => {
                order.push(slot.key().clone());
                slot.insert(vec![m]);
            }
        }
    }

    let mut visited: AHashSet<T> = AHashSet::new();
    let mut groups = Vec::new();
    for start in order {
        if visited.contains(&start) {
            continue;
        }
        let mut group: Vec<Match<T>> = Vec::new();
        let mut pairs: AHashSet<(T, T)> = AHashSet::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if !visited.insert(node.clone()) {
                continue;
            }
            if let Some(neighbors) = incoming.remove(&node) {
                stack.extend(neighbors);
            }
            for m in outgoing.remove(&node).unwrap_or_default() {
                let subject = m.subject().clone();
                let candidate = m.candidate().clone();
                stack.push(candidate.clone());
                if pairs.contains(&(candidate.clone(), subject.clone())) {
                    continue;
                }
                if pairs.insert((subject, candidate)) {
                    group.push(m);
                }
            }
        }

        if !group.is_empty() {
            groups.push(group);
        }
    }

    debug!("Formed {} match groups", groups.len());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: &'static str, b: &'static str) -> Match<&'static str> {
        Match::with_score(a, b, 1.0)
    }

    fn members(group: &[Match<&'static str>]) -> Vec<&'static str> {
        let mut keys: Vec<&str> = group
            .iter()
            .flat_map(|m| [*m.subject(), *m.candidate()])
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    #[test]
    fn test_transitive_chain_is_one_group() {
        let groups = group_matches(vec![edge("a", "b"), edge("b", "c")]);
        assert_eq!(groups.len(), 1);
        assert_eq!(members(&groups[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reverse_match_kept_once() {
        let groups = group_matches(vec![edge("a", "b"), edge("b", "a")]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 1);
    }

    #[test]
    fn test_components_stay_apart() {
        let groups = group_matches(vec![edge("a", "b"), edge("c", "d"), edge("d", "c")]);
        assert_eq!(groups.len(), 2);
        assert_eq!(members(&groups[0]), vec!["a", "b"]);
        assert_eq!(members(&groups[1]), vec!["c", "d"]);
    }

    #[test]
    fn test_incoming_edges_join_groups() {
        // c is only ever a candidate; a and b reach each other through it
        let groups = group_matches(vec![edge("a", "c"), edge("b", "c")]);
        assert_eq!(groups.len(), 1);
        assert_eq!(members(&groups[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_matches::<&str>(Vec::new()).is_empty());
    }
}
