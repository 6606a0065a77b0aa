//! Joins arc fragments that share endpoints into longer chains.

use std::collections::HashMap;

use geo::Coord;

type Key = (u64, u64);

fn key(c: Coord<f64>) -> Key {
    (c.x.to_bits(), c.y.to_bits())
}

fn is_closed(chain: &[Coord<f64>]) -> bool {
    match (chain.first(), chain.last()) {
        (Some(&first), Some(&last)) => chain.len() > 1 && key(first) == key(last),
        _ => false,
    }
}

/// Stitches `fragments` end-to-start. Closed chains are returned as rings
/// (first coordinate repeated at the end); chains that cannot be closed
/// are returned open.
///
/// Endpoints are matched exactly, which holds for arcs decoded from the
/// same topology.
pub(crate) fn stitch(fragments: Vec<Vec<Coord<f64>>>) -> Vec<Vec<Coord<f64>>> {
    let mut by_start: HashMap<Key, Vec<usize>> = HashMap::new();
    let mut by_end: HashMap<Key, Vec<usize>> = HashMap::new();
    for (i, fragment) in fragments.iter().enumerate() {
        if let (Some(&first), Some(&last)) = (fragment.first(), fragment.last()) {
            by_start.entry(key(first)).or_default().push(i);
            by_end.entry(key(last)).or_default().push(i);
        }
    }

    let mut used = vec![false; fragments.len()];
    let mut chains = Vec::new();

    for i in 0..fragments.len() {
        if used[i] || fragments[i].is_empty() {
            continue;
        }
        used[i] = true;
        let mut chain = fragments[i].clone();

        while !is_closed(&chain) {
            let Some(&last) = chain.last() else { break };
            let Some(j) = next_unused(&by_start, key(last), &used) else {
                break;
            };
            used[j] = true;
            chain.extend(fragments[j].iter().skip(1).copied());
        }

        while !is_closed(&chain) {
            let Some(&first) = chain.first() else { break };
            let Some(j) = next_unused(&by_end, key(first), &used) else {
                break;
            };
            used[j] = true;
            let mut joined = fragments[j].clone();
            joined.extend(chain.into_iter().skip(1));
            chain = joined;
        }

        chains.push(chain);
    }

    chains
}

fn next_unused(index: &HashMap<Key, Vec<usize>>, at: Key, used: &[bool]) -> Option<usize> {
    index
        .get(&at)
        .and_then(|candidates| candidates.iter().copied().find(|&j| !used[j]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn closes_ring_from_fragments() {
        let rings = stitch(vec![
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(1.0, 1.0), c(0.0, 0.0)],
            vec![c(1.0, 0.0), c(1.0, 1.0)],
        ]);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert!(is_closed(&rings[0]));
    }

    #[test]
    fn extends_open_chains_both_ways() {
        let chains = stitch(vec![
            vec![c(1.0, 0.0), c(2.0, 0.0)],
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(2.0, 0.0), c(3.0, 0.0)],
        ]);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].first(), Some(&c(0.0, 0.0)));
        assert_eq!(chains[0].last(), Some(&c(3.0, 0.0)));
        assert_eq!(chains[0].len(), 4);
    }

    #[test]
    fn disjoint_fragments_stay_apart() {
        let chains = stitch(vec![
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(5.0, 5.0), c(6.0, 5.0)],
        ]);
        assert_eq!(chains.len(), 2);
    }
}
