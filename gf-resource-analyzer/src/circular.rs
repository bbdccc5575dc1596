//! Circular dependency detection over stamps
//!
//! Each host asset is used as a search root. A depth-first walk keeps the
//! current route and the set of names on that route (not a global visited
//! set); reaching a name already on the route closes a cycle and ends the
//! search for that root. Roots are visited in sorted order so the reported
//! routes are stable between runs, and a cycle already reported from an
//! earlier root is not reported again.

use crate::stamp::Stamp;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Finds dependency cycles between host assets
pub struct CircularDependencyChecker<'a> {
    edges: BTreeMap<&'a str, Vec<&'a str>>,
}

impl<'a> CircularDependencyChecker<'a> {
    pub fn new(stamps: &'a [Stamp]) -> Self {
        let unique: BTreeSet<&Stamp> = stamps.iter().collect();
        let mut edges: BTreeMap<&'a str, Vec<&'a str>> = BTreeMap::new();
        for stamp in unique {
            edges
                .entry(stamp.host_asset_name())
                .or_default()
                .push(stamp.dependency_asset_name());
        }
        Self { edges }
    }

    /// Routes of the discovered cycles
    ///
    /// Every route ends with a name that already appears earlier in it; the
    /// names from that earlier position onward form the cycle.
    pub fn check(&self) -> Vec<Vec<String>> {
        let mut seen: HashSet<Vec<&str>> = HashSet::new();
        let mut results = Vec::new();
        for &host in self.edges.keys() {
            let Some((route, start)) = self.check_root(host) else {
                continue;
            };
            if seen.insert(canonical_cycle(&route[start..route.len() - 1])) {
                results.push(route.into_iter().map(str::to_string).collect());
            }
        }
        results
    }

    /// First cycle reachable from `root`, with the route position where the
    /// cycle starts
    fn check_root(&self, root: &'a str) -> Option<(Vec<&'a str>, usize)> {
        let mut route: Vec<&'a str> = vec![root];
        // Names on the route and their positions in it
        let mut visited: HashMap<&'a str, usize> = HashMap::from([(root, 0)]);
        // Next edge to try for each node on the route
        let mut cursors: Vec<usize> = vec![0];

        while let Some(&node) = route.last() {
            let next = cursors.last_mut().and_then(|cursor| {
                let dependency = self.edges.get(node)?.get(*cursor).copied()?;
                *cursor += 1;
                Some(dependency)
            });

            match next {
                Some(dependency) => {
                    if let Some(&start) = visited.get(dependency) {
                        route.push(dependency);
                        return Some((route, start));
                    }
                    visited.insert(dependency, route.len());
                    route.push(dependency);
                    cursors.push(0);
                }
                None => {
                    visited.remove(node);
                    route.pop();
                    cursors.pop();
                }
            }
        }

        None
    }
}

/// A cycle rotated to start at its smallest name
///
/// `cycle` is the closed part of a route without the repeated name, so it
/// always holds at least one name.
fn canonical_cycle<'a>(cycle: &[&'a str]) -> Vec<&'a str> {
    let min = (1..cycle.len()).fold(0, |min, i| if cycle[i] < cycle[min] { i } else { min });
    let mut canonical = cycle.to_vec();
    canonical.rotate_left(min);
    canonical
}
