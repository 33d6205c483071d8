//! Union of resolved flags across all headers.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{PackageQuery, ResolutionTier, Resolver};

/// Result of resolving every scanned header
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// Sorted, de-duplicated include flags
    pub flags: BTreeSet<String>,

    /// Tier used for each resolved header
    pub resolved: BTreeMap<String, ResolutionTier>,

    /// Headers no tier could place, sorted
    pub unresolved: Vec<String>,
}

impl Aggregate {
    /// Resolved header count per tier. Tiers that placed nothing are absent.
    pub fn tier_counts(&self) -> BTreeMap<ResolutionTier, usize> {
        let mut counts = BTreeMap::new();
        for tier in self.resolved.values() {
            *counts.entry(*tier).or_insert(0) += 1;
        }
        counts
    }
}

/// Resolve `headers` in sorted order and union the flags.
pub fn resolve_all<'a, Q, I>(resolver: &mut Resolver<Q>, headers: I) -> Aggregate
where
    Q: PackageQuery,
    I: IntoIterator<Item = &'a String>,
{
    let mut sorted: Vec<&String> = headers.into_iter().collect();
    sorted.sort();
    sorted.dedup();

    let mut aggregate = Aggregate::default();

    for header in sorted {
        match resolver.resolve(header) {
            Some(resolution) => {
                debug!("{} -> {} via {}", header, resolution.flags.join(" "), resolution.tier);
                aggregate.flags.extend(resolution.flags);
                aggregate.resolved.insert(header.clone(), resolution.tier);
            }
            None => {
                debug!("{} unresolved", header);
                aggregate.unresolved.push(header.clone());
            }
        }
    }

    aggregate
}
