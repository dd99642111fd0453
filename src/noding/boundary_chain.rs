use std::collections::hash_map::Entry;
use std::collections::HashMap;

use geo_types::Coord;

use crate::error::Result;
use crate::noding::segment_string::SegmentString;
use crate::noding::Noder;
use crate::utils::CoordKey;

/// Extracts the outer boundary of a set of chains forming a valid coverage.
///
/// No intersections are computed. Each segment is keyed without regard to
/// direction; a segment seen an even number of times is shared between
/// adjacent rings and dissolves away. The surviving segments are emitted as
/// maximal runs of their source chains.
#[derive(Debug, Default)]
pub struct BoundaryChainNoder {
    chains: Vec<SegmentString>,
}

type SegmentKey = (CoordKey, CoordKey);

fn segment_key(p0: Coord<f64>, p1: Coord<f64>) -> SegmentKey {
    let (a, b) = (CoordKey::from(p0), CoordKey::from(p1));
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl BoundaryChainNoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles each segment in and out of the set, leaving those seen an odd
    /// number of times, and returns per-chain boundary flags.
    fn mark_boundary_segments(chains: &[SegmentString]) -> Vec<Vec<bool>> {
        let mut seen: HashMap<SegmentKey, (usize, usize)> = HashMap::new();
        for (chain_index, chain) in chains.iter().enumerate() {
            for (seg_index, w) in chain.coords.windows(2).enumerate() {
                match seen.entry(segment_key(w[0], w[1])) {
                    Entry::Occupied(e) => {
                        e.remove();
                    }
                    Entry::Vacant(e) => {
                        e.insert((chain_index, seg_index));
                    }
                }
            }
        }
        let mut flags: Vec<Vec<bool>> = chains
            .iter()
            .map(|c| vec![false; c.coords.len().saturating_sub(1)])
            .collect();
        for (chain_index, seg_index) in seen.into_values() {
            flags[chain_index][seg_index] = true;
        }
        flags
    }

    fn extract_runs(chain: &SegmentString, flags: &[bool], out: &mut Vec<SegmentString>) {
        let mut i = 0;
        while i < flags.len() {
            if !flags[i] {
                i += 1;
                continue;
            }
            let start = i;
            while i < flags.len() && flags[i] {
                i += 1;
            }
            out.push(SegmentString::new(chain.coords[start..=i].to_vec(), chain.context));
        }
    }
}

impl Noder for BoundaryChainNoder {
    fn compute_nodes(&mut self, chains: Vec<SegmentString>) -> Result<()> {
        let flags = Self::mark_boundary_segments(&chains);
        let mut out = Vec::new();
        for (chain, chain_flags) in chains.iter().zip(&flags) {
            Self::extract_runs(chain, chain_flags, &mut out);
        }
        log::debug!("boundary dissolve kept {} runs from {} chains", out.len(), chains.len());
        self.chains = out;
        Ok(())
    }

    fn take_noded_substrings(&mut self) -> Vec<SegmentString> {
        std::mem::take(&mut self.chains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(pts: &[(f64, f64)], context: usize) -> SegmentString {
        SegmentString::new(pts.iter().map(|&(x, y)| Coord { x, y }).collect(), context)
    }

    #[test]
    fn test_shared_edge_dissolves() {
        let left = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)], 0);
        let right = ring(&[(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 0.0)], 1);
        let out = BoundaryChainNoder::new().node(vec![left, right]).unwrap();

        let seg_count: usize = out.iter().map(|s| s.coords.len() - 1).sum();
        assert_eq!(seg_count, 6);
        for s in &out {
            for w in s.coords.windows(2) {
                assert_ne!(segment_key(w[0], w[1]), segment_key(Coord { x: 1.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }));
            }
        }
        // left ring loses its second segment and splits in two; right ring loses its last
        assert_eq!(out.iter().filter(|s| s.context == 0).count(), 2);
        assert_eq!(out.iter().filter(|s| s.context == 1).count(), 1);
    }

    #[test]
    fn test_isolated_ring_kept_whole() {
        let r = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)], 2);
        let out = BoundaryChainNoder::new().node(vec![r.clone()]).unwrap();
        assert_eq!(out, vec![r]);
    }
}
