use geo_types::{Coord, Rect};
use rstar::{RTreeObject, AABB};

use crate::algorithm::octant::octant_of;
use crate::utils::{envelope_expand, envelope_of, segment_envelopes_intersect};

/// A run of segments `[start, end]` of a parent chain whose directions all
/// fall in one octant. Such a run is monotone in both X and Y, so the
/// envelope of any sub-run is given by its two end vertices.
#[derive(Clone, Debug)]
pub struct MonotoneChain {
    /// Sequence id, unique within the index that built the chain.
    pub id: usize,
    /// Position of the parent chain in the indexed collection.
    pub chain_id: usize,
    pub start: usize,
    pub end: usize,
    envelope: Rect<f64>,
    expansion: f64,
}

impl MonotoneChain {
    pub fn envelope(&self) -> Rect<f64> {
        self.envelope
    }

    /// Envelope expanded by the index's overlap tolerance.
    pub fn query_envelope(&self) -> Rect<f64> {
        envelope_expand(&self.envelope, self.expansion)
    }

    /// Calls `action(i, j)` for each pair of segments, `i` in this chain and
    /// `j` in `other`, whose envelopes overlap (within `tolerance`).
    ///
    /// Both index ranges are bisected recursively, pruning on envelope
    /// disjointness, until each range spans at most `leaf_size` segments.
    pub fn compute_overlaps<F>(
        &self,
        coords: &[Coord<f64>],
        other: &MonotoneChain,
        other_coords: &[Coord<f64>],
        tolerance: f64,
        leaf_size: usize,
        action: &mut F,
    ) where
        F: FnMut(usize, usize),
    {
        let ctx = OverlapContext {
            p: coords,
            q: other_coords,
            tolerance,
            leaf_size: leaf_size.max(1),
        };
        ctx.overlaps(self.start, self.end, other.start, other.end, action);
    }
}

struct OverlapContext<'a> {
    p: &'a [Coord<f64>],
    q: &'a [Coord<f64>],
    tolerance: f64,
    leaf_size: usize,
}

impl OverlapContext<'_> {
    fn ranges_overlap(&self, start0: usize, end0: usize, start1: usize, end1: usize) -> bool {
        let (p1, p2, q1, q2) = (self.p[start0], self.p[end0], self.q[start1], self.q[end1]);
        if self.tolerance <= 0.0 {
            return segment_envelopes_intersect(p1, p2, q1, q2);
        }
        let tol = self.tolerance;
        let max_q = q1.x.max(q2.x);
        let min_p = p1.x.min(p2.x);
        if min_p > max_q + tol {
            return false;
        }
        let min_q = q1.x.min(q2.x);
        let max_p = p1.x.max(p2.x);
        if max_p < min_q - tol {
            return false;
        }
        let max_q = q1.y.max(q2.y);
        let min_p = p1.y.min(p2.y);
        if min_p > max_q + tol {
            return false;
        }
        let min_q = q1.y.min(q2.y);
        let max_p = p1.y.max(p2.y);
        max_p >= min_q - tol
    }

    fn overlaps<F: FnMut(usize, usize)>(&self, start0: usize, end0: usize, start1: usize, end1: usize, action: &mut F) {
        if !self.ranges_overlap(start0, end0, start1, end1) {
            return;
        }
        if end0 - start0 <= self.leaf_size && end1 - start1 <= self.leaf_size {
            for i in start0..end0 {
                for j in start1..end1 {
                    if end0 - start0 == 1 && end1 - start1 == 1 || self.ranges_overlap(i, i + 1, j, j + 1) {
                        action(i, j);
                    }
                }
            }
            return;
        }
        let mid0 = (start0 + end0) / 2;
        let mid1 = (start1 + end1) / 2;
        // a range of one segment is not split further
        let halves0: &[(usize, usize)] = if end0 - start0 > 1 { &[(start0, mid0), (mid0, end0)] } else { &[] };
        let halves1: &[(usize, usize)] = if end1 - start1 > 1 { &[(start1, mid1), (mid1, end1)] } else { &[] };
        let whole0 = [(start0, end0)];
        let whole1 = [(start1, end1)];
        let r0 = if halves0.is_empty() { &whole0[..] } else { halves0 };
        let r1 = if halves1.is_empty() { &whole1[..] } else { halves1 };
        for &(s0, e0) in r0 {
            for &(s1, e1) in r1 {
                self.overlaps(s0, e0, s1, e1, action);
            }
        }
    }
}

impl RTreeObject for MonotoneChain {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let env = self.query_envelope();
        AABB::from_corners([env.min().x, env.min().y], [env.max().x, env.max().y])
    }
}

/// Index of the last vertex of the monotone run starting at `start`.
/// Zero-length segments are absorbed into the surrounding run.
fn find_chain_end(pts: &[Coord<f64>], start: usize) -> usize {
    let mut safe_start = start;
    while safe_start < pts.len() - 1 && pts[safe_start] == pts[safe_start + 1] {
        safe_start += 1;
    }
    if safe_start >= pts.len() - 1 {
        return pts.len() - 1;
    }
    let chain_octant = octant_of(pts[safe_start], pts[safe_start + 1]);
    let mut last = start + 1;
    while last < pts.len() {
        if pts[last - 1] != pts[last] && octant_of(pts[last - 1], pts[last]) != chain_octant {
            break;
        }
        last += 1;
    }
    last - 1
}

/// Decomposes a chain's coordinates into monotone chains.
/// `next_id` supplies sequence ids and is advanced past the chains created.
pub fn build_chains(pts: &[Coord<f64>], chain_id: usize, expansion: f64, next_id: &mut usize) -> Vec<MonotoneChain> {
    let mut out = Vec::new();
    if pts.len() < 2 {
        return out;
    }
    let mut start = 0;
    loop {
        let end = find_chain_end(pts, start);
        if let Some(envelope) = envelope_of(&[pts[start], pts[end]]) {
            out.push(MonotoneChain {
                id: *next_id,
                chain_id,
                start,
                end,
                envelope,
                expansion,
            });
            *next_id += 1;
        }
        start = end;
        if start >= pts.len() - 1 {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_chains_split_on_direction_change() {
        let pts = vec![c(0.0, 0.0), c(2.0, 1.0), c(4.0, 2.0), c(5.0, 0.0), c(6.0, -2.0)];
        let mut next_id = 0;
        let chains = build_chains(&pts, 7, 0.0, &mut next_id);
        assert_eq!(chains.len(), 2);
        assert_eq!((chains[0].start, chains[0].end), (0, 2));
        assert_eq!((chains[1].start, chains[1].end), (2, 4));
        assert!(chains.iter().all(|mc| mc.chain_id == 7));
        assert_eq!(next_id, 2);
    }

    #[test]
    fn test_zero_length_segments_absorbed() {
        let pts = vec![c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.5), c(1.0, 0.5), c(2.0, 1.0)];
        let mut next_id = 0;
        let chains = build_chains(&pts, 0, 0.0, &mut next_id);
        assert_eq!(chains.len(), 1);
        assert_eq!((chains[0].start, chains[0].end), (0, 4));
    }

    #[test]
    fn test_overlaps_find_crossing_segments() {
        let p = vec![c(0.0, 0.0), c(1.0, 0.1), c(2.0, 0.2), c(3.0, 0.3), c(4.0, 0.4)];
        let q = vec![c(2.5, -1.0), c(2.5, 1.0)];
        let mut id = 0;
        let mp = build_chains(&p, 0, 0.0, &mut id);
        let mq = build_chains(&q, 1, 0.0, &mut id);
        let mut pairs = Vec::new();
        mp[0].compute_overlaps(&p, &mq[0], &q, 0.0, 1, &mut |i, j| pairs.push((i, j)));
        assert_eq!(pairs, vec![(2, 0)]);
    }
}
