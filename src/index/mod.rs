//! Spatial indexing of segment chains by monotone decomposition.

pub mod chain_index;
pub mod monotone_chain;

pub use chain_index::MonotoneChainIndex;
pub use monotone_chain::MonotoneChain;

use crate::noding::{ChainSegment, SegmentChain, SegmentIntersector};

/// Feeds every overlapping segment pair of two monotone chains to `intersector`.
/// Returns `false` if the intersector asked to stop.
pub(crate) fn process_chain_overlaps<S, I>(
    a: &MonotoneChain,
    chains_a: &[S],
    b: &MonotoneChain,
    chains_b: &[S],
    tolerance: f64,
    leaf_size: usize,
    intersector: &mut I,
) -> bool
where
    S: SegmentChain,
    I: SegmentIntersector<S> + ?Sized,
{
    let ca = &chains_a[a.chain_id];
    let cb = &chains_b[b.chain_id];
    let mut done = intersector.is_done();
    if done {
        return false;
    }
    a.compute_overlaps(ca.coords(), b, cb.coords(), tolerance, leaf_size, &mut |i, j| {
        if done {
            return;
        }
        intersector.process_intersections(ChainSegment::new(ca, a.chain_id, i), ChainSegment::new(cb, b.chain_id, j));
        done = intersector.is_done();
    });
    !done
}
