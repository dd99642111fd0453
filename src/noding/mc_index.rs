use crate::error::{RelateError, Result};
use crate::index::{process_chain_overlaps, MonotoneChainIndex};
use crate::noding::intersection_adder::IntersectionAdder;
use crate::noding::segment_string::{noded_substrings, NodedSegmentString, SegmentString};
use crate::noding::{Noder, SegmentIntersector};

/// Runs `intersector` over every overlapping segment pair of `chains`,
/// using a monotone chain index. Stops as soon as the intersector is done.
pub fn process_indexed<S, I>(chains: &[S], tolerance: f64, intersector: &mut I)
where
    S: crate::noding::SegmentChain,
    I: SegmentIntersector<S> + ?Sized,
{
    let index = MonotoneChainIndex::build(chains, tolerance);
    for (a, b) in index.overlapping_pairs() {
        if !process_chain_overlaps(a, chains, b, chains, tolerance, index.leaf_size(), intersector) {
            return;
        }
    }
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<()> {
    if tolerance.is_nan() || tolerance < 0.0 {
        return Err(RelateError::InvalidConfiguration(format!(
            "overlap tolerance must be a non-negative number, got {tolerance}"
        )));
    }
    Ok(())
}

/// Nodes chains using a monotone chain index to find candidate segment pairs.
#[derive(Debug, Default)]
pub struct McIndexNoder {
    pub overlap_tolerance: f64,
    adder: IntersectionAdder,
    noded: Vec<NodedSegmentString>,
}

impl McIndexNoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands every chain envelope by `tolerance` when finding candidates.
    pub fn with_overlap_tolerance(mut self, tolerance: f64) -> Self {
        self.overlap_tolerance = tolerance;
        self
    }

    pub fn intersection_adder(&self) -> &IntersectionAdder {
        &self.adder
    }

    /// Interior intersections found by the last noding pass.
    pub fn num_interior_intersections(&self) -> usize {
        self.adder.num_interior_intersections
    }
}

impl Noder for McIndexNoder {
    fn compute_nodes(&mut self, chains: Vec<SegmentString>) -> Result<()> {
        validate_tolerance(self.overlap_tolerance)?;
        self.adder = IntersectionAdder::new();
        let mut noded: Vec<NodedSegmentString> = chains.into_iter().map(NodedSegmentString::from).collect();
        process_indexed(&noded, self.overlap_tolerance, &mut self.adder);
        log::trace!(
            "indexed noding: {} tests, {} intersections",
            self.adder.num_tests,
            self.adder.num_intersections
        );
        self.adder.apply_nodes(&mut noded);
        self.noded = noded;
        Ok(())
    }

    fn take_noded_substrings(&mut self) -> Vec<SegmentString> {
        noded_substrings(std::mem::take(&mut self.noded))
    }
}
