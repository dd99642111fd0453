//! Noding: splitting sets of segment chains so that every intersection
//! between them occurs at a shared endpoint.
//!
//! All noders implement [`Noder`]. Intersection discovery is decoupled from
//! intersection handling through [`SegmentIntersector`], which is invoked
//! for each candidate segment pair found by the brute-force or indexed
//! drivers.

use geo_types::{Coord, Line};

use crate::error::Result;

pub mod boundary_chain;
pub mod intersection_adder;
pub mod iterated;
pub mod mc_index;
pub mod mutual;
pub mod node_list;
pub mod scaled;
pub mod segment_extracting;
pub mod segment_string;
pub mod simple;
pub mod validator;

pub use boundary_chain::BoundaryChainNoder;
pub use intersection_adder::IntersectionAdder;
pub use iterated::{CountingNoder, IteratedNoder};
pub use mc_index::McIndexNoder;
pub use mutual::MutualIntersector;
pub use node_list::{NodeList, SegmentNode};
pub use scaled::ScaledNoder;
pub use segment_extracting::SegmentExtractingNoder;
pub use segment_string::{NodedSegmentString, SegmentString};
pub use simple::SimpleNoder;
pub use validator::{NodingIntersectionFinder, NodingValidator, ValidatingNoder};

/// An ordered run of coordinates that noding and indexing operate on.
pub trait SegmentChain {
    fn coords(&self) -> &[Coord<f64>];

    fn len(&self) -> usize {
        self.coords().len()
    }

    fn is_empty(&self) -> bool {
        self.coords().is_empty()
    }

    fn is_closed(&self) -> bool {
        let pts = self.coords();
        pts.len() > 1 && pts[0] == pts[pts.len() - 1]
    }

    fn segment(&self, index: usize) -> Line<f64> {
        let pts = self.coords();
        Line::new(pts[index], pts[index + 1])
    }
}

/// One segment of a chain, identified by the chain's position in its
/// owning collection and the segment's start index.
#[derive(Clone, Copy, Debug)]
pub struct ChainSegment<'a, S> {
    pub chain: &'a S,
    pub chain_id: usize,
    pub index: usize,
}

impl<'a, S: SegmentChain> ChainSegment<'a, S> {
    pub fn new(chain: &'a S, chain_id: usize, index: usize) -> Self {
        Self { chain, chain_id, index }
    }

    pub fn p0(&self) -> Coord<f64> {
        self.chain.coords()[self.index]
    }

    pub fn p1(&self) -> Coord<f64> {
        self.chain.coords()[self.index + 1]
    }

    pub fn line(&self) -> Line<f64> {
        self.chain.segment(self.index)
    }

    /// Tests whether both refer to the same segment of the same chain.
    pub fn is_same_segment(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.index == other.index
    }
}

/// Processes candidate segment pairs found by a noding driver.
pub trait SegmentIntersector<S> {
    fn process_intersections(&mut self, a: ChainSegment<'_, S>, b: ChainSegment<'_, S>);

    /// Lets the driver stop early once the intersector has all it needs.
    fn is_done(&self) -> bool {
        false
    }
}

/// Computes all intersections between a set of chains and splits them at
/// the intersection points.
pub trait Noder {
    fn compute_nodes(&mut self, chains: Vec<SegmentString>) -> Result<()>;

    /// Returns the noded chains computed by the last [`Noder::compute_nodes`]
    /// call, leaving the noder empty.
    fn take_noded_substrings(&mut self) -> Vec<SegmentString>;

    /// Convenience wrapper running both steps.
    fn node(&mut self, chains: Vec<SegmentString>) -> Result<Vec<SegmentString>> {
        self.compute_nodes(chains)?;
        Ok(self.take_noded_substrings())
    }
}

impl<N: Noder + ?Sized> Noder for Box<N> {
    fn compute_nodes(&mut self, chains: Vec<SegmentString>) -> Result<()> {
        (**self).compute_nodes(chains)
    }

    fn take_noded_substrings(&mut self) -> Vec<SegmentString> {
        (**self).take_noded_substrings()
    }
}

/// Runs `intersector` over every pair of segments in `chains` (including
/// pairs within one chain), stopping once it reports done.
pub fn process_all_pairs<S, I>(chains: &[S], intersector: &mut I)
where
    S: SegmentChain,
    I: SegmentIntersector<S> + ?Sized,
{
    for (i0, c0) in chains.iter().enumerate() {
        for (i1, c1) in chains.iter().enumerate().skip(i0) {
            for s0 in 0..c0.len().saturating_sub(1) {
                let start = if i0 == i1 { s0 } else { 0 };
                for s1 in start..c1.len().saturating_sub(1) {
                    intersector.process_intersections(ChainSegment::new(c0, i0, s0), ChainSegment::new(c1, i1, s1));
                    if intersector.is_done() {
                        return;
                    }
                }
            }
        }
    }
}
