use geo_types::{Coord, Line};

use crate::algorithm::SegmentIntersection;
use crate::error::{RelateError, Result};
use crate::noding::segment_string::SegmentString;
use crate::noding::{process_all_pairs, ChainSegment, Noder, SegmentChain, SegmentIntersector};

/// An interior intersection found between two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteriorIntersection {
    pub point: Coord<f64>,
    pub segment_a: Line<f64>,
    pub segment_b: Line<f64>,
}

impl From<InteriorIntersection> for RelateError {
    fn from(found: InteriorIntersection) -> Self {
        RelateError::NonNodedIntersection {
            segment_a: found.segment_a,
            segment_b: found.segment_b,
            point: found.point,
        }
    }
}

/// Finds intersections lying in the interior of a segment, which show
/// that a set of chains is not fully noded.
///
/// By default stops at the first one found.
#[derive(Debug, Default)]
pub struct NodingIntersectionFinder {
    find_all: bool,
    check_end_segments_only: bool,
    found: Vec<InteriorIntersection>,
    pub num_tests: usize,
}

impl NodingIntersectionFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finder that records every interior intersection.
    pub fn find_all() -> Self {
        Self {
            find_all: true,
            ..Self::default()
        }
    }

    /// Only consider pairs where at least one segment is the first or last of its chain.
    pub fn with_end_segments_only(mut self, only: bool) -> Self {
        self.check_end_segments_only = only;
        self
    }

    pub fn has_intersection(&self) -> bool {
        !self.found.is_empty()
    }

    pub fn count(&self) -> usize {
        self.found.len()
    }

    pub fn first(&self) -> Option<&InteriorIntersection> {
        self.found.first()
    }

    pub fn intersections(&self) -> &[InteriorIntersection] {
        &self.found
    }

    fn is_end_segment<S: SegmentChain>(seg: &ChainSegment<'_, S>) -> bool {
        seg.index == 0 || seg.index + 2 == seg.chain.len()
    }
}

impl<S: SegmentChain> SegmentIntersector<S> for NodingIntersectionFinder {
    fn process_intersections(&mut self, a: ChainSegment<'_, S>, b: ChainSegment<'_, S>) {
        if !self.find_all && self.has_intersection() {
            return;
        }
        if a.is_same_segment(&b) {
            return;
        }
        if self.check_end_segments_only && !Self::is_end_segment(&a) && !Self::is_end_segment(&b) {
            return;
        }
        self.num_tests += 1;
        let Some(li) = SegmentIntersection::compute(a.p0(), a.p1(), b.p0(), b.p1()) else {
            return;
        };
        if li.is_interior_intersection() {
            let point = li
                .points()
                .iter()
                .copied()
                .find(|p| (*p != a.p0() && *p != a.p1()) || (*p != b.p0() && *p != b.p1()))
                .unwrap_or(li.points()[0]);
            self.found.push(InteriorIntersection {
                point,
                segment_a: a.line(),
                segment_b: b.line(),
            });
        }
    }

    fn is_done(&self) -> bool {
        !self.find_all && self.has_intersection()
    }
}

/// Brute-force check that a set of chains is fully noded.
///
/// Reports, in this order: a chain endpoint touching another chain's
/// interior vertex, an intersection in the interior of a segment, and an
/// a-b-a collapse within a chain.
#[derive(Debug)]
pub struct NodingValidator<'a> {
    chains: &'a [SegmentString],
}

impl<'a> NodingValidator<'a> {
    pub fn new(chains: &'a [SegmentString]) -> Self {
        Self { chains }
    }

    pub fn is_valid(&self) -> bool {
        self.check_valid().is_ok()
    }

    pub fn check_valid(&self) -> Result<()> {
        self.check_endpoint_vertex_intersections()?;
        self.check_interior_intersections()?;
        self.check_collapses()
    }

    fn check_endpoint_vertex_intersections(&self) -> Result<()> {
        for chain in self.chains {
            let pts = &chain.coords;
            let Some((&first, &last)) = pts.first().zip(pts.last()) else {
                continue;
            };
            for endpoint in [first, last] {
                for other in self.chains {
                    let interior = other.coords.len().saturating_sub(1);
                    if let Some(index) = (1..interior).find(|&i| other.coords[i] == endpoint) {
                        return Err(RelateError::EndpointOnInterior {
                            point: endpoint,
                            index,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn check_interior_intersections(&self) -> Result<()> {
        let mut finder = NodingIntersectionFinder::new();
        process_all_pairs(self.chains, &mut finder);
        match finder.first() {
            Some(found) => Err((*found).into()),
            None => Ok(()),
        }
    }

    fn check_collapses(&self) -> Result<()> {
        for chain in self.chains {
            if let Some(w) = chain.coords.windows(3).find(|w| w[0] == w[2]) {
                return Err(RelateError::NonNodedCollapse {
                    p0: w[0],
                    p1: w[1],
                    p2: w[2],
                });
            }
        }
        Ok(())
    }
}

/// Wraps a noder and validates its output, turning a noding failure into
/// an error instead of returning incompletely noded chains.
#[derive(Debug)]
pub struct ValidatingNoder<N> {
    noder: N,
    noded: Vec<SegmentString>,
}

impl<N: Noder> ValidatingNoder<N> {
    pub fn new(noder: N) -> Self {
        Self {
            noder,
            noded: Vec::new(),
        }
    }

    pub fn into_inner(self) -> N {
        self.noder
    }
}

impl<N: Noder> Noder for ValidatingNoder<N> {
    fn compute_nodes(&mut self, chains: Vec<SegmentString>) -> Result<()> {
        self.noder.compute_nodes(chains)?;
        let noded = self.noder.take_noded_substrings();
        NodingValidator::new(&noded).check_valid()?;
        self.noded = noded;
        Ok(())
    }

    fn take_noded_substrings(&mut self) -> Vec<SegmentString> {
        std::mem::take(&mut self.noded)
    }
}
