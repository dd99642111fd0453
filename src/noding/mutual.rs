use geo_types::Rect;

use crate::error::Result;
use crate::index::monotone_chain::build_chains;
use crate::index::{process_chain_overlaps, MonotoneChainIndex};
use crate::noding::mc_index::validate_tolerance;
use crate::noding::{SegmentChain, SegmentIntersector};

/// Finds intersections between a fixed base set of chains and any number
/// of query sets.
///
/// The base set is indexed once at construction. The intersector is
/// read-only afterwards, so one instance can serve many query sets,
/// including from several threads.
#[derive(Debug)]
pub struct MutualIntersector<S> {
    base: Vec<S>,
    index: MonotoneChainIndex,
}

impl<S: SegmentChain> MutualIntersector<S> {
    pub fn new(base: Vec<S>) -> Self {
        let index = MonotoneChainIndex::build(&base, 0.0);
        Self { base, index }
    }

    /// Indexes only the parts of `base` meeting `envelope`, expanding
    /// envelopes by `tolerance` when comparing.
    pub fn with_envelope(base: Vec<S>, envelope: Option<&Rect<f64>>, tolerance: f64) -> Result<Self> {
        validate_tolerance(tolerance)?;
        let index = MonotoneChainIndex::build_filtered(&base, envelope, tolerance);
        Ok(Self { base, index })
    }

    pub fn base(&self) -> &[S] {
        &self.base
    }

    /// Calls `intersector` for every candidate pair with the query segment
    /// first and the base segment second.
    pub fn process<I>(&self, query: &[S], intersector: &mut I)
    where
        I: SegmentIntersector<S> + ?Sized,
    {
        let tolerance = self.index.tolerance();
        let mut next_id = 0;
        for (chain_id, chain) in query.iter().enumerate() {
            for query_mc in build_chains(chain.coords(), chain_id, tolerance, &mut next_id) {
                for base_mc in self.index.query_chain(&query_mc) {
                    if !process_chain_overlaps(
                        &query_mc,
                        query,
                        base_mc,
                        &self.base,
                        tolerance,
                        self.index.leaf_size(),
                        intersector,
                    ) {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noding::{ChainSegment, SegmentString};
    use geo_types::Coord;

    fn ss(pts: &[(f64, f64)], context: usize) -> SegmentString {
        SegmentString::new(pts.iter().map(|&(x, y)| Coord { x, y }).collect(), context)
    }

    #[derive(Default)]
    struct PairRecorder {
        pairs: Vec<(usize, usize)>,
        stop_after: Option<usize>,
    }

    impl SegmentIntersector<SegmentString> for PairRecorder {
        fn process_intersections(&mut self, a: ChainSegment<'_, SegmentString>, b: ChainSegment<'_, SegmentString>) {
            self.pairs.push((a.chain.context, b.chain.context));
        }

        fn is_done(&self) -> bool {
            self.stop_after.is_some_and(|n| self.pairs.len() >= n)
        }
    }

    #[test]
    fn test_query_segment_comes_first() {
        let base = vec![ss(&[(0.0, 0.0), (10.0, 10.0)], 100)];
        let mi = MutualIntersector::new(base);
        let mut rec = PairRecorder::default();
        mi.process(&[ss(&[(0.0, 10.0), (10.0, 0.0)], 7)], &mut rec);
        assert_eq!(rec.pairs, vec![(7, 100)]);
    }

    #[test]
    fn test_reused_across_queries_and_stops_early() {
        let base = vec![
            ss(&[(0.0, 0.0), (10.0, 0.0)], 0),
            ss(&[(0.0, 5.0), (10.0, 5.0)], 1),
            ss(&[(0.0, 10.0), (10.0, 10.0)], 2),
        ];
        let mi = MutualIntersector::new(base);
        let query = [ss(&[(5.0, -1.0), (5.0, 11.0)], 9)];

        let mut all = PairRecorder::default();
        mi.process(&query, &mut all);
        assert_eq!(all.pairs.len(), 3);

        let mut first = PairRecorder {
            stop_after: Some(1),
            ..Default::default()
        };
        mi.process(&query, &mut first);
        assert_eq!(first.pairs.len(), 1);
    }

    #[test]
    fn test_envelope_filter_skips_distant_base() {
        let base = vec![ss(&[(0.0, 0.0), (1.0, 1.0)], 0), ss(&[(100.0, 0.0), (101.0, 1.0)], 1)];
        let env = Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 2.0, y: 2.0 });
        let mi = MutualIntersector::with_envelope(base, Some(&env), 0.0).unwrap();
        let mut rec = PairRecorder::default();
        mi.process(&[ss(&[(100.0, 1.0), (101.0, 0.0)], 5)], &mut rec);
        assert!(rec.pairs.is_empty());
        assert!(MutualIntersector::with_envelope(Vec::<SegmentString>::new(), None, f64::NAN).is_err());
    }
}
