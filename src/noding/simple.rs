use crate::error::Result;
use crate::noding::intersection_adder::IntersectionAdder;
use crate::noding::segment_string::{noded_substrings, NodedSegmentString, SegmentString};
use crate::noding::{process_all_pairs, Noder};

/// Nodes chains by comparing every pair of segments.
///
/// O(n²) in the number of segments; intended as a reference implementation
/// and for small inputs.
#[derive(Debug, Default)]
pub struct SimpleNoder {
    adder: IntersectionAdder,
    noded: Vec<NodedSegmentString>,
}

impl SimpleNoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intersection_adder(&self) -> &IntersectionAdder {
        &self.adder
    }
}

impl Noder for SimpleNoder {
    fn compute_nodes(&mut self, chains: Vec<SegmentString>) -> Result<()> {
        self.adder = IntersectionAdder::new();
        let mut noded: Vec<NodedSegmentString> = chains.into_iter().map(NodedSegmentString::from).collect();
        process_all_pairs(&noded, &mut self.adder);
        self.adder.apply_nodes(&mut noded);
        self.noded = noded;
        Ok(())
    }

    fn take_noded_substrings(&mut self) -> Vec<SegmentString> {
        noded_substrings(std::mem::take(&mut self.noded))
    }
}
