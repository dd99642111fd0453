use crate::error::Result;
use crate::noding::segment_string::SegmentString;
use crate::noding::Noder;

/// Splits chains into their individual segments without computing any
/// intersections. Suited to input that is already fully noded, such as
/// valid polygonal coverages.
#[derive(Debug, Default)]
pub struct SegmentExtractingNoder {
    segments: Vec<SegmentString>,
}

impl SegmentExtractingNoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Noder for SegmentExtractingNoder {
    fn compute_nodes(&mut self, chains: Vec<SegmentString>) -> Result<()> {
        self.segments = chains
            .iter()
            .flat_map(|chain| {
                chain
                    .coords
                    .windows(2)
                    .map(move |w| SegmentString::new(vec![w[0], w[1]], chain.context))
            })
            .collect();
        Ok(())
    }

    fn take_noded_substrings(&mut self) -> Vec<SegmentString> {
        std::mem::take(&mut self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Coord;

    #[test]
    fn test_explodes_into_segments() {
        let pts: Vec<Coord<f64>> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect();
        let out = SegmentExtractingNoder::new()
            .node(vec![SegmentString::new(pts.clone(), 4)])
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].coords, vec![pts[1], pts[2]]);
        assert!(out.iter().all(|s| s.context == 4));
    }
}
