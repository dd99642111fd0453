use geo_types::Coord;

use crate::error::{RelateError, Result};
use crate::noding::segment_string::SegmentString;
use crate::noding::Noder;

/// Wraps a noder, running it on coordinates rescaled to an integer grid.
///
/// Input coordinates are mapped to `(c - offset) * scale_factor` rounded
/// half up to the nearest integer before delegating, and the output is mapped back. Rounding can collapse
/// nearby vertices: repeated points are removed and chains reduced to a
/// single point are dropped.
pub struct ScaledNoder {
    noder: Box<dyn Noder + Send>,
    pub scale_factor: f64,
    pub offset: Coord<f64>,
}

// Ties go toward positive infinity, so -0.5 rounds to 0.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

impl ScaledNoder {
    pub fn new(noder: Box<dyn Noder + Send>, scale_factor: f64) -> Self {
        Self {
            noder,
            scale_factor,
            offset: Coord { x: 0.0, y: 0.0 },
        }
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = Coord { x, y };
        self
    }

    fn is_integer_precision(&self) -> bool {
        self.scale_factor == 1.0 && self.offset == Coord { x: 0.0, y: 0.0 }
    }

    fn scale_coord(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: round_half_up((c.x - self.offset.x) * self.scale_factor),
            y: round_half_up((c.y - self.offset.y) * self.scale_factor),
        }
    }

    fn rescale_coord(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: c.x / self.scale_factor + self.offset.x,
            y: c.y / self.scale_factor + self.offset.y,
        }
    }

    fn scale(&self, chains: Vec<SegmentString>) -> Vec<SegmentString> {
        let mut out = Vec::with_capacity(chains.len());
        for chain in chains {
            let mut coords: Vec<Coord<f64>> = chain.coords.iter().map(|c| self.scale_coord(*c)).collect();
            coords.dedup();
            if coords.len() < 2 {
                log::debug!("chain with context {} collapsed to a point when scaled", chain.context);
                continue;
            }
            out.push(SegmentString::new(coords, chain.context));
        }
        out
    }

    fn rescale(&self, chains: &mut [SegmentString]) {
        for chain in chains {
            for c in chain.coords.iter_mut() {
                *c = self.rescale_coord(*c);
            }
        }
    }
}

impl std::fmt::Debug for ScaledNoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaledNoder")
            .field("scale_factor", &self.scale_factor)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Noder for ScaledNoder {
    fn compute_nodes(&mut self, chains: Vec<SegmentString>) -> Result<()> {
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(RelateError::InvalidConfiguration(format!(
                "scale factor must be positive and finite, got {}",
                self.scale_factor
            )));
        }
        let input = if self.is_integer_precision() {
            chains
        } else {
            self.scale(chains)
        };
        self.noder.compute_nodes(input)
    }

    fn take_noded_substrings(&mut self) -> Vec<SegmentString> {
        let mut out = self.noder.take_noded_substrings();
        if !self.is_integer_precision() {
            self.rescale(&mut out);
        }
        out
    }
}
