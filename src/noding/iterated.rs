use crate::error::{RelateError, Result};
use crate::noding::mc_index::McIndexNoder;
use crate::noding::segment_string::SegmentString;
use crate::noding::simple::SimpleNoder;
use crate::noding::Noder;

pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// A noder that reports how many interior intersections its last pass found.
pub trait CountingNoder: Noder {
    fn num_interior_intersections(&self) -> usize;
}

impl CountingNoder for McIndexNoder {
    fn num_interior_intersections(&self) -> usize {
        self.intersection_adder().num_interior_intersections
    }
}

impl CountingNoder for SimpleNoder {
    fn num_interior_intersections(&self) -> usize {
        self.intersection_adder().num_interior_intersections
    }
}

/// Re-nodes its output until no interior intersections remain.
///
/// A single floating-point noding pass can create new intersections where
/// computed split points fall just off their segments. Each pass runs the
/// pass noder (indexed by default) over the previous output. Noding fails
/// with [`RelateError::Convergence`] once the iteration ceiling has been
/// passed and the number of interior intersections has stopped decreasing.
#[derive(Debug)]
pub struct IteratedNoder<N = McIndexNoder> {
    pub max_iterations: usize,
    noder: N,
    noded: Vec<SegmentString>,
    iterations: usize,
}

impl Default for IteratedNoder {
    fn default() -> Self {
        Self::with_noder(McIndexNoder::new())
    }
}

impl IteratedNoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: CountingNoder> IteratedNoder<N> {
    /// Iterates `noder` instead of the default indexed noder.
    pub fn with_noder(noder: N) -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            noder,
            noded: Vec::new(),
            iterations: 0,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Number of passes made by the last call to [`Noder::compute_nodes`].
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// One pass, returning the output and its interior intersection count.
    fn node_once(&mut self, chains: Vec<SegmentString>) -> Result<(Vec<SegmentString>, usize)> {
        self.noder.compute_nodes(chains)?;
        let count = self.noder.num_interior_intersections();
        Ok((self.noder.take_noded_substrings(), count))
    }
}

impl<N: CountingNoder> Noder for IteratedNoder<N> {
    fn compute_nodes(&mut self, chains: Vec<SegmentString>) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(RelateError::InvalidConfiguration(
                "max iterations must be at least 1".to_string(),
            ));
        }
        let mut current = chains;
        let mut last_count: Option<usize> = None;
        self.iterations = 0;
        loop {
            let (noded, count) = self.node_once(current)?;
            current = noded;
            self.iterations += 1;
            log::debug!("noding pass {}: {} interior intersections", self.iterations, count);
            if let Some(last) = last_count {
                if last > 0 && count >= last && self.iterations > self.max_iterations {
                    return Err(RelateError::Convergence {
                        iterations: self.iterations,
                    });
                }
            }
            last_count = Some(count);
            if count == 0 {
                break;
            }
        }
        self.noded = current;
        Ok(())
    }

    fn take_noded_substrings(&mut self) -> Vec<SegmentString> {
        std::mem::take(&mut self.noded)
    }
}
