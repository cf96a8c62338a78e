use serde::{Deserialize, Serialize};

use crate::DEFAULT_EDGE_PAD;

/// Settings a [`Resampler`](crate::Resampler) is sized from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResamplerConfig {
    /// Nominal number of output samples per processed block.
    pub output_block_size: usize,
    /// Output rate divided by input rate.
    pub factor: f64,
    /// Guard samples kept at each side of the input window.
    pub edge_pad: usize,
}

impl ResamplerConfig {
    pub fn new(output_block_size: usize, factor: f64) -> Self {
        Self {
            output_block_size,
            factor,
            ..Self::default()
        }
    }

    pub fn with_edge_pad(mut self, edge_pad: usize) -> Self {
        self.edge_pad = edge_pad;
        self
    }
}

impl Default for ResamplerConfig {
    fn default() -> Self {
        Self {
            output_block_size: 128,
            factor: 1.0,
            edge_pad: DEFAULT_EDGE_PAD,
        }
    }
}
