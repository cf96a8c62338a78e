use thiserror::Error;

/// Errors reported when configuring or driving a [`Resampler`](crate::Resampler).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResampleError {
    #[error("resampling factor {0} must be finite and positive")]
    InvalidFactor(f64),
    #[error(
        "resampling factor {factor} steps more than {edge_pad} samples per output, the edge padding"
    )]
    FactorOutOfRange { factor: f64, edge_pad: usize },
    #[error("output block size must be non-zero")]
    EmptyBlock,
    #[error("output block of {output_block_size} samples at factor {factor} consumes no input")]
    BlockTooSmall {
        output_block_size: usize,
        factor: f64,
    },
    #[error("edge padding of {0} samples is below the minimum of {min}", min = crate::MIN_EDGE_PAD)]
    EdgePadTooSmall(usize),
    #[error("input capacity of {0} samples exceeds the fixed-point time range")]
    CapacityOverflow(usize),
    #[error("input buffer holds {actual} samples, {required} required")]
    InputTooSmall { required: usize, actual: usize },
    #[error("output buffer holds {actual} samples, {required} required")]
    OutputTooSmall { required: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ResampleError>;
