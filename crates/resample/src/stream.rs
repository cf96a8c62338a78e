//! Per-stream state carried between processing calls.
//!
//! The caller owns both buffers. Before every call it fills
//! `input[write_offset..input_capacity]` with fresh samples; after the call
//! the samples the next block still needs are slid to the head of `input`
//! and the write offset moves to just past them.

use crate::error::{ResampleError, Result};
use crate::fixed::{FixedStep, FixedTime, MAX_SAMPLES};
use crate::kernel;
use crate::{ResamplerConfig, Sample, MIN_EDGE_PAD};

/// Moves `buffer[from..]` to the start of `buffer` and returns how many
/// samples were kept. The ranges may overlap.
#[inline]
pub fn retain_tail(buffer: &mut [Sample], from: usize) -> usize {
    let from = from.min(buffer.len());
    buffer.copy_within(from.., 0);
    buffer.len() - from
}

/// Streaming linear resampler for a single channel.
#[derive(Clone, Debug)]
pub struct Resampler {
    time: FixedTime,
    edge_pad: usize,
    block_samples: usize,
    input_capacity: usize,
    output_capacity: usize,
    write_offset: usize,
    drift: isize,
    factor: f64,
    blocks_processed: u64,
    samples_produced: u64,
}

impl Resampler {
    /// Sizes a resampler that produces roughly `output_block_size` samples
    /// per call at `factor` (output rate over input rate).
    pub fn new(output_block_size: usize, factor: f64) -> Result<Self> {
        Self::from_config(&ResamplerConfig::new(output_block_size, factor))
    }

    pub fn from_config(config: &ResamplerConfig) -> Result<Self> {
        let ResamplerConfig {
            output_block_size,
            factor,
            edge_pad,
        } = *config;

        if edge_pad < MIN_EDGE_PAD {
            return Err(ResampleError::EdgePadTooSmall(edge_pad));
        }
        if output_block_size == 0 {
            return Err(ResampleError::EmptyBlock);
        }
        let step = checked_step(factor, edge_pad)?;

        let block_len = output_block_size as f64 / factor;
        if block_len >= MAX_SAMPLES as f64 {
            return Err(ResampleError::CapacityOverflow(block_len as usize));
        }
        let block_samples = block_len as usize;
        if block_samples == 0 {
            return Err(ResampleError::BlockTooSmall {
                output_block_size,
                factor,
            });
        }
        let input_capacity = edge_pad
            .checked_mul(2)
            .and_then(|pads| pads.checked_add(block_samples))
            .ok_or(ResampleError::CapacityOverflow(usize::MAX))?;
        if input_capacity >= MAX_SAMPLES {
            return Err(ResampleError::CapacityOverflow(input_capacity));
        }
        let output_capacity = ((block_samples as f64 * factor).ceil() as usize + 1)
            .max(kernel::required_output(step, block_samples));

        tracing::debug!(
            output_block_size,
            factor,
            edge_pad,
            block_samples,
            input_capacity,
            output_capacity,
            "resampler configured"
        );

        Ok(Self {
            time: FixedTime::from_samples(edge_pad),
            edge_pad,
            block_samples,
            input_capacity,
            output_capacity,
            write_offset: edge_pad,
            drift: 0,
            factor,
            blocks_processed: 0,
            samples_produced: 0,
        })
    }

    /// Returns the resampler to the state it had right after construction.
    pub fn reset(&mut self) {
        self.time = FixedTime::from_samples(self.edge_pad);
        self.write_offset = self.edge_pad;
        self.drift = 0;
        self.blocks_processed = 0;
        self.samples_produced = 0;
    }

    /// Zeroes the leading guard samples; call once before the first block.
    pub fn prime(&self, input: &mut [Sample]) -> Result<()> {
        self.check_input(input)?;
        input[..self.edge_pad].fill(0);
        Ok(())
    }

    /// Region of `input` the caller must fill before the next [`process`](Self::process).
    pub fn write_region<'a>(&self, input: &'a mut [Sample]) -> Result<&'a mut [Sample]> {
        self.check_input(input)?;
        Ok(&mut input[self.write_offset..self.input_capacity])
    }

    /// Output length [`process`](Self::process) needs when called with `factor`.
    pub fn required_output_len(&self, factor: f64) -> Result<usize> {
        let step = checked_step(factor, self.edge_pad)?;
        Ok(kernel::required_output(step, self.block_samples))
    }

    /// Resamples one block and prepares `input` for the next one.
    ///
    /// Returns the number of samples written to the front of `output`. On
    /// error nothing is read or written and the state is unchanged.
    pub fn process(
        &mut self,
        input: &mut [Sample],
        output: &mut [Sample],
        factor: f64,
    ) -> Result<usize> {
        let step = checked_step(factor, self.edge_pad)?;
        self.check_input(input)?;
        let required = kernel::required_output(step, self.block_samples);
        if output.len() < required {
            return Err(ResampleError::OutputTooSmall {
                required,
                actual: output.len(),
            });
        }

        let input = &mut input[..self.input_capacity];
        let produced = kernel::interpolate(input, output, &mut self.time, step, self.block_samples);

        self.time.rewind(self.block_samples);
        self.drift = self.time.integer_part() as isize - self.edge_pad as isize;
        if self.drift > 0 {
            self.time.rewind(self.drift as usize);
        } else if self.drift < 0 {
            self.time.advance(self.drift.unsigned_abs());
        }

        let consumed = (self.block_samples as isize + self.drift) as usize;
        self.write_offset = retain_tail(input, consumed);

        self.blocks_processed += 1;
        self.samples_produced += produced as u64;
        tracing::trace!(
            block = self.blocks_processed,
            produced,
            drift = self.drift,
            write_offset = self.write_offset,
            "resampled block"
        );

        Ok(produced)
    }

    fn check_input(&self, input: &[Sample]) -> Result<()> {
        if input.len() < self.input_capacity {
            return Err(ResampleError::InputTooSmall {
                required: self.input_capacity,
                actual: input.len(),
            });
        }
        Ok(())
    }

    pub fn time(&self) -> FixedTime {
        self.time
    }

    pub fn edge_pad(&self) -> usize {
        self.edge_pad
    }

    /// Fresh input samples consumed per call, before drift correction.
    pub fn block_samples(&self) -> usize {
        self.block_samples
    }

    pub fn input_capacity(&self) -> usize {
        self.input_capacity
    }

    pub fn output_capacity(&self) -> usize {
        self.output_capacity
    }

    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// Whole samples of overshoot folded into the last buffer shift.
    pub fn drift(&self) -> isize {
        self.drift
    }

    /// Factor the buffers were sized for.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn blocks_processed(&self) -> u64 {
        self.blocks_processed
    }

    pub fn samples_produced(&self) -> u64 {
        self.samples_produced
    }
}

fn checked_step(factor: f64, edge_pad: usize) -> Result<FixedStep> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ResampleError::InvalidFactor(factor));
    }
    match FixedStep::from_factor(factor) {
        Some(step) if step.ceil_samples() <= edge_pad => Ok(step),
        _ => Err(ResampleError::FactorOutOfRange { factor, edge_pad }),
    }
}
