//! Linear interpolation over a padded input block.

use crate::fixed::{FixedStep, FixedTime, FRAC_BITS, ONE};
use crate::quantize::quantize;
use crate::Sample;

/// Upper bound on the number of outputs [`interpolate`] produces for
/// `sample_count` input samples at the given step.
#[inline]
pub fn required_output(step: FixedStep, sample_count: usize) -> usize {
    let span = (sample_count as u64) << FRAC_BITS;
    span.div_ceil(u64::from(step.raw())) as usize
}

/// Interpolates between adjacent input samples until `time` has moved
/// `sample_count` samples forward, writing one output per `step`.
///
/// Returns the number of samples written. `time` is left on the first
/// position past the block. `input` must hold valid samples up to one past
/// the last position reached and `output` must hold at least
/// [`required_output`] samples; otherwise this panics.
pub fn interpolate(
    input: &[Sample],
    output: &mut [Sample],
    time: &mut FixedTime,
    step: FixedStep,
    sample_count: usize,
) -> usize {
    let mut end = *time;
    end.advance(sample_count);

    let mut produced = 0;
    while *time < end {
        let frac = time.fractional_part() as i32;
        let idx = time.integer_part();
        let x1 = i32::from(input[idx]);
        let x2 = i32::from(input[idx + 1]);
        let v = x1 * (ONE as i32 - frac) + x2 * frac;
        output[produced] = quantize(v, FRAC_BITS);
        produced += 1;
        *time += step;
    }
    produced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_step_copies_input() {
        let input = [0, 10, -20, 30, 40, 50];
        let mut output = [0; 4];
        let mut time = FixedTime::from_samples(1);
        let n = interpolate(&input, &mut output, &mut time, FixedStep::from_raw(ONE), 4);
        assert_eq!(n, 4);
        assert_eq!(output, [10, -20, 30, 40]);
        assert_eq!(time, FixedTime::from_samples(5));
    }

    #[test]
    fn half_step_inserts_midpoints() {
        let input = [0, 100, 200, 301, 0];
        let mut output = [0; 6];
        let mut time = FixedTime::from_samples(1);
        let n = interpolate(&input, &mut output, &mut time, FixedStep::from_raw(ONE / 2), 3);
        assert_eq!(n, 6);
        // 250.5 rounds up
        assert_eq!(output, [100, 150, 200, 251, 301, 151]);
    }

    #[test]
    fn fractional_start_interpolates_first_output() {
        let input = [0, 1000, 2000, 3000];
        let mut output = [0; 2];
        let mut time = FixedTime::from_samples(1) + FixedStep::from_raw(ONE / 4);
        let n = interpolate(&input, &mut output, &mut time, FixedStep::from_raw(ONE), 2);
        assert_eq!(n, 2);
        assert_eq!(output, [1250, 2250]);
    }

    #[test]
    fn full_scale_neighbours_do_not_overflow() {
        let input = [Sample::MIN, Sample::MIN, Sample::MAX, Sample::MAX];
        let mut output = [0; 8];
        let mut time = FixedTime::from_samples(0);
        let n = interpolate(&input, &mut output, &mut time, FixedStep::from_raw(ONE / 3), 2);
        assert_eq!(n, required_output(FixedStep::from_raw(ONE / 3), 2));
        assert_eq!(output[0], Sample::MIN);
        assert!(output[..n].windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(output[n - 1], 32_759);
    }

    #[test]
    fn required_output_bounds_produced_count() {
        for raw in [ONE / 3, ONE - 1, ONE, ONE + 7, 3 * ONE] {
            let step = FixedStep::from_raw(raw);
            let input = vec![0; 200];
            let mut output = vec![0; required_output(step, 64)];
            let mut time = FixedTime::from_samples(2);
            let n = interpolate(&input, &mut output, &mut time, step, 64);
            assert!(n <= output.len());
            assert!(n + 1 >= output.len());
        }
    }
}
