use crate::Sample;

/// Converts a wide accumulator back into a sample.
///
/// Rounds by adding half an output LSB before shifting right by `shift` bits,
/// then saturates into the `i16` range.
#[inline]
pub fn quantize(value: i32, shift: u32) -> Sample {
    let shift = shift.min(63);
    let bias = if shift == 0 { 0 } else { 1i64 << (shift - 1) };
    let shifted = (i64::from(value) + bias) >> shift;
    shifted.clamp(i64::from(Sample::MIN), i64::from(Sample::MAX)) as Sample
}
