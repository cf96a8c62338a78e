//! Binary-point convention shared by the interpolation kernel and the stream
//! bookkeeping.
//!
//! A [`FixedTime`] is a position in the input buffer: the bits above
//! [`FRAC_BITS`] index a sample, the low bits are the offset towards the next
//! sample. The fraction is further split into a coarse table index and an
//! interpolation fraction, although the linear kernel only uses the combined
//! value.

use core::ops::{Add, AddAssign};

/// Bits of the fraction used as a coarse table index.
pub const COARSE_BITS: u32 = 8;
/// Bits of the fraction used for interpolation between coarse entries.
pub const INTERP_BITS: u32 = 7;
/// Bits to the right of the binary point.
pub const FRAC_BITS: u32 = COARSE_BITS + INTERP_BITS;

/// One whole sample in fixed-point units.
pub const ONE: u32 = 1 << FRAC_BITS;
pub const FRAC_MASK: u32 = ONE - 1;
pub const COARSE_MASK: u32 = (1 << COARSE_BITS) - 1;
pub const INTERP_MASK: u32 = (1 << INTERP_BITS) - 1;

/// Largest sample index a [`FixedTime`] can address.
pub const MAX_SAMPLES: usize = (u32::MAX >> FRAC_BITS) as usize;

/// Fixed-point read position into an input buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedTime(u32);

impl FixedTime {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Position of the start of sample `index`.
    ///
    /// Panics in debug builds when `index` exceeds [`MAX_SAMPLES`].
    #[inline]
    pub fn from_samples(index: usize) -> Self {
        debug_assert!(index <= MAX_SAMPLES);
        Self((index as u32) << FRAC_BITS)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index of the sample at or before this position.
    #[inline]
    pub const fn integer_part(self) -> usize {
        (self.0 >> FRAC_BITS) as usize
    }

    /// Offset past [`integer_part`](Self::integer_part), in `[0, ONE)`.
    #[inline]
    pub const fn fractional_part(self) -> u32 {
        self.0 & FRAC_MASK
    }

    #[inline]
    pub const fn coarse_index(self) -> u32 {
        (self.fractional_part() >> INTERP_BITS) & COARSE_MASK
    }

    #[inline]
    pub const fn interp_fraction(self) -> u32 {
        self.0 & INTERP_MASK
    }

    /// Moves the position `samples` whole samples earlier.
    #[inline]
    pub fn rewind(&mut self, samples: usize) {
        let delta = Self::from_samples(samples).0;
        debug_assert!(delta <= self.0, "fixed-point time rewound past zero");
        self.0 -= delta;
    }

    /// Moves the position `samples` whole samples later.
    #[inline]
    pub fn advance(&mut self, samples: usize) {
        self.0 += Self::from_samples(samples).0;
    }
}

impl Add<FixedStep> for FixedTime {
    type Output = FixedTime;

    #[inline]
    fn add(self, step: FixedStep) -> FixedTime {
        FixedTime(self.0 + step.0)
    }
}

impl AddAssign<FixedStep> for FixedTime {
    #[inline]
    fn add_assign(&mut self, step: FixedStep) {
        self.0 += step.0;
    }
}

/// Distance the read position moves per output sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedStep(u32);

impl FixedStep {
    /// Converts a resampling factor (output rate over input rate) into its
    /// fixed-point step, `round(2^FRAC_BITS / factor)`.
    ///
    /// Returns `None` when the factor is not a positive finite number or the
    /// rounded step does not fit in a non-zero `u32`.
    pub fn from_factor(factor: f64) -> Option<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return None;
        }
        let step = (f64::from(ONE) / factor + 0.5).floor();
        if step < 1.0 || step > f64::from(u32::MAX) {
            return None;
        }
        Some(Self(step as u32))
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whole samples a single step can skip, rounded up.
    #[inline]
    pub const fn ceil_samples(self) -> usize {
        self.0.div_ceil(ONE) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_splits_into_coarse_and_interp() {
        assert_eq!(FRAC_BITS, 15);
        let time = FixedTime::from_raw((3 << FRAC_BITS) | (0xAB << INTERP_BITS) | 0x55);
        assert_eq!(time.integer_part(), 3);
        assert_eq!(time.coarse_index(), 0xAB);
        assert_eq!(time.interp_fraction(), 0x55);
        assert_eq!(
            time.fractional_part(),
            (time.coarse_index() << INTERP_BITS) | time.interp_fraction()
        );
    }

    #[test]
    fn step_rounds_to_nearest() {
        assert_eq!(FixedStep::from_factor(1.0).unwrap().raw(), ONE);
        assert_eq!(FixedStep::from_factor(2.0).unwrap().raw(), ONE / 2);
        // 32768 / 1.01 = 32443.56..., truncation would give 32443
        assert_eq!(FixedStep::from_factor(1.01).unwrap().raw(), 32444);
        // 32768 / 3 = 10922.67
        assert_eq!(FixedStep::from_factor(3.0).unwrap().raw(), 10923);
    }

    #[test]
    fn step_rejects_unusable_factors() {
        assert!(FixedStep::from_factor(0.0).is_none());
        assert!(FixedStep::from_factor(-1.0).is_none());
        assert!(FixedStep::from_factor(f64::NAN).is_none());
        assert!(FixedStep::from_factor(f64::INFINITY).is_none());
        assert!(FixedStep::from_factor(1.0e9).is_none());
    }

    #[test]
    fn rewind_and_advance_move_whole_samples() {
        let mut time = FixedTime::from_samples(10) + FixedStep::from_raw(123);
        time.advance(5);
        assert_eq!(time.integer_part(), 15);
        time.rewind(12);
        assert_eq!(time.integer_part(), 3);
        assert_eq!(time.fractional_part(), 123);
    }

    #[test]
    fn ceil_samples_counts_partial_steps() {
        assert_eq!(FixedStep::from_raw(ONE).ceil_samples(), 1);
        assert_eq!(FixedStep::from_raw(ONE + 1).ceil_samples(), 2);
        assert_eq!(FixedStep::from_raw(ONE / 2).ceil_samples(), 1);
    }
}
