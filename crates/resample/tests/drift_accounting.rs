use harmoniq_resample::fixed::FRAC_BITS;
use harmoniq_resample::{FixedStep, Resampler, Sample};
use proptest::prelude::*;

proptest! {
    #[test]
    fn read_position_tracks_every_step(
        block in 16usize..512,
        factor in 0.2f64..4.0,
        samples in prop::collection::vec(any::<i16>(), 64..2048),
        calls in 1usize..48,
    ) {
        let mut resampler = Resampler::new(block, factor).unwrap();
        let step = FixedStep::from_factor(factor).unwrap();
        let capacity = resampler.input_capacity();
        let edge_pad = resampler.edge_pad();
        let mut input = vec![0 as Sample; capacity];
        let mut output = vec![0 as Sample; resampler.output_capacity()];
        resampler.prime(&mut input).unwrap();

        let mut source = samples.iter().copied().cycle();
        let mut consumed = 0u64;
        let mut produced = 0u64;
        for _ in 0..calls {
            for slot in resampler.write_region(&mut input).unwrap() {
                *slot = source.next().unwrap_or(0);
            }
            let n = resampler.process(&mut input, &mut output, factor).unwrap();
            prop_assert!(n <= output.len());
            prop_assert!(resampler.drift() >= 0);
            prop_assert!(resampler.drift() as usize <= step.ceil_samples());
            prop_assert_eq!(resampler.time().integer_part(), edge_pad);

            consumed += (capacity - resampler.write_offset()) as u64;
            produced += n as u64;
            let cursor = (consumed << FRAC_BITS) + u64::from(resampler.time().raw())
                - ((edge_pad as u64) << FRAC_BITS);
            prop_assert_eq!(cursor, produced * u64::from(step.raw()));
        }
        prop_assert_eq!(resampler.blocks_processed(), calls as u64);
        prop_assert_eq!(resampler.samples_produced(), produced);
    }

    #[test]
    fn upsampling_keeps_drift_within_one_sample(
        factor in 1.0f64..1.1,
        calls in 1usize..200,
    ) {
        let mut resampler = Resampler::new(128, factor).unwrap();
        let mut input = vec![0 as Sample; resampler.input_capacity()];
        let mut output = vec![0 as Sample; resampler.output_capacity()];
        for _ in 0..calls {
            resampler.process(&mut input, &mut output, factor).unwrap();
            prop_assert!((-1..=1).contains(&resampler.drift()));
        }
    }
}
