#![no_main]

use harmoniq_resample::{Resampler, Sample};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let block = usize::from(u16::from_le_bytes([data[0], data[1]]) % 1024) + 1;
    let factor = 0.1 + f64::from(data[2]) / 16.0;
    let per_call_jitter = f64::from(data[3] as i8) / 4096.0;
    let Ok(mut resampler) = Resampler::new(block, factor) else {
        return;
    };

    let mut input = vec![0 as Sample; resampler.input_capacity()];
    let mut output = vec![0 as Sample; resampler.output_capacity() * 2];
    let mut samples = data[4..]
        .chunks_exact(2)
        .map(|pair| Sample::from_le_bytes([pair[0], pair[1]]));

    for call in 0..32 {
        let Ok(region) = resampler.write_region(&mut input) else {
            return;
        };
        for slot in region {
            *slot = samples.next().unwrap_or(0);
        }
        let call_factor = if call % 2 == 0 { factor } else { factor + per_call_jitter };
        if resampler.process(&mut input, &mut output, call_factor).is_ok() {
            assert_eq!(resampler.time().integer_part(), resampler.edge_pad());
        }
    }
});
