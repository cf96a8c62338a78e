use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use harmoniq_resample::{Resampler, ResamplerConfig, Sample};
use tracing_subscriber::EnvFilter;

mod io;

use io::{FileFormat, SampleSink, SampleSource};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resample(args) => {
            let report = execute_resample(&args)?;
            println!(
                "Resampled {} frames into {} frames ({} blocks, factor {})",
                report.frames_in, report.frames_out, report.blocks, report.factor
            );
            println!("  Output: {} ({} Hz)", args.output.display(), report.output_rate);
            Ok(())
        }
        Commands::Sine(args) => {
            let frames = execute_sine(&args)?;
            println!("Wrote {frames} frames of {} Hz to {}", args.frequency, args.output.display());
            Ok(())
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Sample rate conversion tools for Harmoniq Studio")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream a 16-bit PCM file through the fixed-point resampler.
    Resample(ResampleArgs),
    /// Write a sine test tone.
    Sine(SineArgs),
}

#[derive(Args)]
struct ResampleArgs {
    /// Input file (`.wav`, or raw signed 16-bit little-endian PCM).
    #[arg(long)]
    input: PathBuf,
    /// Output file.
    #[arg(long)]
    output: PathBuf,
    /// Resampler settings (JSON). Command line values take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output rate divided by input rate.
    #[arg(long)]
    factor: Option<f64>,
    /// Nominal output samples per block.
    #[arg(long)]
    block_size: Option<usize>,
    /// Output format; defaults to the output file extension.
    #[arg(long, value_enum)]
    format: Option<FileFormat>,
    /// Interleaved channels in raw input.
    #[arg(long, default_value_t = 1)]
    channels: usize,
    /// Sample rate of raw input in Hz.
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
    /// Stop after this many blocks.
    #[arg(long)]
    max_blocks: Option<u64>,
}

#[derive(Args)]
struct SineArgs {
    /// Output file (`.wav`, or raw signed 16-bit little-endian PCM).
    #[arg(long)]
    output: PathBuf,
    #[arg(long, default_value_t = 440.0)]
    frequency: f64,
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,
    /// Peak level relative to full scale.
    #[arg(long, default_value_t = 0.5)]
    amplitude: f64,
}

#[derive(Debug)]
struct ResampleReport {
    frames_in: u64,
    frames_out: u64,
    blocks: u64,
    factor: f64,
    output_rate: u32,
}

/// One resampler and its buffers per channel.
struct Lane {
    resampler: Resampler,
    input: Vec<Sample>,
    output: Vec<Sample>,
}

impl Lane {
    fn new(config: &ResamplerConfig) -> Result<Self> {
        let resampler = Resampler::from_config(config)?;
        let mut input = vec![0; resampler.input_capacity()];
        resampler.prime(&mut input)?;
        let output = vec![0; resampler.output_capacity()];
        Ok(Self {
            resampler,
            input,
            output,
        })
    }
}

fn load_config(path: &Path) -> Result<ResamplerConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("{} is not a valid resampler config", path.display()))
}

fn resolve_config(args: &ResampleArgs) -> Result<ResamplerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ResamplerConfig::default(),
    };
    if let Some(factor) = args.factor {
        config.factor = factor;
    }
    if let Some(block_size) = args.block_size {
        config.output_block_size = block_size;
    }
    Ok(config)
}

fn execute_resample(args: &ResampleArgs) -> Result<ResampleReport> {
    let config = resolve_config(args)?;
    let mut source: Box<dyn SampleSource> =
        io::open_source(&args.input, args.channels, args.sample_rate)?;
    let channels = source.channels();
    ensure!(channels > 0, "{} has no channels", args.input.display());

    let mut lanes = (0..channels)
        .map(|_| Lane::new(&config))
        .collect::<Result<Vec<_>>>()?;

    let output_rate = (f64::from(source.sample_rate()) * config.factor).round() as u32;
    let format = args
        .format
        .unwrap_or_else(|| FileFormat::from_path(&args.output));
    let mut sink: Box<dyn SampleSink> =
        io::create_sink(&args.output, format, channels, output_rate)?;

    tracing::info!(
        input = %args.input.display(),
        channels,
        factor = config.factor,
        block_size = config.output_block_size,
        output_rate,
        "resampling"
    );

    let mut report = ResampleReport {
        frames_in: 0,
        frames_out: 0,
        blocks: 0,
        factor: config.factor,
        output_rate,
    };
    let mut interleaved: Vec<Sample> = Vec::new();
    let mut produced_interleaved: Vec<Sample> = Vec::new();

    loop {
        let wanted = {
            let lead = &lanes[0].resampler;
            lead.input_capacity() - lead.write_offset()
        };
        interleaved.resize(wanted * channels, 0);
        let frames = source.read_frames(&mut interleaved)?;
        report.frames_in += frames as u64;

        let mut produced = usize::MAX;
        for (channel, lane) in lanes.iter_mut().enumerate() {
            let region = lane.resampler.write_region(&mut lane.input)?;
            for (frame, slot) in region.iter_mut().enumerate() {
                *slot = if frame < frames {
                    interleaved[frame * channels + channel]
                } else {
                    0
                };
            }
            let n = lane
                .resampler
                .process(&mut lane.input, &mut lane.output, config.factor)?;
            produced = produced.min(n);
        }

        produced_interleaved.clear();
        for frame in 0..produced {
            produced_interleaved.extend(lanes.iter().map(|lane| lane.output[frame]));
        }
        sink.write_samples(&produced_interleaved)?;
        report.frames_out += produced as u64;
        report.blocks += 1;

        if frames < wanted {
            tracing::debug!(blocks = report.blocks, "input exhausted");
            break;
        }
        if args.max_blocks.is_some_and(|max| report.blocks >= max) {
            break;
        }
    }

    sink.finish()?;
    Ok(report)
}

fn execute_sine(args: &SineArgs) -> Result<u64> {
    ensure!(args.sample_rate > 0, "sample rate must be positive");
    ensure!(args.seconds >= 0.0, "duration must not be negative");

    let frames = (args.seconds * f64::from(args.sample_rate)).round() as u64;
    let amplitude = args.amplitude.clamp(0.0, 1.0) * f64::from(Sample::MAX);
    let rate = f64::from(args.sample_rate);
    let format = FileFormat::from_path(&args.output);
    let mut sink: Box<dyn SampleSink> = io::create_sink(&args.output, format, 1, args.sample_rate)?;

    let mut block = Vec::with_capacity(4096);
    let mut frame = 0u64;
    while frame < frames {
        block.clear();
        let end = (frame + 4096).min(frames);
        block.extend((frame..end).map(|i| {
            (amplitude * (TAU * args.frequency * i as f64 / rate).sin()).round() as Sample
        }));
        sink.write_samples(&block)?;
        frame = end;
    }
    sink.finish()?;
    Ok(frames)
}
