//! Sample file readers and writers used by the command line tools.
//!
//! Raw files are headerless interleaved signed 16-bit little-endian PCM;
//! WAV files go through `hound` and must hold 16-bit integer samples.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use harmoniq_resample::Sample;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FileFormat {
    Raw,
    Wav,
}

impl FileFormat {
    /// `.wav` files are WAV, everything else is treated as raw PCM.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("wav") => FileFormat::Wav,
            _ => FileFormat::Raw,
        }
    }
}

pub trait SampleSource {
    fn channels(&self) -> usize;
    fn sample_rate(&self) -> u32;
    /// Fills `buffer` with interleaved samples and returns the number of
    /// whole frames read. Fewer frames than requested means end of stream.
    fn read_frames(&mut self, buffer: &mut [Sample]) -> Result<usize>;
}

pub trait SampleSink {
    fn write_samples(&mut self, samples: &[Sample]) -> Result<()>;
    fn finish(self: Box<Self>) -> Result<()>;
}

pub struct RawSource<R> {
    reader: R,
    channels: usize,
    sample_rate: u32,
    bytes: Vec<u8>,
}

impl<R: Read> RawSource<R> {
    pub fn new(reader: R, channels: usize, sample_rate: u32) -> Self {
        Self {
            reader,
            channels: channels.max(1),
            sample_rate,
            bytes: Vec::new(),
        }
    }
}

impl<R: Read> SampleSource for RawSource<R> {
    fn channels(&self) -> usize {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read_frames(&mut self, buffer: &mut [Sample]) -> Result<usize> {
        self.bytes.resize(buffer.len() * 2, 0);
        let mut filled = 0;
        while filled < self.bytes.len() {
            match self.reader.read(&mut self.bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err).context("failed to read raw samples"),
            }
        }

        let samples = filled / 2;
        for (slot, pair) in buffer.iter_mut().zip(self.bytes[..samples * 2].chunks_exact(2)) {
            *slot = Sample::from_le_bytes([pair[0], pair[1]]);
        }
        Ok(samples / self.channels)
    }
}

pub struct WavSource<R> {
    reader: hound::WavReader<R>,
}

impl<R: Read> WavSource<R> {
    pub fn new(reader: hound::WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            bail!(
                "unsupported WAV encoding: {} bit {:?}, expected 16 bit integer",
                spec.bits_per_sample,
                spec.sample_format
            );
        }
        Ok(Self { reader })
    }
}

impl<R: Read> SampleSource for WavSource<R> {
    fn channels(&self) -> usize {
        usize::from(self.reader.spec().channels)
    }

    fn sample_rate(&self) -> u32 {
        self.reader.spec().sample_rate
    }

    fn read_frames(&mut self, buffer: &mut [Sample]) -> Result<usize> {
        let channels = self.channels();
        let mut samples = self.reader.samples::<i16>();
        let mut read = 0;
        for slot in buffer.iter_mut() {
            match samples.next() {
                Some(sample) => {
                    *slot = sample.context("failed to decode WAV sample")?;
                    read += 1;
                }
                None => break,
            }
        }
        Ok(read / channels)
    }
}

pub struct RawSink<W> {
    writer: W,
    bytes: Vec<u8>,
}

impl<W: Write> RawSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes: Vec::new(),
        }
    }
}

impl<W: Write> SampleSink for RawSink<W> {
    fn write_samples(&mut self, samples: &[Sample]) -> Result<()> {
        self.bytes.clear();
        self.bytes
            .extend(samples.iter().flat_map(|sample| sample.to_le_bytes()));
        self.writer
            .write_all(&self.bytes)
            .context("failed to write raw samples")
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        self.writer.flush().context("failed to flush raw output")
    }
}

pub struct WavSink<W: Write + std::io::Seek> {
    writer: hound::WavWriter<W>,
}

impl<W: Write + std::io::Seek> SampleSink for WavSink<W> {
    fn write_samples(&mut self, samples: &[Sample]) -> Result<()> {
        for &sample in samples {
            self.writer.write_sample(sample)?;
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV output")
    }
}

/// Opens `path` for reading. `channels` and `sample_rate` describe raw input
/// and are ignored for WAV files, which carry their own header.
pub fn open_source(
    path: &Path,
    channels: usize,
    sample_rate: u32,
) -> Result<Box<dyn SampleSource>> {
    match FileFormat::from_path(path) {
        FileFormat::Wav => {
            let reader = hound::WavReader::open(path)
                .with_context(|| format!("failed to open WAV file {}", path.display()))?;
            Ok(Box::new(WavSource::new(reader)?))
        }
        FileFormat::Raw => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(RawSource::new(BufReader::new(file), channels, sample_rate)))
        }
    }
}

pub fn create_sink(
    path: &Path,
    format: FileFormat,
    channels: usize,
    sample_rate: u32,
) -> Result<Box<dyn SampleSink>> {
    match format {
        FileFormat::Wav => {
            let spec = hound::WavSpec {
                channels: u16::try_from(channels).context("too many channels for WAV")?,
                sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            };
            let writer = hound::WavWriter::create(path, spec)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(WavSink { writer }))
        }
        FileFormat::Raw => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(RawSink::new(BufWriter::new(file))))
        }
    }
}
