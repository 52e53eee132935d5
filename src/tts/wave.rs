use std::io::{Cursor, Seek, Write};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::AppError;

/// 16-bit PCM audio as produced by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl Waveform {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<i16>) -> Self {
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    /// Duration in seconds, ignoring a partial trailing frame.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        let frames = self.samples.len() / self.channels as usize;
        frames as f32 / self.sample_rate as f32
    }

    /// Write the waveform as a RIFF WAV stream.
    pub fn write_riff<W: Write + Seek>(&self, sink: W) -> Result<(), AppError> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::new(sink, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        Ok(())
    }

    pub fn to_riff_bytes(&self) -> Result<Vec<u8>, AppError> {
        let mut buffer = Vec::with_capacity(44 + self.samples.len() * 2);
        self.write_riff(Cursor::new(&mut buffer))?;
        Ok(buffer)
    }
}
