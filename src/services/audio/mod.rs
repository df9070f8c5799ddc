// Audio processing services
// Waveform persistence and duration probing for reference clips

pub mod spectrogram;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::fs::File;
use std::path::Path;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::errors::{AppError, AppResult};

/// Рекомендуемая длительность референсного аудио, секунды
pub const MIN_REFERENCE_SECONDS: f32 = 3.0;
pub const MAX_REFERENCE_SECONDS: f32 = 15.0;

/// Write mono f32 samples as a 16-bit PCM wav file
pub fn write_wav(samples: &[f32], sample_rate: u32, path: &Path) -> AppResult<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| AppError::Other(format!("Failed to create WAV file: {}", e)))?;

    for sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer
            .write_sample((clamped * i16::MAX as f32) as i16)
            .map_err(|e| AppError::Other(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| AppError::Other(format!("Failed to finalize WAV file: {}", e)))?;

    Ok(())
}

/// Read a mono or multi-channel wav back into f32 samples (channels mixed
/// down by taking the first channel)
pub fn read_wav(path: &Path) -> AppResult<(Vec<f32>, u32)> {
    let reader = WavReader::open(path)
        .map_err(|e| AppError::Other(format!("Failed to open WAV file: {}", e)))?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    let sample_rate = spec.sample_rate;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .filter_map(Result::ok)
            .collect(),
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .filter_map(Result::ok)
                .map(|s| s as f32 / scale)
                .collect()
        }
    };

    let mono: Vec<f32> = if channels > 1 {
        samples.iter().step_by(channels).copied().collect()
    } else {
        samples
    };

    Ok((mono, sample_rate))
}

/// Get audio duration in seconds
pub fn get_audio_duration(file_path: &Path) -> AppResult<f32> {
    if !file_path.exists() {
        return Err(AppError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        )));
    }

    // For WAV files, use hound which is more reliable
    if let Some(ext) = file_path.extension() {
        if ext.eq_ignore_ascii_case("wav") {
            let reader = WavReader::open(file_path)
                .map_err(|e| AppError::Other(format!("Failed to open WAV file: {}", e)))?;

            let spec = reader.spec();
            let num_samples = reader.len() / spec.channels as u32;
            return Ok(num_samples as f32 / spec.sample_rate as f32);
        }
    }

    // For mp3/m4a/flac, probe the container with symphonia
    let file = File::open(file_path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AppError::Other(format!("Ошибка проверки формата: {}", e)))?;

    let format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AppError::Other("Не найден аудио-трек".to_string()))?;

    let params = &track.codec_params;
    match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => Ok(frames as f32 / rate as f32),
        _ => Err(AppError::Other(
            "Не удалось определить длительность аудио".to_string(),
        )),
    }
}

/// Log a warning when a reference clip falls outside the recommended range.
/// The engine still accepts it, quality just degrades.
pub fn warn_on_reference_duration(path: &Path) {
    match get_audio_duration(path) {
        Ok(duration) if duration < MIN_REFERENCE_SECONDS => {
            log::warn!(
                "Reference clip {} is only {:.1}s long, voice cloning works best with {}-{}s",
                path.display(),
                duration,
                MIN_REFERENCE_SECONDS,
                MAX_REFERENCE_SECONDS
            );
        }
        Ok(duration) if duration > MAX_REFERENCE_SECONDS => {
            log::warn!(
                "Reference clip {} is {:.1}s long, it will be trimmed by the engine ({}-{}s recommended)",
                path.display(),
                duration,
                MIN_REFERENCE_SECONDS,
                MAX_REFERENCE_SECONDS
            );
        }
        Ok(_) => {}
        Err(e) => log::debug!("Could not probe reference duration: {}", e),
    }
}
