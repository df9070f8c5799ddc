// Inference orchestration
// Validates a synthesis request, drives the text and engine pipeline and
// persists the resulting artifacts

use log::{debug, info};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

use crate::config::{MAX_SPEED, MAX_TARGET_WORDS, MIN_SPEED};
use crate::errors::{AppError, AppResult};
use crate::models::{SynthesisRequest, SynthesisResult};
use crate::services::audio;
use crate::services::text::{self, TextNormalizer};
use crate::services::tts::{ProgressUpdate, SpeechEngine};
use crate::utils::artifacts::ArtifactStore;

/// Immutable service object wiring the pipeline together. Constructed once
/// at process start and shared by reference; holds no mutable state of its
/// own.
pub struct SynthesisService {
    engine: Arc<dyn SpeechEngine>,
    normalizer: Arc<dyn TextNormalizer>,
    artifacts: Arc<ArtifactStore>,
}

impl SynthesisService {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        normalizer: Arc<dyn TextNormalizer>,
        artifacts: Arc<ArtifactStore>,
    ) -> Self {
        Self {
            engine,
            normalizer,
            artifacts,
        }
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn engine_ready(&self) -> bool {
        self.engine.is_ready()
    }

    /// Run the full synthesis pipeline for one request.
    ///
    /// Input problems fail fast with `InputError` before anything external
    /// is touched. Any failure of the pipeline itself comes back as one
    /// `SynthesisError` carrying the underlying message; no partial results,
    /// no retries.
    pub async fn synthesize(
        &self,
        request: &SynthesisRequest,
        progress: Option<Sender<ProgressUpdate>>,
    ) -> AppResult<SynthesisResult> {
        validate(request)?;

        send(&progress, ProgressUpdate::Started).await;

        let result = self.run_pipeline(request, &progress).await;

        match &result {
            Ok(_) => send(&progress, ProgressUpdate::Completed).await,
            Err(e) => send(&progress, ProgressUpdate::Error(e.to_string())).await,
        }

        result
    }

    async fn run_pipeline(
        &self,
        request: &SynthesisRequest,
        progress: &Option<Sender<ProgressUpdate>>,
    ) -> AppResult<SynthesisResult> {
        // Step 1: normalize the reference clip, transcribing it when no
        // transcript was supplied
        send(progress, ProgressUpdate::PreparingReference).await;
        let prompt = self
            .engine
            .preprocess_reference(&request.ref_audio_path, &request.ref_text)
            .await
            .map_err(AppError::synthesis)?;

        // Step 2: expand numerals and symbols into spoken Vietnamese, then
        // collapse the normalizer's artifacts
        send(progress, ProgressUpdate::NormalizingText).await;
        let normalized = self
            .normalizer
            .normalize(&request.gen_text)
            .await
            .map_err(AppError::synthesis)?;
        let gen_text = text::clean(&normalized).to_lowercase();

        let mut prompt = prompt;
        prompt.text = prompt.text.to_lowercase();
        debug!("Normalized target text: {}", gen_text);

        // Step 3: the inference call itself
        send(progress, ProgressUpdate::GeneratingSpeech).await;
        let raw = self
            .engine
            .synthesize(&prompt, &gen_text, request.speed)
            .await
            .map_err(AppError::synthesis)?;

        // Step 4: persist the waveform and render the spectrogram
        send(progress, ProgressUpdate::RenderingSpectrogram).await;
        let audio_path = self
            .artifacts
            .allocate("speech", "wav")
            .map_err(AppError::synthesis)?;
        audio::write_wav(&raw.samples, raw.sample_rate, &audio_path)
            .map_err(AppError::synthesis)?;

        let spectrogram_path = self
            .artifacts
            .allocate("spectrogram", "png")
            .map_err(AppError::synthesis)?;
        audio::spectrogram::render(&raw.mel, &spectrogram_path).map_err(AppError::synthesis)?;

        let duration = raw.samples.len() as f64 / raw.sample_rate as f64;
        info!(
            "Synthesized {:.2}s of audio at {} Hz",
            duration, raw.sample_rate
        );

        Ok(SynthesisResult {
            audio_path: audio_path.to_string_lossy().to_string(),
            sample_rate: raw.sample_rate,
            duration,
            spectrogram_path: spectrogram_path.to_string_lossy().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        })
    }
}

/// Fail-fast validation of user input. Runs before any external call.
fn validate(request: &SynthesisRequest) -> AppResult<()> {
    if request.ref_audio_path.trim().is_empty() {
        return Err(AppError::input("Please upload a sample audio file."));
    }
    if request.gen_text.trim().is_empty() {
        return Err(AppError::input(
            "Please enter the text content to generate voice.",
        ));
    }
    if request.gen_text.split_whitespace().count() > MAX_TARGET_WORDS {
        return Err(AppError::input(
            "Please enter text content with less than 1000 words.",
        ));
    }
    if !(MIN_SPEED..=MAX_SPEED).contains(&request.speed) {
        return Err(AppError::input(format!(
            "Speech speed must be between {} and {}.",
            MIN_SPEED, MAX_SPEED
        )));
    }
    Ok(())
}

async fn send(progress: &Option<Sender<ProgressUpdate>>, update: ProgressUpdate) {
    if let Some(sender) = progress {
        let _ = sender.send(update).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tts::{RawSynthesis, ReferencePrompt};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeEngine {
        preprocess_calls: AtomicUsize,
        synth_calls: AtomicUsize,
        fail_synthesis: bool,
        seen_text: Mutex<Option<String>>,
        seen_ref_text: Mutex<Option<String>>,
    }

    #[async_trait]
    impl SpeechEngine for FakeEngine {
        async fn preprocess_reference(
            &self,
            audio_path: &str,
            text: &str,
        ) -> AppResult<ReferencePrompt> {
            self.preprocess_calls.fetch_add(1, Ordering::SeqCst);
            let resolved = if text.is_empty() {
                "Đây Là Bản Ghi Tự Động".to_string()
            } else {
                text.to_string()
            };
            Ok(ReferencePrompt {
                audio_path: audio_path.to_string(),
                text: resolved,
            })
        }

        async fn synthesize(
            &self,
            prompt: &ReferencePrompt,
            text: &str,
            _speed: f32,
        ) -> AppResult<RawSynthesis> {
            self.synth_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_synthesis {
                return Err(AppError::EngineError("CUDA out of memory".to_string()));
            }
            *self.seen_text.lock().unwrap() = Some(text.to_string());
            *self.seen_ref_text.lock().unwrap() = Some(prompt.text.clone());
            Ok(RawSynthesis {
                samples: vec![0.1; 2400],
                sample_rate: 24000,
                mel: vec![vec![-30.0; 20]; 8],
            })
        }

        async fn ensure_ready(&self) -> AppResult<()> {
            Ok(())
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    struct FakeNormalizer;

    #[async_trait]
    impl TextNormalizer for FakeNormalizer {
        async fn normalize(&self, text: &str) -> AppResult<String> {
            // Имитируем артефакты vinorm
            Ok(format!("{} .. , ,", text))
        }
    }

    fn service(engine: Arc<FakeEngine>, dir: &std::path::Path) -> SynthesisService {
        let artifacts = Arc::new(ArtifactStore::at(dir.join("artifacts"), 16).unwrap());
        SynthesisService::new(engine, Arc::new(FakeNormalizer), artifacts)
    }

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest {
            ref_audio_path: "/tmp/ref.wav".to_string(),
            ref_text: String::new(),
            gen_text: text.to_string(),
            speed: 1.0,
        }
    }

    #[tokio::test]
    async fn missing_reference_audio_fails_before_any_external_call() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = Arc::new(FakeEngine::default());
        let svc = service(engine.clone(), tmp.path());

        let mut req = request("xin chào");
        req.ref_audio_path = "  ".to_string();

        let err = svc.synthesize(&req, None).await.unwrap_err();
        assert!(matches!(err, AppError::InputError(_)));
        assert_eq!(engine.preprocess_calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.synth_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_target_text_fails_before_any_external_call() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = Arc::new(FakeEngine::default());
        let svc = service(engine.clone(), tmp.path());

        let err = svc.synthesize(&request("   \n\t "), None).await.unwrap_err();
        assert!(matches!(err, AppError::InputError(_)));
        assert_eq!(engine.preprocess_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn word_limit_is_exactly_one_thousand() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = Arc::new(FakeEngine::default());
        let svc = service(engine.clone(), tmp.path());

        let over = vec!["từ"; 1001].join(" ");
        let err = svc.synthesize(&request(&over), None).await.unwrap_err();
        assert!(matches!(err, AppError::InputError(_)));
        assert_eq!(engine.preprocess_calls.load(Ordering::SeqCst), 0);

        let at_limit = vec!["từ"; 1000].join(" ");
        svc.synthesize(&request(&at_limit), None).await.unwrap();
        assert_eq!(engine.synth_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn speed_out_of_bounds_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = Arc::new(FakeEngine::default());
        let svc = service(engine.clone(), tmp.path());

        for speed in [0.29, 2.01, 0.0, -1.0] {
            let mut req = request("xin chào");
            req.speed = speed;
            let err = svc.synthesize(&req, None).await.unwrap_err();
            assert!(matches!(err, AppError::InputError(_)), "speed {}", speed);
        }

        for speed in [0.3, 1.0, 2.0] {
            let mut req = request("xin chào");
            req.speed = speed;
            svc.synthesize(&req, None).await.unwrap();
        }
    }

    #[tokio::test]
    async fn engine_failure_is_wrapped_as_synthesis_error() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = Arc::new(FakeEngine {
            fail_synthesis: true,
            ..FakeEngine::default()
        });
        let svc = service(engine, tmp.path());

        let err = svc.synthesize(&request("xin chào"), None).await.unwrap_err();
        match err {
            AppError::SynthesisError(message) => {
                assert!(message.contains("CUDA out of memory"));
            }
            other => panic!("expected SynthesisError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn engine_receives_cleaned_lowercased_text() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = Arc::new(FakeEngine::default());
        let svc = service(engine.clone(), tmp.path());

        svc.synthesize(&request("Ngày 20 Tháng 11"), None)
            .await
            .unwrap();

        // FakeNormalizer appended " .. , ,"; clean() must collapse it and
        // the orchestrator lower-cases the result
        let seen = engine.seen_text.lock().unwrap().clone().unwrap();
        assert_eq!(seen, "ngày 20 tháng 11 . ,");

        let seen_ref = engine.seen_ref_text.lock().unwrap().clone().unwrap();
        assert_eq!(seen_ref, "đây là bản ghi tự động");
    }

    #[tokio::test]
    async fn artifacts_are_written_per_request() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = Arc::new(FakeEngine::default());
        let svc = service(engine, tmp.path());

        let result = svc.synthesize(&request("xin chào"), None).await.unwrap();

        assert!(std::path::Path::new(&result.audio_path).exists());
        assert!(std::path::Path::new(&result.spectrogram_path).exists());
        assert_eq!(result.sample_rate, 24000);
        assert!((result.duration - 0.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn progress_updates_arrive_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = Arc::new(FakeEngine::default());
        let svc = service(engine, tmp.path());

        let (tx, mut rx) = tokio::sync::mpsc::channel(32);
        svc.synthesize(&request("xin chào"), Some(tx)).await.unwrap();

        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }

        assert!(matches!(updates.first(), Some(ProgressUpdate::Started)));
        assert!(matches!(updates.last(), Some(ProgressUpdate::Completed)));
    }
}
