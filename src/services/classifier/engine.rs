use crate::error::{Error, Result};
use crate::models::classify_types::ClassificationResult;
use crate::services::classifier::{preprocess, Classify};
use async_trait::async_trait;
use futures::StreamExt;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

enum ModelState {
    Unloaded,
    Ready(Session),
    /// Initialization failed; kept so later calls fail fast instead of
    /// retrying a load that will not start working on its own.
    Failed(String),
}

/// Owned handle to the classifier model.
///
/// The underlying `ort::Session` is created lazily on the first
/// classification and reused for the lifetime of the engine. Construct one
/// per run and pass it to every call site; there is no module-level state.
pub struct ClassifierEngine {
    model_path: PathBuf,
    state: Mutex<ModelState>,
    client: reqwest::Client,
}

impl ClassifierEngine {
    pub fn new(model_path: PathBuf) -> Self {
        Self {
            model_path,
            state: Mutex::new(ModelState::Unloaded),
            client: reqwest::Client::new(),
        }
    }

    /// Classifies a preprocessed input tensor.
    ///
    /// The model must emit exactly two logits: index 0 "forgettable",
    /// index 1 "memorable". Anything else is an inference error, which the
    /// review loop treats as a per-photo skip.
    pub async fn classify_tensor(&self, input: Array4<f32>) -> Result<ClassificationResult> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        let session = match &mut *state {
            ModelState::Ready(session) => session,
            _ => unreachable!("ensure_loaded leaves the state Ready or errors"),
        };

        let input_name = session.inputs()[0].name().to_string();
        let input_tensor = Value::from_array(input)
            .map_err(|e| Error::Inference(format!("Failed to create input tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_name.as_str() => input_tensor])
            .map_err(|e| Error::Inference(format!("Model run failed: {}", e)))?;

        let output_value = outputs
            .values()
            .next()
            .ok_or_else(|| Error::Inference("Model produced no outputs".to_string()))?;

        let (_, logits) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference(format!("Failed to extract output tensor: {}", e)))?;

        if logits.len() != 2 {
            return Err(Error::Inference(format!(
                "Expected 2 logits, model returned {}",
                logits.len()
            )));
        }

        let probs = softmax(logits);
        debug!(
            prob_forgettable = probs[0] as f64,
            prob_memorable = probs[1] as f64,
            "inference complete"
        );
        Ok(ClassificationResult::from_probs(probs[0], probs[1]))
    }

    async fn ensure_loaded(&self, state: &mut ModelState) -> Result<()> {
        match state {
            ModelState::Ready(_) => return Ok(()),
            ModelState::Failed(message) => return Err(Error::ModelLoad(message.clone())),
            ModelState::Unloaded => {}
        }

        info!(path = %self.model_path.display(), "loading classifier model");
        match load_session(self.model_path.clone()).await {
            Ok(session) => {
                info!("classifier model loaded");
                *state = ModelState::Ready(session);
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                *state = ModelState::Failed(message.clone());
                Err(Error::ModelLoad(message))
            }
        }
    }
}

async fn load_session(model_path: PathBuf) -> Result<Session> {
    if !model_path.exists() {
        return Err(Error::ModelLoad(format!(
            "Model file not found: {}",
            model_path.display()
        )));
    }

    tokio::task::spawn_blocking(move || -> Result<Session> {
        let _ = ort::init().with_name("photo-triage").commit();

        let session = Session::builder()
            .map_err(|e| Error::ModelLoad(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| Error::ModelLoad(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(4)
            .map_err(|e| Error::ModelLoad(format!("Failed to set intra threads: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| Error::ModelLoad(format!("Failed to load ONNX model: {}", e)))?;
        Ok(session)
    })
    .await
    .map_err(|e| Error::ModelLoad(format!("Model loading task failed: {}", e)))?
}

#[async_trait]
impl Classify for ClassifierEngine {
    async fn classify_url(&self, url: &str) -> Result<ClassificationResult> {
        let img = preprocess::fetch_image(&self.client, url).await?;
        let tensor = preprocess::preprocess(&img)?;
        self.classify_tensor(tensor).await
    }
}

/// Numerically stable softmax: shift by the max logit before
/// exponentiating.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max_logit = logits.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max_logit).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum).collect()
}

/// Downloads the model file to `dest`, streaming to disk.
pub async fn download_model(url: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::ModelLoad(format!("Failed to create model directory: {}", e)))?;
    }

    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::ModelLoad(format!("Failed to download model: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::ModelLoad(format!(
            "Failed to download {}: HTTP {}",
            url,
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;
    let mut last_logged = 0;

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| Error::ModelLoad(format!("Failed to create {}: {}", dest.display(), e)))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::ModelLoad(format!("Download interrupted: {}", e)))?;
        downloaded += chunk.len() as u64;
        tokio::io::AsyncWriteExt::write_all(&mut file, &chunk)
            .await
            .map_err(|e| Error::ModelLoad(format!("Failed to write model file: {}", e)))?;

        if total_size > 0 {
            let progress = (downloaded * 100) / total_size;
            if progress >= last_logged + 10 {
                info!(percent = progress, "downloading model");
                last_logged = progress;
            }
        }
    }

    info!(path = %dest.display(), bytes = downloaded, "model downloaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-6, "{} vs {}", a, b);
    }

    #[test]
    fn softmax_sums_to_one() {
        for logits in [
            vec![0.0, 0.0],
            vec![3.2, -1.7],
            vec![100.0, 100.5],
            vec![-40.0, 12.0, 3.0],
        ] {
            let probs = softmax(&logits);
            assert_close(probs.iter().sum::<f32>(), 1.0);
        }
    }

    #[test]
    fn softmax_is_shift_invariant() {
        let base = softmax(&[1.3, -0.4]);
        let shifted = softmax(&[1.3 + 250.0, -0.4 + 250.0]);
        assert_close(base[0], shifted[0]);
        assert_close(base[1], shifted[1]);
    }

    #[test]
    fn softmax_handles_large_logits_without_overflow() {
        let probs = softmax(&[1000.0, 999.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert_close(probs.iter().sum::<f32>(), 1.0);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn tie_probabilities_are_forgettable() {
        let probs = softmax(&[0.7, 0.7]);
        let result = ClassificationResult::from_probs(probs[0], probs[1]);
        assert!(!result.is_memorable);
        assert_close(result.confidence, 0.5);
    }

    #[test]
    fn memorable_wins_on_strictly_greater_probability() {
        let probs = softmax(&[-0.2, 0.9]);
        let result = ClassificationResult::from_probs(probs[0], probs[1]);
        assert!(result.is_memorable);
        assert_close(result.prob_memorable + result.prob_forgettable, 1.0);
        assert_close(result.confidence, result.prob_memorable);
    }

    #[tokio::test]
    async fn missing_model_file_is_a_load_error_and_not_retried() {
        let engine = ClassifierEngine::new(PathBuf::from("/nonexistent/model.onnx"));
        let tensor = Array4::<f32>::zeros((1, 3, 512, 512));

        let first = engine.classify_tensor(tensor.clone()).await.unwrap_err();
        assert!(matches!(first, Error::ModelLoad(_)));
        assert!(!first.is_recoverable());

        // Second call fails from the cached state, same error class.
        let second = engine.classify_tensor(tensor).await.unwrap_err();
        assert!(matches!(second, Error::ModelLoad(_)));
    }
}
