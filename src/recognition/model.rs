// LazyModel - primary classifier loaded once, on demand
//
// Concurrent `load()` callers share a single in-flight future, so the
// underlying loader runs once per attempt and every caller observes the same
// outcome. A failed attempt resets the slot to Unloaded; the next call
// retries. Until a load succeeds the model reports itself unavailable and the
// recognizer moves on to the next provider.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::error::{ErrorCode, RecognitionError};
use crate::recognition::{ImageClassifier, ImagePayload, ModelLoader, Prediction};

type LoadResult = Result<Arc<dyn ImageClassifier>, RecognitionError>;
type SharedLoad = Shared<BoxFuture<'static, LoadResult>>;

enum ModelState {
    Unloaded,
    Loading { attempt: u64, future: SharedLoad },
    Ready(Arc<dyn ImageClassifier>),
}

struct ModelSlot {
    state: ModelState,
    attempts: u64,
}

/// Primary on-device classifier with a concurrency-safe lazy load.
pub struct LazyModel {
    name: String,
    loader: Arc<dyn ModelLoader>,
    slot: Mutex<ModelSlot>,
}

impl LazyModel {
    pub fn new(name: impl Into<String>, loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            name: name.into(),
            loader,
            slot: Mutex::new(ModelSlot {
                state: ModelState::Unloaded,
                attempts: 0,
            }),
        }
    }

    /// Safely acquire the state lock
    fn lock_slot(&self) -> Result<MutexGuard<'_, ModelSlot>, RecognitionError> {
        self.slot.lock().map_err(|_| RecognitionError::StatePoisoned)
    }

    pub fn is_loaded(&self) -> bool {
        self.lock_slot()
            .map(|slot| matches!(slot.state, ModelState::Ready(_)))
            .unwrap_or(false)
    }

    pub fn is_loading(&self) -> bool {
        self.lock_slot()
            .map(|slot| matches!(slot.state, ModelState::Loading { .. }))
            .unwrap_or(false)
    }

    /// Load the model if needed. Idempotent once loaded.
    ///
    /// # Errors
    /// `RecognitionError::ModelLoad` when the loader fails. The failure is not
    /// cached, so a later call starts a fresh attempt.
    pub async fn load(&self) -> Result<(), RecognitionError> {
        let (attempt, future) = {
            let mut slot = self.lock_slot()?;
            let in_flight = match &slot.state {
                ModelState::Ready(_) => return Ok(()),
                ModelState::Loading { attempt, future } => Some((*attempt, future.clone())),
                ModelState::Unloaded => None,
            };

            match in_flight {
                Some(joined) => {
                    tracing::debug!(model = %self.name, "[LazyModel] joining in-flight load");
                    joined
                }
                None => {
                    slot.attempts += 1;
                    let attempt = slot.attempts;
                    tracing::info!(model = %self.name, attempt, "[LazyModel] loading model");
                    let future = self.loader.load().shared();
                    slot.state = ModelState::Loading {
                        attempt,
                        future: future.clone(),
                    };
                    (attempt, future)
                }
            }
        };

        let outcome = future.await;

        let mut slot = self.lock_slot()?;
        let settles_this_attempt =
            matches!(slot.state, ModelState::Loading { attempt: current, .. } if current == attempt);
        if settles_this_attempt {
            slot.state = match &outcome {
                Ok(model) => {
                    tracing::info!(model = %self.name, "[LazyModel] model loaded");
                    ModelState::Ready(Arc::clone(model))
                }
                Err(err) => {
                    tracing::warn!(
                        model = %self.name,
                        code = err.code(),
                        "[LazyModel] load failed: {}",
                        err.message()
                    );
                    ModelState::Unloaded
                }
            };
        }

        outcome.map(|_| ()).map_err(|err| match err {
            RecognitionError::ModelLoad { .. } => err,
            other => RecognitionError::ModelLoad {
                reason: other.message(),
            },
        })
    }

    fn ready_model(&self) -> Result<Arc<dyn ImageClassifier>, RecognitionError> {
        let slot = self.lock_slot()?;
        match &slot.state {
            ModelState::Ready(model) => Ok(Arc::clone(model)),
            _ => Err(RecognitionError::ProviderUnavailable {
                provider: self.name.clone(),
            }),
        }
    }
}

impl ImageClassifier for LazyModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify<'a>(
        &'a self,
        image: &'a ImagePayload,
    ) -> BoxFuture<'a, Result<Vec<Prediction>, RecognitionError>> {
        Box::pin(async move {
            let model = self.ready_model()?;
            model.classify(image).await
        })
    }
}
