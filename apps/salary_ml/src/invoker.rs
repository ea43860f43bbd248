use std::{
    panic::{self, AssertUnwindSafe},
    path::Path,
    sync::Arc,
};

use tracing::{info, warn};

use crate::{LinearModel, ModelError, Regressor, FEATURE_COUNT, FEATURE_NAMES};

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("model not loaded")]
    Unavailable,
    #[error("prediction failed: {0}")]
    Prediction(#[from] ModelError),
}

/// Arrange raw inputs in the order the model was trained with.
pub fn prepare_features(
    test_score: f64,
    interview_score: f64,
    years_experience: f64,
) -> Result<[f64; FEATURE_COUNT], ModelError> {
    let features = [test_score, interview_score, years_experience];
    for (name, value) in FEATURE_NAMES.into_iter().zip(features) {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteFeature { name, value });
        }
    }
    Ok(features)
}

/// Holds the process-wide model, or nothing when loading failed.
/// Read-only after startup.
#[derive(Clone)]
pub struct ModelInvoker {
    model: Option<Arc<dyn Regressor>>,
}

impl ModelInvoker {
    pub fn new(model: impl Regressor + 'static) -> Self {
        Self {
            model: Some(Arc::new(model)),
        }
    }

    pub fn unavailable() -> Self {
        Self { model: None }
    }

    /// Load the artifact at `path`; any failure leaves the invoker unavailable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match LinearModel::load(path) {
            Ok(model) => {
                info!(path = %path.display(), "model loaded");
                Self::new(model)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "model unavailable");
                Self::unavailable()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn predict(
        &self,
        test_score: f64,
        interview_score: f64,
        years_experience: f64,
    ) -> Result<f64, InvokeError> {
        let model = self.model.as_ref().ok_or(InvokeError::Unavailable)?;
        let features = prepare_features(test_score, interview_score, years_experience)?;
        // panics inside the model surface as prediction errors
        let out = panic::catch_unwind(AssertUnwindSafe(|| model.predict(&features)))
            .map_err(|_| ModelError::Other("model panicked during inference".into()))??;
        Ok(out)
    }
}

impl std::fmt::Debug for ModelInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelInvoker")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records the vector it was called with.
    #[derive(Default)]
    struct Spy(Mutex<Option<[f64; FEATURE_COUNT]>>);

    impl Regressor for Arc<Spy> {
        fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
            *self.0.lock().unwrap() = Some(*features);
            Ok(42.0)
        }
    }

    #[test]
    fn passes_features_in_training_order() {
        let spy = Arc::new(Spy::default());
        let invoker = ModelInvoker::new(spy.clone());

        assert_eq!(invoker.predict(85.0, 90.0, 3.0).unwrap(), 42.0);
        assert_eq!(*spy.0.lock().unwrap(), Some([85.0, 90.0, 3.0]));
    }

    #[test]
    fn unavailable_fails_fast() {
        let invoker = ModelInvoker::unavailable();
        assert!(!invoker.is_loaded());
        assert!(matches!(
            invoker.predict(1.0, 2.0, 3.0),
            Err(InvokeError::Unavailable)
        ));
    }

    #[test]
    fn load_failure_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("model.json");
        std::fs::write(&bad, "{broken").unwrap();

        assert!(!ModelInvoker::load(&bad).is_loaded());
        assert!(!ModelInvoker::load(dir.path().join("absent.json")).is_loaded());
    }

    struct Panics;

    impl Regressor for Panics {
        fn predict(&self, _: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
            panic!("corrupt weights")
        }
    }

    #[test]
    fn panicking_model_is_a_prediction_error() {
        let invoker = ModelInvoker::new(Panics);
        assert!(matches!(
            invoker.predict(1.0, 2.0, 3.0),
            Err(InvokeError::Prediction(ModelError::Other(_)))
        ));
    }

    #[test]
    fn non_finite_input_is_a_prediction_error() {
        let invoker = ModelInvoker::new(LinearModel::new([1.0, 1.0, 1.0], 0.0).unwrap());
        let err = invoker.predict(f64::NAN, 1.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            InvokeError::Prediction(ModelError::NonFiniteFeature { name: "test_score", .. })
        ));
    }
}
