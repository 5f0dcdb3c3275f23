use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use super::environment::load_environment;
use super::model::load_model;
use crate::error::ViewerError;
use crate::options::MaterialOptions;
use crate::scene::model::MeshRef;
use crate::scene::{EnvironmentMap, ModelAsset};

/// A decoded model with at least one mesh.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    /// The shared model.
    pub model: Arc<ModelAsset>,
    /// First mesh with geometry; particle views sample it.
    pub first_mesh: MeshRef,
}

/// Everything a finished load produced.
///
/// The model and the environment load independently: a model failure
/// still delivers the environment, and an environment failure only logs.
#[derive(Debug)]
pub struct LoadedAssets {
    /// The model, or why it could not be used.
    pub model: Result<LoadedModel, ViewerError>,
    /// Decoded environment, if one was configured and decoded.
    pub environment: Option<Arc<EnvironmentMap>>,
}

/// What to load and how to post-process it.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// glTF/GLB file.
    pub model_path: PathBuf,
    /// Optional Radiance HDR file.
    pub environment_path: Option<PathBuf>,
    /// Material normalization parameters.
    pub materials: MaterialOptions,
}

/// Handle to a background asset load.
///
/// The result is delivered once over a channel. Cancelling (or dropping the
/// handle) discards it: the worker notices the flag between steps and the
/// send fails harmlessly if the receiver is gone.
pub struct AssetLoader {
    result_rx: Option<mpsc::Receiver<LoadedAssets>>,
    cancelled: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl AssetLoader {
    /// Start loading on a named background thread.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ThreadSpawn`] if the thread cannot be spawned.
    pub fn spawn(request: LoadRequest) -> Result<Self, ViewerError> {
        let (result_tx, result_rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let thread = std::thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || {
                let assets = Self::load(&request, &flag);
                match assets {
                    Some(assets) if !flag.load(Ordering::Acquire) => {
                        let _ = result_tx.send(assets);
                    }
                    _ => log::debug!("asset load cancelled; discarding result"),
                }
            })
            .map_err(ViewerError::ThreadSpawn)?;

        Ok(Self {
            result_rx: Some(result_rx),
            cancelled,
            thread: Some(thread),
        })
    }

    /// `None` when cancelled between the model and environment steps.
    fn load(request: &LoadRequest, cancelled: &AtomicBool) -> Option<LoadedAssets> {
        let model = Self::decode_model(request);

        if cancelled.load(Ordering::Acquire) {
            return None;
        }

        let environment = request
            .environment_path
            .as_deref()
            .and_then(|path| match load_environment(path) {
                Ok(map) => Some(Arc::new(map)),
                Err(e) => {
                    log::error!("{e}; realistic view keeps an unset background");
                    None
                }
            });

        Some(LoadedAssets { model, environment })
    }

    fn decode_model(request: &LoadRequest) -> Result<LoadedModel, ViewerError> {
        let model = load_model(&request.model_path, &request.materials)?;
        let first_mesh = model.first_mesh().ok_or(ViewerError::NoMesh)?;
        log::info!(
            "found mesh {:?} with {} vertices",
            model.mesh(first_mesh.mesh).and_then(|m| m.name.as_deref()),
            model.mesh(first_mesh.mesh).map_or(0, |m| m.vertex_count())
        );
        Ok(LoadedModel {
            model: Arc::new(model),
            first_mesh,
        })
    }

    /// Non-blocking check for the result. Yields it at most once.
    pub fn try_recv(&mut self) -> Option<LoadedAssets> {
        let result = self.result_rx.as_ref()?.try_recv().ok()?;
        self.finish();
        Some(result)
    }

    /// Block up to `timeout` for the result.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<LoadedAssets> {
        let result = self.result_rx.as_ref()?.recv_timeout(timeout).ok()?;
        self.finish();
        Some(result)
    }

    /// Whether a result may still arrive.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.result_rx.is_some()
    }

    /// Discard the result. The worker is not interrupted mid-step but its
    /// output is never delivered.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.result_rx = None;
        // Detach: the worker may still be inside the glTF parser.
        drop(self.thread.take());
    }

    fn finish(&mut self) {
        self.result_rx = None;
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        if self.is_pending() {
            self.cancel();
        }
    }
}
