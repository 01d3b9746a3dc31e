use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use futures::channel::oneshot;
use futures::FutureExt;

use super::model::{LoadedModel, ModelData};
use super::slot::AssetSlot;
use super::source::AssetSource;
use super::texture::TextureData;
use crate::error::LoadError;
use crate::scene::{SceneGraph, TextureTarget};

enum Payload {
    Model(ModelData),
    Texture(TextureData),
}

enum Destination {
    Slot(AssetSlot<LoadedModel>),
    Texture(TextureTarget),
}

struct PendingLoad {
    uri: String,
    destination: Destination,
    receiver: oneshot::Receiver<Result<Payload, LoadError>>,
}

/// Outcome of one [`AssetLoader::pump`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PumpReport {
    pub models_attached: usize,
    pub textures_applied: usize,
    pub failed: Vec<String>,
}

impl PumpReport {
    pub fn is_empty(&self) -> bool {
        self.models_attached == 0 && self.textures_applied == 0 && self.failed.is_empty()
    }

    fn merge(&mut self, other: PumpReport) {
        self.models_attached += other.models_attached;
        self.textures_applied += other.textures_applied;
        self.failed.extend(other.failed);
    }
}

/// Fire-and-forget asset loads.
///
/// Each request runs on its own worker thread and reports back through a
/// oneshot channel. Results are applied to the scene only from [`pump`],
/// which the frame thread calls once per tick, so the scene graph never
/// crosses threads.
///
/// [`pump`]: AssetLoader::pump
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    pending: Vec<PendingLoad>,
    issued: usize,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            pending: Vec::new(),
            issued: 0,
        }
    }

    /// Request a model; the returned slot is filled once the model is attached
    pub fn load_model(&mut self, uri: &str) -> AssetSlot<LoadedModel> {
        let slot = AssetSlot::new(uri);
        let receiver = self.spawn(uri, |source, uri| source.load_model(uri).map(Payload::Model));
        self.pending.push(PendingLoad {
            uri: uri.to_string(),
            destination: Destination::Slot(slot.clone()),
            receiver,
        });
        slot
    }

    /// Request a texture; applied to `target` when ready, dropped on failure
    pub fn load_texture(&mut self, uri: &str, target: TextureTarget) {
        let receiver = self.spawn(uri, |source, uri| {
            source.load_texture(uri).map(Payload::Texture)
        });
        self.pending.push(PendingLoad {
            uri: uri.to_string(),
            destination: Destination::Texture(target),
            receiver,
        });
    }

    /// Loads still in flight
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Loads issued since creation
    pub fn issued(&self) -> usize {
        self.issued
    }

    fn spawn<F>(&mut self, uri: &str, job: F) -> oneshot::Receiver<Result<Payload, LoadError>>
    where
        F: FnOnce(&dyn AssetSource, &str) -> Result<Payload, LoadError> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let owned_uri = uri.to_string();
        self.issued += 1;

        log::debug!("Loading {}", uri);
        let spawned = thread::Builder::new()
            .name(format!("asset-load-{}", self.issued))
            .spawn(move || {
                let result = job(source.as_ref(), &owned_uri);
                // Receiver may be gone if the loader was dropped first
                let _ = sender.send(result);
            });

        if let Err(e) = spawned {
            // The sender died with the closure, so the pump will see an abandoned load
            log::error!("Failed to spawn loader thread for {}: {}", uri, e);
        }
        receiver
    }

    /// Apply every finished load to the scene. Never blocks.
    pub fn pump(&mut self, scene: &mut SceneGraph) -> PumpReport {
        let mut report = PumpReport::default();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut load in std::mem::take(&mut self.pending) {
            let outcome = match (&mut load.receiver).now_or_never() {
                None => {
                    still_pending.push(load);
                    continue;
                }
                Some(Ok(result)) => result,
                Some(Err(oneshot::Canceled)) => Err(LoadError::Abandoned {
                    uri: load.uri.clone(),
                }),
            };

            match outcome {
                Ok(payload) => apply(scene, &load.uri, load.destination, payload, &mut report),
                Err(err) => {
                    log::error!("{}", err);
                    report.failed.push(load.uri);
                }
            }
        }

        self.pending = still_pending;
        report
    }

    /// Pump until nothing is pending or `timeout` elapses
    pub fn pump_until_idle(&mut self, scene: &mut SceneGraph, timeout: Duration) -> PumpReport {
        let deadline = Instant::now() + timeout;
        let mut report = self.pump(scene);
        while self.pending() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
            report.merge(self.pump(scene));
        }
        report
    }
}

fn apply(
    scene: &mut SceneGraph,
    uri: &str,
    destination: Destination,
    payload: Payload,
    report: &mut PumpReport,
) {
    match (destination, payload) {
        (Destination::Slot(slot), Payload::Model(model)) => {
            if slot.is_filled() {
                log::warn!("Slot {} already holds a model, ignoring {}", slot.name(), uri);
                return;
            }
            let loaded = model.attach(scene);
            log::info!(
                "Loaded model {} ({} meshes) as node {}",
                uri,
                loaded.mesh_count,
                loaded.root.index()
            );
            if slot.fill(loaded).is_ok() {
                report.models_attached += 1;
            }
        }
        (Destination::Texture(target), Payload::Texture(texture)) => {
            let (width, height) = (texture.width, texture.height);
            if scene.apply_texture(target, texture) {
                log::info!("Loaded texture {} ({}x{})", uri, width, height);
                report.textures_applied += 1;
            } else {
                log::warn!("Texture {} has no target to apply to", uri);
            }
        }
        _ => log::error!("Load of {} produced an unexpected payload", uri),
    }
}
