//! The loader façade: the one object callers use.
//! L2: background decode on a worker pool, install on the owning thread.

use std::any::Any;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use asset::sprite_sheet::SheetGrid;

use crate::backend::RenderBackend;
use crate::barrier::{BarrierSet, BatchId, BatchReport, LoadOutcome};
use crate::error::{DecodeError, LoadError};
use crate::handle::Handle;
use crate::pool::ResourcePool;
use crate::queue::{Completion, CompletionQueue};
use crate::request::{AssetSpec, DecodedAsset};
use crate::workers::WorkerPool;

/// Asset loader: decodes on background workers, installs on the owning
/// thread.
///
/// The loader belongs to the thread that owns the graphics context. That
/// thread is the only one allowed to call anything here; workers reach
/// back only through the internal completion queue. The contract is
/// enforced by the type system (the loader is neither `Send` nor `Sync`)
/// instead of by a global.
///
/// Call [`pump`](Self::pump) once per tick: it installs every decode that
/// finished since the last call and fires batch callbacks whose last item
/// just landed. It never blocks.
///
/// ```no_run
/// use std::sync::Arc;
/// use loader::{AssetLoader, AssetSpec, HeadlessBackend};
///
/// let workers = Arc::new(
///     rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap(),
/// );
/// let mut loader = AssetLoader::new(HeadlessBackend, workers);
/// loader.request_batch(
///     vec![AssetSpec::texture("hero", "textures/hero.png")],
///     |report| log::info!("batch done, {} item(s) ok", report.succeeded()),
/// );
/// loop {
///     loader.pump(); // once per tick, on the thread owning the GPU
///     if loader.pending_batches() == 0 {
///         break;
///     }
/// }
/// ```
pub struct AssetLoader<B: RenderBackend> {
    backend: B,
    textures: ResourcePool<B::Texture>,
    meshes: ResourcePool<B::Mesh>,
    shaders: ResourcePool<B::Shader>,
    sprite_sheets: ResourcePool<B::SpriteSheet>,
    queue: Arc<CompletionQueue>,
    workers: Arc<dyn WorkerPool>,
    barriers: BarrierSet,
    // Pins the loader to its creating thread; see the type-level docs.
    _owner: PhantomData<*const ()>,
}

impl<B: RenderBackend> AssetLoader<B> {
    pub fn new(backend: B, workers: Arc<dyn WorkerPool>) -> Self {
        Self {
            backend,
            textures: ResourcePool::new(),
            meshes: ResourcePool::new(),
            shaders: ResourcePool::new(),
            sprite_sheets: ResourcePool::new(),
            queue: Arc::new(CompletionQueue::new()),
            workers,
            barriers: BarrierSet::new(),
            _owner: PhantomData,
        }
    }

    // ---- blocking loads (startup-critical assets) ----

    /// Decode and install a texture on the calling thread. Blocks for the
    /// whole decode + construct.
    pub fn load_texture(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Handle<B::Texture>, LoadError> {
        let spec = AssetSpec::texture(name, path);
        let DecodedAsset::Texture(data) = spec.decode()? else {
            unreachable!("texture spec decoded to another kind");
        };
        let name = spec.name();
        let value = self.backend.create_texture(name, data)?;
        let handle = self.textures.emplace(name, value);
        log::info!("loaded texture '{name}' (blocking)");
        Ok(handle)
    }

    /// Blocking mesh load; see [`load_texture`](Self::load_texture).
    pub fn load_mesh(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Handle<B::Mesh>, LoadError> {
        let spec = AssetSpec::mesh(name, path);
        let DecodedAsset::Mesh(data) = spec.decode()? else {
            unreachable!("mesh spec decoded to another kind");
        };
        let name = spec.name();
        let value = self.backend.create_mesh(name, data)?;
        let handle = self.meshes.emplace(name, value);
        log::info!("loaded mesh '{name}' (blocking)");
        Ok(handle)
    }

    /// Blocking shader load; see [`load_texture`](Self::load_texture).
    pub fn load_shader(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Handle<B::Shader>, LoadError> {
        let spec = AssetSpec::shader(name, path);
        let DecodedAsset::Shader(source) = spec.decode()? else {
            unreachable!("shader spec decoded to another kind");
        };
        let name = spec.name();
        let value = self.backend.create_shader(name, source)?;
        let handle = self.shaders.emplace(name, value);
        log::info!("loaded shader '{name}' (blocking)");
        Ok(handle)
    }

    /// Blocking sprite-sheet load; see [`load_texture`](Self::load_texture).
    pub fn load_sprite_sheet(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        grid: SheetGrid,
    ) -> Result<Handle<B::SpriteSheet>, LoadError> {
        let spec = AssetSpec::sprite_sheet(name, path, grid);
        let DecodedAsset::SpriteSheet(data) = spec.decode()? else {
            unreachable!("sprite-sheet spec decoded to another kind");
        };
        let name = spec.name();
        let value = self.backend.create_sprite_sheet(name, data)?;
        let handle = self.sprite_sheets.emplace(name, value);
        log::info!("loaded sprite-sheet '{name}' (blocking)");
        Ok(handle)
    }

    // ---- background loads ----

    /// Fire-and-forget batch load. Registers one barrier sized to the
    /// batch and enqueues one decode job per item on the worker pool,
    /// then returns immediately.
    ///
    /// `on_all_done` fires exactly once, during the [`pump`](Self::pump)
    /// call that installs the batch's last item, after every item is
    /// accounted for, failures included. Check the report's per-item
    /// outcomes before fetching anything by name.
    ///
    /// An empty batch fires `on_all_done` before this returns.
    pub fn request_batch(
        &mut self,
        specs: Vec<AssetSpec>,
        on_all_done: impl FnOnce(BatchReport) + 'static,
    ) -> BatchId {
        let batch = self.barriers.insert(specs.len(), on_all_done);
        log::info!("{batch}: requesting {} item(s)", specs.len());

        for spec in specs {
            let queue = Arc::clone(&self.queue);
            let name = spec.name().to_string();
            let kind = spec.kind();
            self.workers.enqueue(Box::new(move || {
                // Decode is pure CPU work; the GPU side happens at install.
                let payload = contained_decode(|| spec.decode());
                log::debug!("{batch}: decoded '{name}' ({kind}), ok={}", payload.is_ok());
                queue.submit(Completion {
                    batch,
                    name,
                    kind,
                    payload,
                });
            }));
        }
        batch
    }

    /// Install everything that finished decoding since the last call.
    ///
    /// Call once per tick from the owning thread. Detaches the completion
    /// queue under its lock, then constructs and installs outside it, in
    /// submission order. Never blocks on an empty queue. Returns the
    /// number of records processed.
    pub fn pump(&mut self) -> usize {
        let records = self.queue.drain();
        let count = records.len();
        for record in records {
            self.install(record);
        }
        count
    }

    /// Batches whose callback has not fired yet.
    pub fn pending_batches(&self) -> usize {
        self.barriers.outstanding()
    }

    // ---- pools & backend ----

    pub fn textures(&self) -> &ResourcePool<B::Texture> {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut ResourcePool<B::Texture> {
        &mut self.textures
    }

    pub fn meshes(&self) -> &ResourcePool<B::Mesh> {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut ResourcePool<B::Mesh> {
        &mut self.meshes
    }

    pub fn shaders(&self) -> &ResourcePool<B::Shader> {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut ResourcePool<B::Shader> {
        &mut self.shaders
    }

    pub fn sprite_sheets(&self) -> &ResourcePool<B::SpriteSheet> {
        &self.sprite_sheets
    }

    pub fn sprite_sheets_mut(&mut self) -> &mut ResourcePool<B::SpriteSheet> {
        &mut self.sprite_sheets
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ---- internals ----

    /// Process one drained record: construct, emplace, notify the barrier.
    /// A failure is confined to its record; the rest of the drain goes on.
    fn install(&mut self, record: Completion) {
        let Completion {
            batch,
            name,
            kind,
            payload,
        } = record;

        let result = match payload {
            Ok(decoded) => self.install_decoded(&name, decoded),
            Err(err) => Err(LoadError::Decode(err)),
        };

        match &result {
            Ok(()) => log::debug!("{batch}: installed {kind} '{name}'"),
            Err(err) => log::warn!("{batch}: '{name}' ({kind}) failed: {err}"),
        }

        self.barriers.notify(batch, LoadOutcome { name, kind, result });
    }

    fn install_decoded(&mut self, name: &str, decoded: DecodedAsset) -> Result<(), LoadError> {
        match decoded {
            DecodedAsset::Texture(data) => {
                let value = self.backend.create_texture(name, data)?;
                self.textures.emplace(name, value);
            }
            DecodedAsset::Mesh(data) => {
                let value = self.backend.create_mesh(name, data)?;
                self.meshes.emplace(name, value);
            }
            DecodedAsset::Shader(source) => {
                let value = self.backend.create_shader(name, source)?;
                self.shaders.emplace(name, value);
            }
            DecodedAsset::SpriteSheet(data) => {
                let value = self.backend.create_sprite_sheet(name, data)?;
                self.sprite_sheets.emplace(name, value);
            }
        }
        Ok(())
    }
}

/// Run a decode behind a panic guard: an unwind becomes a [`DecodeError`]
/// value, so nothing propagates into the worker pool and a panicking item
/// still advances its batch.
fn contained_decode(
    decode: impl FnOnce() -> Result<DecodedAsset, DecodeError>,
) -> Result<DecodedAsset, DecodeError> {
    panic::catch_unwind(AssertUnwindSafe(decode))
        .unwrap_or_else(|payload| Err(DecodeError::Panicked(panic_text(payload.as_ref()))))
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
