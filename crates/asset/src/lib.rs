//! Asset decoding (meshes, textures, shaders, sprite-sheets).
//! E1: minimal OBJ mesh loader producing CPU-friendly mesh data.
//! E2: texture loading (RGBA8) from PNG.
//! E3: shader text sources.
//! E4: sprite-sheet atlases (texture + cell grid).
//!
//! Everything in this crate is pure CPU work: no GPU handles, no windowing,
//! no threading. Decoders may therefore run on any worker thread; turning
//! their output into GPU-resident objects is the loader's job.

pub mod mesh;
pub mod obj;
pub mod shader;
pub mod sprite_sheet;
pub mod texture;
