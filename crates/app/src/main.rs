//! Entry point for the Zarya3D asset-pipeline demo.
//! Headless: bakes a few sample assets to a scratch directory, then loads
//! them through the loader the way a game tick would: one blocking
//! startup asset, the rest as a background batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use asset::sprite_sheet::SheetGrid;
use asset::texture::TextureData;
use loader::{AssetLoader, AssetSpec, HeadlessBackend};

fn parse_workers_arg() -> usize {
    // --workers=N, default 4
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--workers=") {
            if let Ok(n) = val.parse::<usize>() {
                return n.max(1);
            }
            eprintln!("[warn] Bad --workers value '{}', using default.", val);
        }
    }
    4
}

fn parse_assets_dir_arg() -> PathBuf {
    // --assets-dir=PATH, default: scratch dir under the system temp dir
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--assets-dir=") {
            return PathBuf::from(val);
        }
    }
    std::env::temp_dir().join("zarya3d-demo")
}

const QUAD_OBJ: &str = "\
# demo quad
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

const POST_WGSL: &str = "\
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 1.0, 1.0);
}
";

/// Bake the demo assets the loader will read back.
fn bake_demo_assets(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create assets dir {}", dir.display()))?;

    std::fs::write(dir.join("quad.obj"), QUAD_OBJ)?;
    std::fs::write(dir.join("post.wgsl"), POST_WGSL)?;

    let checker = TextureData::checkerboard(64);
    std::fs::write(dir.join("checker.png"), checker.encode_png()?)?;

    // 4x2 sheet of 16px cells, each cell tinted by its index.
    let (w, h) = (64u32, 32u32);
    let mut pixels = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let cell = (y / 16) * 4 + (x / 16);
            pixels.extend_from_slice(&[(cell * 32) as u8, 64, 128, 255]);
        }
    }
    let sheet = TextureData::new_rgba8(w, h, pixels);
    std::fs::write(dir.join("walk.png"), sheet.encode_png()?)?;

    log::info!("baked demo assets into {}", dir.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let workers = parse_workers_arg();
    let assets_dir = parse_assets_dir_arg();
    log::info!(
        "Starting Zarya3D asset demo. workers={}, assets_dir={}",
        workers,
        assets_dir.display()
    );

    bake_demo_assets(&assets_dir)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("decode-{i}"))
        .build()
        .context("Failed to build decode worker pool")?;
    let mut loader = AssetLoader::new(HeadlessBackend, Arc::new(pool));

    // Startup-critical asset: block on it before the loop starts.
    let post = loader.load_shader("post", assets_dir.join("post.wgsl"))?;
    log::info!(
        "post shader ready ({} line(s))",
        loader.shaders()[post].line_count()
    );

    // Everything else goes through the background path.
    loader.request_batch(
        vec![
            AssetSpec::texture("checker", assets_dir.join("checker.png")),
            AssetSpec::mesh("quad", assets_dir.join("quad.obj")),
            AssetSpec::sprite_sheet(
                "walk",
                assets_dir.join("walk.png"),
                SheetGrid::new(16, 16, 4, 2),
            ),
            // Deliberately absent: shows up in the report as a failure
            // without sinking the batch.
            AssetSpec::texture("missing", assets_dir.join("missing.png")),
        ],
        |report| {
            for item in &report.items {
                match &item.result {
                    Ok(()) => log::info!("  {} '{}' ok", item.kind, item.name),
                    Err(err) => log::warn!("  {} '{}' failed: {err}", item.kind, item.name),
                }
            }
            log::info!(
                "batch finished: {}/{} ok",
                report.succeeded(),
                report.items.len()
            );
        },
    );

    // Stand-in for the render loop: pump once per tick.
    while loader.pending_batches() > 0 {
        loader.pump();
        thread::sleep(Duration::from_millis(2));
    }

    if let Some(h) = loader.textures().find("checker") {
        let tex = &loader.textures()[h];
        log::info!("checker texture installed: {}x{}", tex.width, tex.height);
    }
    if let Some(h) = loader.meshes().find("quad") {
        log::info!(
            "quad mesh installed: {} triangle(s)",
            loader.meshes()[h].triangle_count()
        );
    }
    if let Some(h) = loader.sprite_sheets().find("walk") {
        let sheet = &loader.sprite_sheets()[h];
        log::info!(
            "walk sheet installed: {} cells, cell 0 at {:?}",
            sheet.grid.cell_count(),
            sheet.cell_rect(0)
        );
    }

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
