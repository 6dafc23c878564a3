//! Sprite-sheet atlases.
//! E4: a sheet is one texture plus a uniform cell grid; draw code addresses
//! cells by index and gets back a pixel rectangle.

use std::path::Path;

use anyhow::{Result, bail};

use crate::texture::TextureData;

/// Uniform cell grid over an atlas texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetGrid {
    pub cell_width: u32,
    pub cell_height: u32,
    pub columns: u32,
    pub rows: u32,
}

impl SheetGrid {
    pub fn new(cell_width: u32, cell_height: u32, columns: u32, rows: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            columns,
            rows,
        }
    }

    pub fn cell_count(&self) -> u32 {
        self.columns * self.rows
    }
}

/// Decoded sprite-sheet: atlas pixels plus the grid that tiles them.
#[derive(Clone, Debug)]
pub struct SpriteSheetData {
    pub atlas: TextureData,
    pub grid: SheetGrid,
}

impl SpriteSheetData {
    /// Pair an atlas with its grid. The grid must tile the atlas exactly;
    /// a sheet whose image grew without the grid being updated is a content
    /// bug worth failing loudly on.
    pub fn from_texture(atlas: TextureData, grid: SheetGrid) -> Result<Self> {
        if grid.cell_width == 0 || grid.cell_height == 0 || grid.cell_count() == 0 {
            bail!("Sprite-sheet grid has zero-sized cells or no cells");
        }
        let (need_w, need_h) = (
            grid.columns * grid.cell_width,
            grid.rows * grid.cell_height,
        );
        if need_w != atlas.width || need_h != atlas.height {
            bail!(
                "Sprite-sheet grid {}x{} cells of {}x{}px needs a {}x{} atlas, got {}x{}",
                grid.columns,
                grid.rows,
                grid.cell_width,
                grid.cell_height,
                need_w,
                need_h,
                atlas.width,
                atlas.height
            );
        }
        Ok(Self { atlas, grid })
    }

    /// Load a sheet from a PNG file and validate it against `grid`.
    pub fn load_png(path: impl AsRef<Path>, grid: SheetGrid) -> Result<Self> {
        let atlas = TextureData::load_png(path)?;
        Self::from_texture(atlas, grid)
    }

    /// Pixel rectangle `[x, y, w, h]` of a cell, row-major. `None` when the
    /// index is outside the grid.
    pub fn cell_rect(&self, index: u32) -> Option<[u32; 4]> {
        if index >= self.grid.cell_count() {
            return None;
        }
        let col = index % self.grid.columns;
        let row = index / self.grid.columns;
        Some([
            col * self.grid.cell_width,
            row * self.grid.cell_height,
            self.grid.cell_width,
            self.grid.cell_height,
        ])
    }
}
