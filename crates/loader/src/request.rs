//! Per-item load requests and the tagged decoded payload.

use std::fmt;
use std::path::PathBuf;

use asset::mesh::MeshData;
use asset::obj;
use asset::shader::ShaderSource;
use asset::sprite_sheet::{SheetGrid, SpriteSheetData};
use asset::texture::TextureData;

use crate::error::DecodeError;

/// Asset kinds the pipeline supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Mesh,
    Shader,
    SpriteSheet,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::Texture => "texture",
            AssetKind::Mesh => "mesh",
            AssetKind::Shader => "shader",
            AssetKind::SpriteSheet => "sprite-sheet",
        })
    }
}

/// One item of a load request: the pool name it will be installed under
/// plus the source to decode.
#[derive(Clone, Debug)]
pub enum AssetSpec {
    Texture {
        name: String,
        path: PathBuf,
    },
    Mesh {
        name: String,
        path: PathBuf,
    },
    Shader {
        name: String,
        path: PathBuf,
    },
    SpriteSheet {
        name: String,
        path: PathBuf,
        grid: SheetGrid,
    },
}

impl AssetSpec {
    pub fn texture(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Texture {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn mesh(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Mesh {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn shader(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Shader {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn sprite_sheet(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        grid: SheetGrid,
    ) -> Self {
        Self::SpriteSheet {
            name: name.into(),
            path: path.into(),
            grid,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Texture { name, .. }
            | Self::Mesh { name, .. }
            | Self::Shader { name, .. }
            | Self::SpriteSheet { name, .. } => name,
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Texture { .. } => AssetKind::Texture,
            Self::Mesh { .. } => AssetKind::Mesh,
            Self::Shader { .. } => AssetKind::Shader,
            Self::SpriteSheet { .. } => AssetKind::SpriteSheet,
        }
    }

    /// Run the CPU decode for this spec. Pure and GPU-free, safe on any
    /// worker thread.
    pub fn decode(&self) -> Result<DecodedAsset, DecodeError> {
        match self {
            Self::Texture { path, .. } => TextureData::load_png(path)
                .map(DecodedAsset::Texture)
                .map_err(DecodeError::from_parse),
            Self::Mesh { path, .. } => obj::load_path(path)
                .map(DecodedAsset::Mesh)
                .map_err(DecodeError::from_parse),
            Self::Shader { path, .. } => ShaderSource::load_path(path)
                .map(DecodedAsset::Shader)
                .map_err(DecodeError::from_parse),
            Self::SpriteSheet { path, grid, .. } => SpriteSheetData::load_png(path, *grid)
                .map(DecodedAsset::SpriteSheet)
                .map_err(DecodeError::from_parse),
        }
    }
}

/// Decoded payload travelling through the completion queue.
///
/// One case per supported kind: the queue stays allocation-light and the
/// install path is a plain match, with no type-erased dispatch in between.
#[derive(Debug)]
pub enum DecodedAsset {
    Texture(TextureData),
    Mesh(MeshData),
    Shader(ShaderSource),
    SpriteSheet(SpriteSheetData),
}

impl DecodedAsset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Texture(_) => AssetKind::Texture,
            Self::Mesh(_) => AssetKind::Mesh,
            Self::Shader(_) => AssetKind::Shader,
            Self::SpriteSheet(_) => AssetKind::SpriteSheet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_reports_name_and_kind() {
        let spec = AssetSpec::mesh("crate", "models/crate.obj");
        assert_eq!(spec.name(), "crate");
        assert_eq!(spec.kind(), AssetKind::Mesh);
        assert_eq!(spec.kind().to_string(), "mesh");
    }

    #[test]
    fn decode_of_missing_file_is_a_malformed_error() {
        let spec = AssetSpec::texture("ghost", "/definitely/not/here.png");
        let err = spec.decode().expect_err("missing file must fail");
        match err {
            DecodeError::Malformed(msg) => assert!(msg.contains("not/here.png")),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
