//! The construct boundary: decoded data → engine-resident objects.

use asset::mesh::MeshData;
use asset::shader::ShaderSource;
use asset::sprite_sheet::SpriteSheetData;
use asset::texture::TextureData;

use crate::error::ConstructError;

/// Builds engine-resident objects from decoded data.
///
/// Implementations may talk to the graphics device, which is why every
/// method runs on the thread owning the loader and never on a worker.
/// Construction failures are recoverable per item: return a
/// [`ConstructError`] rather than panicking.
pub trait RenderBackend {
    type Texture;
    type Mesh;
    type Shader;
    type SpriteSheet;

    fn create_texture(&mut self, name: &str, data: TextureData)
    -> Result<Self::Texture, ConstructError>;

    fn create_mesh(&mut self, name: &str, data: MeshData) -> Result<Self::Mesh, ConstructError>;

    fn create_shader(
        &mut self,
        name: &str,
        source: ShaderSource,
    ) -> Result<Self::Shader, ConstructError>;

    fn create_sprite_sheet(
        &mut self,
        name: &str,
        data: SpriteSheetData,
    ) -> Result<Self::SpriteSheet, ConstructError>;
}

/// Backend that keeps decoded data as-is, after the same validity checks a
/// GPU upload would make. For tools, tests, and headless runs; a real
/// renderer supplies its own implementation over its device.
#[derive(Debug, Default)]
pub struct HeadlessBackend;

impl RenderBackend for HeadlessBackend {
    type Texture = TextureData;
    type Mesh = MeshData;
    type Shader = ShaderSource;
    type SpriteSheet = SpriteSheetData;

    fn create_texture(
        &mut self,
        name: &str,
        data: TextureData,
    ) -> Result<Self::Texture, ConstructError> {
        if !data.is_valid() {
            return Err(ConstructError::new(format!(
                "texture '{name}' has inconsistent dimensions"
            )));
        }
        Ok(data)
    }

    fn create_mesh(&mut self, name: &str, data: MeshData) -> Result<Self::Mesh, ConstructError> {
        if !data.is_valid() {
            return Err(ConstructError::new(format!(
                "mesh '{name}' has empty or out-of-range buffers"
            )));
        }
        Ok(data)
    }

    fn create_shader(
        &mut self,
        _name: &str,
        source: ShaderSource,
    ) -> Result<Self::Shader, ConstructError> {
        // Already validated non-empty at decode; nothing to compile here.
        Ok(source)
    }

    fn create_sprite_sheet(
        &mut self,
        name: &str,
        data: SpriteSheetData,
    ) -> Result<Self::SpriteSheet, ConstructError> {
        if !data.atlas.is_valid() {
            return Err(ConstructError::new(format!(
                "sprite-sheet '{name}' has an invalid atlas"
            )));
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_backend_passes_valid_data_through() {
        let mut backend = HeadlessBackend;
        let tex = backend
            .create_texture("checker", TextureData::checkerboard(8))
            .expect("valid texture");
        assert_eq!(tex.width, 8);
    }

    #[test]
    fn headless_backend_rejects_broken_mesh() {
        let mut backend = HeadlessBackend;
        let broken = MeshData::new(Vec::new(), vec![0, 1, 2]);
        assert!(backend.create_mesh("broken", broken).is_err());
    }
}
