//! Minimal OBJ parser: positions, normals, texture coordinates, fan
//! triangulation. Directives outside that set (o/g/s/usemtl/mtllib) are
//! ignored.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    str::SplitWhitespace,
};

use anyhow::{Context, Result, anyhow, bail};

use crate::mesh::{MeshData, MeshVertex};

/// Load an OBJ mesh from a file path.
pub fn load_path(path: impl AsRef<Path>) -> Result<MeshData> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.as_ref().display()))?;
    load_reader(BufReader::new(file))
}

/// Load an OBJ mesh from any [`BufRead`] implementation.
pub fn load_reader<R: BufRead>(reader: R) -> Result<MeshData> {
    let mut accum = ObjAccum::default();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        accum.line(line_no + 1, &line)?;
    }
    accum.finish()
}

/// Parse an OBJ document held in memory.
pub fn load_str(contents: &str) -> Result<MeshData> {
    load_reader(io::Cursor::new(contents))
}

/// Face corner: position index plus optional texcoord/normal indices,
/// all zero-based after resolution.
type CornerKey = (usize, Option<usize>, Option<usize>);

#[derive(Default)]
struct ObjAccum {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    dedup: HashMap<CornerKey, u32>,
    mesh: MeshData,
}

impl ObjAccum {
    fn line(&mut self, no: usize, raw: &str) -> Result<()> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let mut fields = line.split_whitespace();
        match fields.next().unwrap_or("") {
            "v" => {
                let p = read_vec3(&mut fields, no)?;
                self.positions.push(p);
            }
            "vn" => {
                let n = read_vec3(&mut fields, no)?;
                self.normals.push(n);
            }
            "vt" => {
                let t = read_vec2(&mut fields, no)?;
                self.texcoords.push(t);
            }
            "f" => self.face(fields, no)?,
            _ => {
                // Unknown or unsupported directive; skip.
            }
        }
        Ok(())
    }

    fn face(&mut self, fields: SplitWhitespace<'_>, no: usize) -> Result<()> {
        let mut corners: Vec<u32> = Vec::with_capacity(4);
        for token in fields {
            corners.push(self.corner(token, no)?);
        }
        if corners.len() < 3 {
            bail!("Face with fewer than 3 vertices on line {no}");
        }
        // Triangulate fan
        for i in 1..corners.len() - 1 {
            self.mesh
                .indices
                .extend([corners[0], corners[i], corners[i + 1]]);
        }
        Ok(())
    }

    /// Resolve one `v[/vt[/vn]]` token to a deduplicated vertex index.
    fn corner(&mut self, token: &str, no: usize) -> Result<u32> {
        let key = parse_corner(
            token,
            self.positions.len(),
            self.texcoords.len(),
            self.normals.len(),
            no,
        )?;
        if let Some(&idx) = self.dedup.get(&key) {
            return Ok(idx);
        }

        let (pi, ti, ni) = key;
        let vertex = MeshVertex::new(
            self.positions[pi],
            ni.map(|i| self.normals[i]).unwrap_or([0.0, 0.0, 1.0]),
            ti.map(|i| self.texcoords[i]).unwrap_or([0.0, 0.0]),
        );

        let idx = u32::try_from(self.mesh.vertices.len())
            .map_err(|_| anyhow!("Too many vertices in OBJ (>{})", u32::MAX))?;
        self.mesh.vertices.push(vertex);
        self.dedup.insert(key, idx);
        Ok(idx)
    }

    fn finish(self) -> Result<MeshData> {
        if self.mesh.vertices.is_empty() || self.mesh.indices.is_empty() {
            bail!("OBJ contained no triangles");
        }
        Ok(self.mesh)
    }
}

fn read_f32(field: Option<&str>, no: usize, what: &str) -> Result<f32> {
    let token = field.ok_or_else(|| anyhow!("Missing {what} on line {no}"))?;
    token
        .parse::<f32>()
        .with_context(|| format!("Failed to parse {what} on line {no}"))
}

fn read_vec3(fields: &mut SplitWhitespace<'_>, no: usize) -> Result<[f32; 3]> {
    Ok([
        read_f32(fields.next(), no, "x component")?,
        read_f32(fields.next(), no, "y component")?,
        read_f32(fields.next(), no, "z component")?,
    ])
}

fn read_vec2(fields: &mut SplitWhitespace<'_>, no: usize) -> Result<[f32; 2]> {
    Ok([
        read_f32(fields.next(), no, "u component")?,
        read_f32(fields.next(), no, "v component")?,
    ])
}

fn parse_corner(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
    no: usize,
) -> Result<CornerKey> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .ok_or_else(|| anyhow!("Malformed face element '{token}' on line {no}"))?;
    let pos_idx = obj_index(pos, pos_count, no)?;

    let tex_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(obj_index(value, tex_count, no)?),
        _ => None,
    };
    let norm_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(obj_index(value, norm_count, no)?),
        _ => None,
    };

    Ok((pos_idx, tex_idx, norm_idx))
}

/// OBJ indices are 1-based; negative values count back from the end of the
/// array seen so far.
fn obj_index(token: &str, len: usize, no: usize) -> Result<usize> {
    let raw = token
        .parse::<i64>()
        .with_context(|| format!("Invalid index '{token}' on line {no}"))?;
    if raw == 0 {
        bail!("OBJ indices are 1-based; found 0 on line {no}");
    }

    let idx = if raw > 0 {
        raw - 1
    } else {
        len as i64 + raw
    };

    if idx < 0 || idx as usize >= len {
        bail!("OBJ index {raw} resolved out of bounds (len={len}) on line {no}");
    }
    Ok(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"
        v 0.0 0.0 0.0
        v 1.0 0.0 0.0
        v 0.0 1.0 0.0
        vn 0.0 0.0 1.0
        vt 0.0 0.0
        vt 1.0 0.0
        vt 0.0 1.0
        f 1/1/1 2/2/1 3/3/1
    "#;

    #[test]
    fn parse_simple_triangle() {
        let mesh = load_str(TRIANGLE).expect("parse triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices.len(), 3);
        assert!(mesh.is_valid());
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            f 1 2 3 4
        ";
        let mesh = load_str(src).expect("parse quad");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn negative_indices_resolve_from_end() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f -3 -2 -1
        ";
        let mesh = load_str(src).expect("parse negative indices");
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn missing_attributes_get_defaults() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f 1 2 3
        ";
        let mesh = load_str(src).expect("parse bare positions");
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
    }

    #[test]
    fn shared_corners_are_deduplicated() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            f 1 2 3
            f 1 3 4
        ";
        let mesh = load_str(src).expect("parse two triangles");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn out_of_bounds_index_is_an_error() {
        let src = "
            v 0 0 0
            f 1 2 3
        ";
        assert!(load_str(src).is_err());
    }

    #[test]
    fn empty_document_is_an_error() {
        assert!(load_str("# nothing here\n").is_err());
    }
}
