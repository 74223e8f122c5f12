//! Wavefront OBJ import.
//!
//! Line-by-line parsing of the common subset of the format:
//!
//! - `v x y z` — vertex position
//! - `vn x y z` — vertex normal
//! - `vt u v` — texture coordinate
//! - `f a b c ...` — face, fan-triangulated, with `v`, `v/vt`, `v//vn`
//!   and `v/vt/vn` index forms and negative (relative) indices
//! - `o` / `g` — starts a new mesh
//!
//! Unknown records (`mtllib`, `usemtl`, `s`, comments) are skipped. Faces
//! come back without a per-face material; callers attach materials at the
//! entity level.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::mesh::{Face, Mesh};

/// Errors that can occur while importing a model file.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("file contains no geometry")]
    Empty,
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Load an OBJ file into meshes.
pub fn load(path: &Path) -> ModelResult<Vec<Mesh>> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

/// Parse OBJ text into meshes.
pub fn parse(content: &str) -> ModelResult<Vec<Mesh>> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();

    let mut meshes: Vec<Mesh> = Vec::new();
    let mut builder = MeshBuilder::new();

    for (line_number, raw_line) in content.lines().enumerate() {
        let line_number = line_number + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or("");
        match keyword {
            "v" => positions.push(parse_vec3(&mut tokens, line_number)?),
            "vn" => normals.push(parse_vec3(&mut tokens, line_number)?),
            "vt" => uvs.push(parse_vec2(&mut tokens, line_number)?),
            "f" => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() < 3 {
                    return Err(ModelError::Parse {
                        line: line_number,
                        message: format!("face needs at least 3 vertices, got {}", corners.len()),
                    });
                }
                // Fan triangulation of polygons.
                let first =
                    builder.vertex(corners[0], &positions, &uvs, &normals, line_number)?;
                for window in corners[1..].windows(2) {
                    let second =
                        builder.vertex(window[0], &positions, &uvs, &normals, line_number)?;
                    let third =
                        builder.vertex(window[1], &positions, &uvs, &normals, line_number)?;
                    builder.faces.push(Face::new([first, second, third]));
                }
            }
            "o" | "g" => {
                if let Some(mesh) = builder.flush() {
                    meshes.push(mesh);
                }
            }
            // mtllib / usemtl / s / everything else: not our concern.
            _ => {}
        }
    }

    if let Some(mesh) = builder.flush() {
        meshes.push(mesh);
    }

    if meshes.is_empty() {
        return Err(ModelError::Empty);
    }
    Ok(meshes)
}

/// Accumulates one mesh, de-duplicating `v/vt/vn` corner triples into local
/// vertex indices (OBJ indexes the three attribute streams independently).
struct MeshBuilder {
    remap: HashMap<(usize, Option<usize>, Option<usize>), u32>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    faces: Vec<Face>,
    all_normals: bool,
    all_uvs: bool,
}

impl MeshBuilder {
    fn new() -> Self {
        Self {
            remap: HashMap::new(),
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            faces: Vec::new(),
            all_normals: true,
            all_uvs: true,
        }
    }

    fn vertex(
        &mut self,
        corner: &str,
        positions: &[Vec3],
        uvs: &[Vec2],
        normals: &[Vec3],
        line: usize,
    ) -> ModelResult<u32> {
        let mut parts = corner.split('/');
        let position = resolve_index(parts.next(), positions.len(), line)?.ok_or_else(|| {
            ModelError::Parse {
                line,
                message: format!("face corner '{corner}' has no position index"),
            }
        })?;
        let uv = resolve_index(parts.next(), uvs.len(), line)?;
        let normal = resolve_index(parts.next(), normals.len(), line)?;

        let key = (position, uv, normal);
        if let Some(&index) = self.remap.get(&key) {
            return Ok(index);
        }

        let index = self.positions.len() as u32;
        self.positions.push(positions[position]);
        match uv {
            Some(uv) => self.uvs.push(uvs[uv]),
            None => {
                self.uvs.push(Vec2::ZERO);
                self.all_uvs = false;
            }
        }
        match normal {
            Some(normal) => self.normals.push(normals[normal]),
            None => {
                self.normals.push(Vec3::Z);
                self.all_normals = false;
            }
        }
        self.remap.insert(key, index);
        Ok(index)
    }

    /// Finish the current mesh, if it has any faces, and reset.
    fn flush(&mut self) -> Option<Mesh> {
        if self.faces.is_empty() {
            return None;
        }
        let builder = std::mem::replace(self, Self::new());
        let normals = builder.all_normals.then_some(builder.normals);
        let uvs = builder.all_uvs.then_some(builder.uvs);
        Some(Mesh::new(builder.positions, normals, uvs, builder.faces))
    }
}

/// Resolve a 1-based (or negative, relative) OBJ index against a stream.
fn resolve_index(
    token: Option<&str>,
    len: usize,
    line: usize,
) -> ModelResult<Option<usize>> {
    let Some(token) = token else {
        return Ok(None);
    };
    if token.is_empty() {
        // The "v//vn" form has an empty middle field.
        return Ok(None);
    }

    let raw: i64 = token.parse().map_err(|_| ModelError::Parse {
        line,
        message: format!("invalid index '{token}'"),
    })?;

    let resolved = if raw > 0 {
        (raw - 1) as usize
    } else if raw < 0 {
        let back = (-raw) as usize;
        if back > len {
            return Err(ModelError::Parse {
                line,
                message: format!("relative index {raw} reaches before the stream start"),
            });
        }
        len - back
    } else {
        return Err(ModelError::Parse {
            line,
            message: "index 0 is not valid in OBJ".to_string(),
        });
    };

    if resolved >= len {
        return Err(ModelError::Parse {
            line,
            message: format!("index {raw} out of range (stream has {len} entries)"),
        });
    }
    Ok(Some(resolved))
}

fn parse_vec3<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> ModelResult<Vec3> {
    let x = parse_float(tokens.next(), line)?;
    let y = parse_float(tokens.next(), line)?;
    let z = parse_float(tokens.next(), line)?;
    Ok(Vec3::new(x, y, z))
}

fn parse_vec2<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> ModelResult<Vec2> {
    let u = parse_float(tokens.next(), line)?;
    let v = parse_float(tokens.next(), line)?;
    Ok(Vec2::new(u, v))
}

fn parse_float(token: Option<&str>, line: usize) -> ModelResult<f32> {
    let token = token.ok_or_else(|| ModelError::Parse {
        line,
        message: "missing numeric component".to_string(),
    })?;
    token.parse().map_err(|_| ModelError::Parse {
        line,
        message: format!("invalid number '{token}'"),
    })
}
