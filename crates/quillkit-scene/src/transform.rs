//! Transform-attribute compilation.
//!
//! The attribute text is lexed into `name(params...)` entries, then
//! compiled into one affine matrix. Compilation walks the entry list in
//! reverse, pre-multiplying each entry, so the net matrix applies the
//! entries left-to-right as nested local coordinate frames.

use crate::Diagnostic;
use quillkit_geom::Matrix;
use quillkit_markup::parse_number_list;
use tracing::warn;

/// One lexed transform-list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformEntry {
    pub name: String,
    pub params: Vec<f32>,
}

/// Lex a transform attribute into its command entries.
pub fn lex_transform(s: &str) -> Vec<TransformEntry> {
    let mut entries = Vec::new();
    for segment in s.split(')') {
        let Some((name, params)) = segment.split_once('(') else {
            continue;
        };
        let name = name.trim_matches(|c: char| c.is_whitespace() || c == ',');
        if name.is_empty() {
            continue;
        }
        entries.push(TransformEntry {
            name: name.to_string(),
            params: parse_number_list(params),
        });
    }
    entries
}

/// Compile a lexed entry list into one matrix.
///
/// Returns `None` for an empty list (no transform). A `matrix(...)` literal
/// is authoritative: it overwrites the accumulation and terminates
/// processing of the remaining (earlier-listed) entries.
pub fn compile(entries: &[TransformEntry], diagnostics: &mut Vec<Diagnostic>) -> Option<Matrix> {
    if entries.is_empty() {
        return None;
    }

    let mut m = Matrix::identity();
    for entry in entries.iter().rev() {
        let p = &entry.params;
        match entry.name.as_str() {
            "matrix" if p.len() >= 6 => {
                m = Matrix {
                    a: p[0],
                    b: p[1],
                    c: p[2],
                    d: p[3],
                    tx: p[4],
                    ty: p[5],
                };
                break;
            }
            "translate" => {
                let dx = p.first().copied().unwrap_or(0.0);
                let dy = p.get(1).copied().unwrap_or(0.0);
                m = Matrix::translation(dx, dy).multiply(&m);
            }
            "scale" => {
                let sx = p.first().copied().unwrap_or(1.0);
                let sy = p.get(1).copied().unwrap_or(sx);
                m = Matrix::scaling(sx, sy).multiply(&m);
            }
            "rotate" => {
                let angle = p.first().copied().unwrap_or(0.0);
                let rotation = if p.len() >= 3 {
                    // Rotate about a pivot: translate there, rotate,
                    // translate back.
                    Matrix::translation(p[1], p[2])
                        .multiply(&Matrix::rotation(angle))
                        .multiply(&Matrix::translation(-p[1], -p[2]))
                } else {
                    Matrix::rotation(angle)
                };
                m = rotation.multiply(&m);
            }
            other => {
                warn!(command = other, "skipping unrecognized transform command");
                diagnostics.push(Diagnostic::UnsupportedTransform {
                    name: other.to_string(),
                });
            }
        }
    }
    Some(m)
}
