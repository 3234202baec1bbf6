//! Graph-markup input reader: a small, explicitly non-core line format.
//!
//! Not a GraphML implementation — a `vertices` block of `id x y` lines
//! followed by an `edges` block of `id u v w` lines, blank lines and `#`
//! comments ignored. File existence is checked before open; any
//! inconsistency in the vertex/edge graph surfaces as
//! `skeleton::Error::MalformedInput` through `anyhow`.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use skeleton::geom::Point;
use skeleton::{Edge, Polygon, Vertex};

enum Section {
    None,
    Vertices,
    Edges,
}

pub fn read_polygon(path: &Path) -> Result<Polygon> {
    if !path.exists() {
        return Err(anyhow!("input file does not exist: {}", path.display()));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let mut vertices = Vec::new();
    let mut edges = Vec::new();
    let mut section = Section::None;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line {
            "vertices" => {
                section = Section::Vertices;
                continue;
            }
            "edges" => {
                section = Section::Edges;
                continue;
            }
            _ => {}
        }
        match section {
            Section::None => {
                return Err(anyhow!("line {}: expected 'vertices' or 'edges' section header", lineno + 1))
            }
            Section::Vertices => vertices.push(parse_vertex(line, lineno + 1)?),
            Section::Edges => edges.push(parse_edge(line, lineno + 1)?),
        }
    }

    Polygon::build(vertices, edges).map_err(|e| anyhow!("{}: {}", path.display(), e))
}

fn parse_vertex(line: &str, lineno: usize) -> Result<Vertex> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(anyhow!("line {}: expected 'id x y', got {:?}", lineno, line));
    }
    let id = fields[0]
        .parse::<u32>()
        .with_context(|| format!("line {}: bad vertex id", lineno))?;
    let x = fields[1]
        .parse::<f64>()
        .with_context(|| format!("line {}: bad x coordinate", lineno))?;
    let y = fields[2]
        .parse::<f64>()
        .with_context(|| format!("line {}: bad y coordinate", lineno))?;
    Ok(Vertex { id, pos: Point::new(x, y) })
}

fn parse_edge(line: &str, lineno: usize) -> Result<Edge> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(anyhow!("line {}: expected 'id u v w', got {:?}", lineno, line));
    }
    let id = fields[0]
        .parse::<u32>()
        .with_context(|| format!("line {}: bad edge id", lineno))?;
    let u = fields[1]
        .parse::<u32>()
        .with_context(|| format!("line {}: bad source vertex id", lineno))?;
    let v = fields[2]
        .parse::<u32>()
        .with_context(|| format!("line {}: bad target vertex id", lineno))?;
    let weight = fields[3]
        .parse::<f64>()
        .with_context(|| format!("line {}: bad weight", lineno))?;
    Ok(Edge { id, u, v, weight })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_a_unit_square() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(
            f,
            "vertices\n0 0 0\n1 1 0\n2 1 1\n3 0 1\nedges\n0 0 1 1.0\n1 1 2 1.0\n2 2 3 1.0\n3 3 0 1.0\n"
        )
        .unwrap();
        let poly = read_polygon(f.path()).unwrap();
        assert_eq!(poly.len(), 4);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_polygon(Path::new("/nonexistent/path/to/polygon.txt")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn malformed_edge_line_is_reported_with_line_number() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "vertices\n0 0 0\nedges\nbad line here\n").unwrap();
        let err = read_polygon(f.path()).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }
}
