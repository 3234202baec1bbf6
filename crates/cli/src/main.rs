use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use skeleton::geom::{GeomCfg, Vec2};

mod input;

/// Compute the weighted straight skeleton of a monotone polygon.
#[derive(Parser, Debug)]
#[command(name = "skeleton-cli")]
struct Config {
    /// Input graph-markup file (vertices/edges block format).
    #[arg(long)]
    file_name: PathBuf,

    /// Output mesh file.
    #[arg(long)]
    output_file_name: PathBuf,

    /// Run the full monotonicity analyzer instead of assuming x-axis monotonicity.
    #[arg(long)]
    not_x_mon: bool,

    /// Duplicate the input polygon in the mesh, for testing; independent of
    /// skeleton computation.
    #[arg(long)]
    duplicate: bool,

    /// Emit a CSV timing row to stdout.
    #[arg(long)]
    timings: bool,

    /// Log intermediate stages.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let cfg = Config::parse();
    run(&cfg)
}

fn run(cfg: &Config) -> Result<()> {
    let start = Instant::now();
    let cgeo = GeomCfg::default();

    if cfg.verbose {
        tracing::info!(file = %cfg.file_name.display(), "reading input");
    }
    let poly = input::read_polygon(&cfg.file_name)
        .with_context(|| format!("reading {}", cfg.file_name.display()))?;

    let mono = if cfg.not_x_mon {
        skeleton::monotone::analyze(&poly, &cgeo)
    } else {
        skeleton::monotone::analyze_along(&poly, Vec2::new(1.0, 0.0), &cgeo)
    };
    let mono = match mono {
        Ok(mono) => mono,
        Err(skeleton::Error::NotMonotone) => {
            tracing::warn!("polygon is not monotone!");
            anyhow::bail!("polygon is not monotone");
        }
        Err(e) => return Err(e.into()),
    };
    if cfg.verbose {
        tracing::info!("monotonicity direction found");
    }

    let (chain_a, chain_b, edge_geoms) = skeleton::chain::decompose(&poly, &mono);
    if cfg.verbose {
        tracing::info!("chain decomposition done");
    }

    let mut wf_a = skeleton::wavefront::Wavefront::build(chain_a, edge_geoms.clone(), cgeo)?;
    let mut wf_b = skeleton::wavefront::Wavefront::build(chain_b, edge_geoms, cgeo)?;
    wf_a.run()?;
    wf_b.run()?;
    if cfg.verbose {
        tracing::info!("lower/upper skeleton done");
    }

    let computed = skeleton::skeleton::merge_upper_lower(wf_a, wf_b, &poly, &mono, &cgeo)?;
    if cfg.verbose {
        tracing::info!("merging upper and lower skeletons done");
    }

    let mut text = skeleton::output::write_mesh(&poly, &mono.bounds, &computed);
    if cfg.duplicate {
        text.push_str(&duplicate_input(&poly, &mono.bounds));
    }

    if let Some(parent) = cfg.output_file_name.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&cfg.output_file_name, text)
        .with_context(|| format!("writing {}", cfg.output_file_name.display()))?;
    if cfg.verbose {
        tracing::info!(path = %cfg.output_file_name.display(), "output written");
    }

    if cfg.timings {
        println!("stage,seconds");
        println!("total,{:.6}", start.elapsed().as_secs_f64());
    }

    Ok(())
}

/// Write the input polygon's own boundary a second time, offset to the
/// right of the unit-normalized mesh, as a mesh face — a debugging aid for
/// exercising the mesh writer independent of the skeleton computation.
fn duplicate_input(poly: &skeleton::Polygon, bounds: &skeleton::monotone::BoundingData) -> String {
    use std::fmt::Write as _;
    let width = (bounds.x_max - bounds.x_min).max(1e-9);
    let height = (bounds.y_max - bounds.y_min).max(1e-9);
    let mut out = String::new();
    for v in poly.vertices() {
        let x = (v.pos.x - bounds.x_min) / width + 1.1;
        let y = (v.pos.y - bounds.y_min) / height;
        let _ = writeln!(out, "v {:.9} {:.9} 0", x, y);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn runs_end_to_end_on_a_unit_square() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("square.txt");
        let output_path = dir.path().join("square.mesh");
        let mut f = fs::File::create(&input_path).unwrap();
        writeln!(
            f,
            "vertices\n0 0 0\n1 1 0\n2 1 1\n3 0 1\nedges\n0 0 1 1.0\n1 1 2 1.0\n2 2 3 1.0\n3 3 0 1.0\n"
        )
        .unwrap();

        let cfg = Config {
            file_name: input_path,
            output_file_name: output_path.clone(),
            not_x_mon: false,
            duplicate: false,
            timings: false,
            verbose: false,
        };
        run(&cfg).unwrap();
        let text = fs::read_to_string(&output_path).unwrap();
        assert!(text.lines().any(|l| l.starts_with("v ")));
    }
}
