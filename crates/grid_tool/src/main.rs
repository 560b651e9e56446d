//! Corner-point grid builder and EGRID inspector.
//!
//! `build` turns a TOML deck description into an EGRID file:
//! - keyword groups select the grid builder (COORD/ZCORN, DEPTHZ, TOPS,
//!   RADIAL/SPIDER or GDFILE)
//! - `[[refinement]]` boxes become local grids
//! - `[[nnc]]` pairs are written as NNC1/NNC2
//!
//! `inspect` prints a summary of an existing EGRID file.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cpgrid::{CornerPointGrid, EgridFile, HostMapping, LengthUnit};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use config::DeckConfig;

/// Corner-point grid tool.
#[derive(Parser, Debug)]
#[command(name = "cpgrid")]
#[command(about = "Builds and inspects corner-point EGRID files")]
struct Args {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Build a grid from a deck description and save it as EGRID.
	Build {
		/// Path to the deck TOML file.
		#[arg(short, long)]
		config: PathBuf,

		/// Output EGRID path.
		#[arg(short, long)]
		output: PathBuf,

		/// Output length unit (METRES, FEET or CM). Defaults to the deck's
		/// GRIDUNIT, else its deck units.
		#[arg(short, long)]
		units: Option<String>,

		/// Map refined cells to hosts by cell center instead of index.
		#[arg(long)]
		geometrical_hosts: bool,
	},
	/// Print a summary of an EGRID file.
	Inspect {
		/// Path to the EGRID file.
		#[arg(short, long)]
		grid: PathBuf,
	},
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cpgrid=info,grid_tool=info")),
		)
		.init();

	match Args::parse().command {
		Command::Build {
			config,
			output,
			units,
			geometrical_hosts,
		} => {
			let mapping = if geometrical_hosts {
				HostMapping::Geometrical
			} else {
				HostMapping::Logical
			};
			build(&config, &output, units.as_deref(), mapping)?;
		}
		Command::Inspect { grid } => {
			let summary = inspect(&grid)?;
			print!("{summary}");
		}
	}
	Ok(())
}

/// Build the grid a deck describes and save it to `output`.
fn build(config_path: &Path, output: &Path, units: Option<&str>, mapping: HostMapping) -> Result<CornerPointGrid> {
	println!("Loading deck from: {}", config_path.display());
	let config = DeckConfig::load(config_path)?;
	let base_dir = config_path.parent().unwrap_or(Path::new("."));

	let input = config.to_input(base_dir)?;
	let mut grid = CornerPointGrid::from_input(&input, None)
		.with_context(|| format!("Failed to build grid from: {}", config_path.display()))?;
	println!(
		"Built {}x{}x{} grid with {} active cells",
		grid.nx(),
		grid.ny(),
		grid.nz(),
		grid.num_active()
	);
	if grid.zcorn_fixed() > 0 {
		println!("  Adjusted {} corner depths", grid.zcorn_fixed());
	}

	let specs = config.refinements();
	if !specs.is_empty() {
		grid
			.init_lgr_cells(&specs, mapping)
			.context("Failed to initialise local grid refinements")?;
		println!(
			"  {} refinements, {} active cells in the tree",
			specs.len(),
			grid.total_active_lgr()
		);
	}

	let unit = match units {
		Some(label) => LengthUnit::from_label(label)?,
		None => config.output_unit()?,
	};
	let nnc = config.nnc();
	grid
		.save(output, &nnc, unit)
		.with_context(|| format!("Failed to write: {}", output.display()))?;

	println!("\nDone! Output written to: {} ({})", output.display(), unit.label());
	Ok(grid)
}

/// Human-readable summary of an EGRID file.
fn inspect(path: &Path) -> Result<String> {
	let file = EgridFile::open(path).with_context(|| format!("Failed to read: {}", path.display()))?;
	let grid = CornerPointGrid::load(path).with_context(|| format!("Failed to load grid: {}", path.display()))?;

	let total_volume: f64 = grid.active_volume().iter().sum();
	let (min_depth, max_depth) = grid
		.zcorn()
		.iter()
		.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &z| (lo.min(z), hi.max(z)));

	let mut out = String::new();
	out.push_str(&format!("Grid: {}\n", path.display()));
	out.push_str(&format!("Dimensions: {} x {} x {}\n", grid.nx(), grid.ny(), grid.nz()));
	out.push_str(&format!("Active cells: {} of {}\n", grid.num_active(), grid.cartesian_size()));
	out.push_str(&format!("Total active volume: {total_volume:.3} m3\n"));
	out.push_str(&format!("Depth range: {min_depth:.3} .. {max_depth:.3} m\n"));

	out.push_str("\nArrays:\n");
	for (name, code, len) in file.array_list() {
		out.push_str(&format!("  {name:<8} {code} {len}\n"));
	}

	let labels = file.lgr_labels();
	if !labels.is_empty() {
		out.push_str(&format!("\nLocal grids: {}\n", labels.join(", ")));
	}
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	const DECK: &str = r#"
dimens = [3, 3, 1]

[keywords]
DXV = [10.0, 10.0, 10.0]
DYV = [10.0, 10.0, 10.0]
DZV = [5.0]
TOPS = [1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0]

[[refinement]]
name = "LGR1"
low = [1, 1, 0]
up = [1, 1, 0]
dims = [3, 3, 1]

[[nnc]]
cell1 = 0
cell2 = 8
trans = 1.0
"#;

	fn deck_dir() -> (tempfile::TempDir, PathBuf) {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("deck.toml");
		std::fs::write(&path, DECK).unwrap();
		(dir, path)
	}

	/// Build writes the refinement and NNC sections; inspect reads them back.
	#[test]
	fn test_build_then_inspect() {
		let (dir, deck) = deck_dir();
		let output = dir.path().join("OUT.EGRID");
		let grid = build(&deck, &output, None, HostMapping::Logical).unwrap();
		assert_eq!(grid.total_active_lgr(), 17);

		let summary = inspect(&output).unwrap();
		assert!(summary.contains("Dimensions: 3 x 3 x 1"), "{summary}");
		assert!(summary.contains("Active cells: 9 of 9"), "{summary}");
		assert!(summary.contains("Total active volume: 4500.000 m3"), "{summary}");
		assert!(summary.contains("Depth range: 1000.000 .. 1005.000 m"), "{summary}");
		assert!(summary.contains("Local grids: LGR1"), "{summary}");
		assert!(summary.contains("NNC1"), "{summary}");
	}

	#[test]
	fn test_build_in_feet() {
		let (dir, deck) = deck_dir();
		let output = dir.path().join("FT.EGRID");
		build(&deck, &output, Some("FEET"), HostMapping::Geometrical).unwrap();
		let file = EgridFile::open(&output).unwrap();
		assert_eq!(file.chars("GRIDUNIT").unwrap()[0], "FEET");
	}

	#[test]
	fn test_build_rejects_unknown_units() {
		let (dir, deck) = deck_dir();
		assert!(build(&deck, &dir.path().join("X.EGRID"), Some("YARDS"), HostMapping::Logical).is_err());
	}

	#[test]
	fn test_inspect_missing_file() {
		let err = inspect(Path::new("/nonexistent/GRID.EGRID")).unwrap_err();
		assert!(err.to_string().contains("Failed to read"));
	}
}
