//! Deck description parsing for grid building.
//!
//! Keyword values are given in metres. `deck_units` only takes part in
//! GRIDUNIT scaling. All cell indices are 0-based.

use anyhow::{Context, Result};
use cpgrid::{
	AquiferCell, GridDims, GridInput, LengthUnit, MapAxes, MinpvInput, Nnc, PinchConfig, RefinementSpec,
	GLOBAL_LABEL,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const KNOWN_FLAGS: [&str; 3] = ["RADIAL", "SPIDER", "CIRCLE"];

/// Root deck description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeckConfig {
	/// Grid dimensions [nx, ny, nz].
	pub dimens: [usize; 3],
	/// Numeric grid keywords (COORD, ZCORN, DXV, TOPS, DRV, ...).
	#[serde(default)]
	pub keywords: BTreeMap<String, Vec<f64>>,
	/// Data-less keywords.
	#[serde(default)]
	pub flags: Vec<String>,
	pub inrad: Option<f64>,
	/// EGRID file to take geometry from, relative to the deck file.
	pub gdfile: Option<PathBuf>,
	pub actnum: Option<Vec<i32>>,
	#[serde(default = "default_units")]
	pub deck_units: String,
	pub gridunit: Option<String>,
	/// MAPAXES values x1 y1 x0 y0 x2 y2.
	pub mapaxes: Option<[f64; 6]>,
	pub mapunits: Option<String>,
	pub pinch: Option<PinchSection>,
	pub minpv: Option<f64>,
	#[serde(default)]
	pub aquifer: Vec<AquiferSection>,
	#[serde(default)]
	pub refinement: Vec<RefinementSection>,
	#[serde(default)]
	pub nnc: Vec<NncSection>,
}

/// PINCH record.
#[derive(Debug, Deserialize)]
pub struct PinchSection {
	pub threshold: f64,
	#[serde(default = "default_pinchout")]
	pub pinchout: String,
	#[serde(default = "default_multz")]
	pub multz: String,
	#[serde(default = "default_gap")]
	pub gap: String,
	#[serde(default = "default_max_empty_gap")]
	pub max_empty_gap: f64,
}

/// Numerical aquifer cell.
#[derive(Debug, Deserialize)]
pub struct AquiferSection {
	pub ijk: [usize; 3],
	pub depth: Option<f64>,
	pub pvtnum: Option<i32>,
	pub satnum: Option<i32>,
}

/// CARFIN-style refinement box.
#[derive(Debug, Deserialize)]
pub struct RefinementSection {
	pub name: String,
	#[serde(default = "default_parent")]
	pub parent: String,
	pub low: [usize; 3],
	pub up: [usize; 3],
	pub dims: [usize; 3],
}

#[derive(Debug, Deserialize)]
pub struct NncSection {
	pub cell1: usize,
	pub cell2: usize,
	#[serde(default)]
	pub trans: f64,
}

fn default_units() -> String {
	"METRES".to_string()
}

fn default_pinchout() -> String {
	"TOPBOT".to_string()
}

fn default_multz() -> String {
	"TOP".to_string()
}

fn default_gap() -> String {
	"GAP".to_string()
}

fn default_max_empty_gap() -> f64 {
	cpgrid::config::DEFAULT_MAX_EMPTY_GAP
}

fn default_parent() -> String {
	GLOBAL_LABEL.to_string()
}

impl DeckConfig {
	/// Load and validate a deck description from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read deck file: {}", path.display()))?;
		let config: DeckConfig = toml::from_str(&content).with_context(|| "Failed to parse deck TOML")?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		if self.dimens.contains(&0) {
			anyhow::bail!("dimens must be positive, got {:?}", self.dimens);
		}
		for flag in &self.flags {
			if !KNOWN_FLAGS.contains(&flag.to_ascii_uppercase().as_str()) {
				anyhow::bail!("Unknown flag '{flag}', expected one of {KNOWN_FLAGS:?}");
			}
		}
		LengthUnit::from_label(&self.deck_units)?;
		if let Some(unit) = &self.gridunit {
			LengthUnit::from_label(unit)?;
		}
		if self.mapunits.is_some() && self.mapaxes.is_none() {
			anyhow::bail!("mapunits given without mapaxes");
		}

		let cells = self.dims().cartesian_size();
		for nnc in &self.nnc {
			if nnc.cell1 >= cells || nnc.cell2 >= cells {
				anyhow::bail!("NNC ({}, {}) outside a grid of {cells} cells", nnc.cell1, nnc.cell2);
			}
		}
		for refinement in &self.refinement {
			if refinement.name.trim().is_empty() {
				anyhow::bail!("Refinement names must not be empty");
			}
		}
		Ok(())
	}

	pub fn dims(&self) -> GridDims {
		GridDims::from(self.dimens)
	}

	/// Unit to write EGRID output in when none is asked for: GRIDUNIT, else
	/// the deck units.
	pub fn output_unit(&self) -> Result<LengthUnit> {
		let label = self.gridunit.as_deref().unwrap_or(&self.deck_units);
		Ok(LengthUnit::from_label(label)?)
	}

	/// Library input for the deck. `base_dir` resolves a relative GDFILE.
	pub fn to_input(&self, base_dir: &Path) -> Result<GridInput> {
		let mut input = GridInput::new(self.dims()).with_deck_unit(LengthUnit::from_label(&self.deck_units)?);
		for (name, values) in &self.keywords {
			input = input.with_keyword(name, values.clone());
		}
		for flag in &self.flags {
			input = input.with_flag(flag);
		}
		if let Some(inrad) = self.inrad {
			input = input.with_inrad(inrad);
		}
		if let Some(gdfile) = &self.gdfile {
			input = input.with_gdfile(base_dir.join(gdfile));
		}
		if let Some(actnum) = &self.actnum {
			input = input.with_actnum(actnum.clone());
		}
		if let Some(unit) = &self.gridunit {
			input = input.with_gridunit(LengthUnit::from_label(unit)?);
		}
		if let Some(values) = self.mapaxes {
			let mut mapaxes = MapAxes::new(values)?;
			if let Some(units) = &self.mapunits {
				mapaxes = mapaxes.with_mapunits(units.clone());
			}
			input = input.with_mapaxes(mapaxes);
		}
		if let Some(pinch) = &self.pinch {
			input = input.with_pinch(PinchConfig {
				threshold: Some(pinch.threshold),
				pinchout: pinch.pinchout.parse()?,
				multz: pinch.multz.parse()?,
				gap: pinch.gap.parse()?,
				max_empty_gap: pinch.max_empty_gap,
			});
		}
		if let Some(minpv) = self.minpv {
			input = input.with_minpv(MinpvInput::Minpv(minpv));
		}
		for aquifer in &self.aquifer {
			let [i, j, k] = aquifer.ijk;
			let mut cell = AquiferCell::new(i, j, k);
			cell.depth = aquifer.depth;
			cell.pvtnum = aquifer.pvtnum;
			cell.satnum = aquifer.satnum;
			input = input.with_aquifer(cell);
		}
		Ok(input)
	}

	pub fn refinements(&self) -> Vec<RefinementSpec> {
		self
			.refinement
			.iter()
			.map(|r| RefinementSpec::new(&r.name, r.low, r.up, GridDims::from(r.dims)).with_parent(&r.parent))
			.collect()
	}

	pub fn nnc(&self) -> Nnc {
		let mut nnc = Nnc::new();
		for entry in &self.nnc {
			nnc.add(entry.cell1, entry.cell2, entry.trans);
		}
		nnc
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use cpgrid::PinchMode;

	fn write_deck(text: &str) -> (tempfile::TempDir, PathBuf) {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("deck.toml");
		std::fs::write(&path, text).unwrap();
		(dir, path)
	}

	const BOX_DECK: &str = r#"
dimens = [2, 1, 1]
flags = []
actnum = [1, 0]
gridunit = "FEET"
minpv = 0.5

[keywords]
DXV = [10.0, 10.0]
DYV = [5.0]
DZV = [2.0]
DEPTHZ = [1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0]

[pinch]
threshold = 0.1
multz = "ALL"

[[aquifer]]
ijk = [1, 0, 0]
depth = 1500.0

[[refinement]]
name = "LGR1"
low = [0, 0, 0]
up = [0, 0, 0]
dims = [2, 2, 1]

[[nnc]]
cell1 = 1
cell2 = 0
trans = 2.5
"#;

	/// A full deck maps onto every library input.
	#[test]
	fn test_load_box_deck() {
		let (dir, path) = write_deck(BOX_DECK);
		let config = DeckConfig::load(&path).unwrap();
		let input = config.to_input(dir.path()).unwrap();

		assert_eq!(input.dims(), GridDims::new(2, 1, 1));
		assert_eq!(input.keyword("DXV"), Some(&[10.0, 10.0][..]));
		assert_eq!(input.actnum(), Some(&[1, 0][..]));
		assert_eq!(input.gridunit(), Some(LengthUnit::Feet));
		assert_eq!(input.deck_unit(), LengthUnit::Metres);
		assert_eq!(input.pinch().threshold, Some(0.1));
		assert_eq!(input.pinch().multz, PinchMode::All);
		assert_eq!(input.pinch().pinchout, PinchMode::TopBot);
		assert_eq!(input.minpv(), Some(&MinpvInput::Minpv(0.5)));
		assert_eq!(input.aquifers()[0].depth, Some(1500.0));
		assert_eq!(config.output_unit().unwrap(), LengthUnit::Feet);

		let specs = config.refinements();
		assert_eq!((specs[0].name.as_str(), specs[0].parent.as_str()), ("LGR1", GLOBAL_LABEL));
		assert_eq!(config.nnc().input()[0].cell1, 0);
	}

	#[test]
	fn test_gdfile_relative_to_deck() {
		let (dir, path) = write_deck("dimens = [1, 1, 1]\ngdfile = \"base.EGRID\"\n");
		let input = DeckConfig::load(&path).unwrap().to_input(dir.path()).unwrap();
		assert_eq!(input.gdfile(), Some(dir.path().join("base.EGRID").as_path()));
	}

	#[test]
	fn test_rejects_zero_dims() {
		let (_dir, path) = write_deck("dimens = [0, 1, 1]\n");
		let err = DeckConfig::load(&path).unwrap_err();
		assert!(err.to_string().contains("dimens"), "{err}");
	}

	#[test]
	fn test_rejects_unknown_flag() {
		let (_dir, path) = write_deck("dimens = [1, 1, 1]\nflags = [\"HELIX\"]\n");
		assert!(DeckConfig::load(&path).is_err());
	}

	#[test]
	fn test_rejects_bad_units() {
		let (_dir, path) = write_deck("dimens = [1, 1, 1]\ndeck_units = \"YARDS\"\n");
		assert!(DeckConfig::load(&path).is_err());
	}

	#[test]
	fn test_rejects_nnc_outside_grid() {
		let (_dir, path) = write_deck("dimens = [1, 1, 1]\n[[nnc]]\ncell1 = 0\ncell2 = 1\n");
		assert!(DeckConfig::load(&path).is_err());
	}

	#[test]
	fn test_missing_file() {
		let err = DeckConfig::load(Path::new("/nonexistent/deck.toml")).unwrap_err();
		assert!(err.to_string().contains("Failed to read deck file"));
	}
}
