//! Pinch-out and minimum pore volume settings carried by a grid.

use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Default PINCH maximum empty gap.
pub const DEFAULT_MAX_EMPTY_GAP: f64 = 1e20;

/// Option values accepted by the PINCH keyword items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinchMode {
  All,
  Top,
  Bot,
  TopBot,
  Gap,
  NoGap,
}

impl PinchMode {
  pub fn label(self) -> &'static str {
    match self {
      PinchMode::All => "ALL",
      PinchMode::Top => "TOP",
      PinchMode::Bot => "BOT",
      PinchMode::TopBot => "TOPBOT",
      PinchMode::Gap => "GAP",
      PinchMode::NoGap => "NOGAP",
    }
  }
}

impl FromStr for PinchMode {
  type Err = GridError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "ALL" => Ok(PinchMode::All),
      "TOP" => Ok(PinchMode::Top),
      "BOT" => Ok(PinchMode::Bot),
      "TOPBOT" => Ok(PinchMode::TopBot),
      "GAP" => Ok(PinchMode::Gap),
      "NOGAP" => Ok(PinchMode::NoGap),
      other => Err(GridError::OutOfRange(format!("unknown pinch option '{other}'"))),
    }
  }
}

impl fmt::Display for PinchMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// PINCH settings. Pinch processing is active when a threshold is set.
#[derive(Clone, Debug, PartialEq)]
pub struct PinchConfig {
  pub threshold: Option<f64>,
  pub pinchout: PinchMode,
  pub multz: PinchMode,
  pub gap: PinchMode,
  pub max_empty_gap: f64,
}

impl Default for PinchConfig {
  fn default() -> Self {
    Self {
      threshold: None,
      pinchout: PinchMode::TopBot,
      multz: PinchMode::Top,
      gap: PinchMode::Gap,
      max_empty_gap: DEFAULT_MAX_EMPTY_GAP,
    }
  }
}

impl PinchConfig {
  /// Active pinch with the given threshold thickness and default options.
  pub fn with_threshold(threshold: f64) -> Self {
    Self {
      threshold: Some(threshold),
      ..Self::default()
    }
  }

  #[inline]
  pub fn is_active(&self) -> bool {
    self.threshold.is_some()
  }
}

/// How the minimum pore volume vector is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MinpvMode {
  #[default]
  Inactive,
  EclStd,
}

/// Minimum pore volume source given with the grid input.
#[derive(Clone, Debug, PartialEq)]
pub enum MinpvInput {
  /// MINPV: one threshold for every cell.
  Minpv(f64),
  /// MINPORV: same semantics as MINPV.
  Minporv(f64),
}

impl MinpvInput {
  pub fn value(&self) -> f64 {
    match self {
      MinpvInput::Minpv(v) | MinpvInput::Minporv(v) => *v,
    }
  }
}
