//! Non-neighbour connections between root grid cells.

/// One connection between two global cell indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NncData {
  pub cell1: usize,
  pub cell2: usize,
  pub trans: f64,
}

impl NncData {
  /// The lower index always comes first.
  pub fn new(cell1: usize, cell2: usize, trans: f64) -> Self {
    Self {
      cell1: cell1.min(cell2),
      cell2: cell1.max(cell2),
      trans,
    }
  }
}

/// Connections in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Nnc {
  data: Vec<NncData>,
}

impl Nnc {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, cell1: usize, cell2: usize, trans: f64) {
    self.data.push(NncData::new(cell1, cell2, trans));
  }

  pub fn input(&self) -> &[NncData] {
    &self.data
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }
}

impl FromIterator<NncData> for Nnc {
  fn from_iter<T: IntoIterator<Item = NncData>>(iter: T) -> Self {
    Self {
      data: iter
        .into_iter()
        .map(|nnc| NncData::new(nnc.cell1, nnc.cell2, nnc.trans))
        .collect(),
    }
  }
}
