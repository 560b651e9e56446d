//! Fortran unformatted sequential records, big-endian.
//!
//! ```text
//!  [16] NAME____ COUNT TYPE [16]             header record
//!  [n]  up to 1000 values (105 for CHAR) [n] data records
//! ```
//!
//! Every record is bracketed by its byte length as an `i32`.

use std::io::{ErrorKind, Read, Write};

use crate::error::{GridError, GridResult};

const HEADER_BYTES: i32 = 16;
const NUMERIC_BLOCK: usize = 1000;
const CHAR_BLOCK: usize = 105;
const CHAR_WIDTH: usize = 8;

/// A typed array as stored in the file.
#[derive(Clone, Debug, PartialEq)]
pub enum EclArray {
  Inte(Vec<i32>),
  Real(Vec<f32>),
  Doub(Vec<f64>),
  Logi(Vec<bool>),
  Char(Vec<String>),
  Mess,
}

impl EclArray {
  pub fn type_code(&self) -> &'static str {
    match self {
      EclArray::Inte(_) => "INTE",
      EclArray::Real(_) => "REAL",
      EclArray::Doub(_) => "DOUB",
      EclArray::Logi(_) => "LOGI",
      EclArray::Char(_) => "CHAR",
      EclArray::Mess => "MESS",
    }
  }

  pub fn len(&self) -> usize {
    match self {
      EclArray::Inte(v) => v.len(),
      EclArray::Real(v) => v.len(),
      EclArray::Doub(v) => v.len(),
      EclArray::Logi(v) => v.len(),
      EclArray::Char(v) => v.len(),
      EclArray::Mess => 0,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// `(element bytes, elements per data record)` for a type code.
fn layout(code: &str) -> GridResult<(usize, usize)> {
  match code {
    "INTE" | "REAL" | "LOGI" => Ok((4, NUMERIC_BLOCK)),
    "DOUB" => Ok((8, NUMERIC_BLOCK)),
    "CHAR" => Ok((CHAR_WIDTH, CHAR_BLOCK)),
    "MESS" => Ok((0, NUMERIC_BLOCK)),
    other => Err(GridError::Format(format!("unknown array type '{other}'"))),
  }
}

fn padded(text: &str, width: usize) -> GridResult<Vec<u8>> {
  if !text.is_ascii() || text.len() > width {
    return Err(GridError::Format(format!("'{text}' does not fit {width} ASCII characters")));
  }
  let mut bytes = text.as_bytes().to_vec();
  bytes.resize(width, b' ');
  Ok(bytes)
}

fn encode(array: &EclArray) -> GridResult<Vec<u8>> {
  let bytes = match array {
    EclArray::Inte(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
    EclArray::Real(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
    EclArray::Doub(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
    EclArray::Logi(v) => v
      .iter()
      .flat_map(|&x| (if x { -1_i32 } else { 0 }).to_be_bytes())
      .collect(),
    EclArray::Char(v) => {
      let mut bytes = Vec::with_capacity(v.len() * CHAR_WIDTH);
      for text in v {
        bytes.extend(padded(text, CHAR_WIDTH)?);
      }
      bytes
    }
    EclArray::Mess => Vec::new(),
  };
  Ok(bytes)
}

fn write_record<W: Write>(out: &mut W, payload: &[u8]) -> GridResult<()> {
  let marker = (payload.len() as i32).to_be_bytes();
  out.write_all(&marker)?;
  out.write_all(payload)?;
  out.write_all(&marker)?;
  Ok(())
}

/// Write one named array: header record then data records.
pub fn write_array<W: Write>(out: &mut W, name: &str, array: &EclArray) -> GridResult<()> {
  let code = array.type_code();
  let (width, block) = layout(code)?;

  let mut header = padded(name, 8)?;
  header.extend((array.len() as i32).to_be_bytes());
  header.extend(code.as_bytes());
  write_record(out, &header)?;

  if width > 0 {
    let bytes = encode(array)?;
    for chunk in bytes.chunks(block * width) {
      write_record(out, chunk)?;
    }
  }
  Ok(())
}

fn read_marker<R: Read>(input: &mut R) -> GridResult<Option<i32>> {
  let mut buf = [0u8; 4];
  match input.read_exact(&mut buf) {
    Ok(()) => Ok(Some(i32::from_be_bytes(buf))),
    Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(None),
    Err(err) => Err(err.into()),
  }
}

/// Record payload of `head` bytes. Lengths above `max_len` are rejected
/// before anything is allocated.
fn read_record<R: Read>(input: &mut R, head: i32, max_len: usize) -> GridResult<Vec<u8>> {
  let len = usize::try_from(head).map_err(|_| GridError::Format(format!("negative record length {head}")))?;
  if len > max_len {
    return Err(GridError::Format(format!("record length {len} exceeds {max_len} bytes")));
  }
  let mut payload = vec![0u8; len];
  input.read_exact(&mut payload).map_err(|err| match err.kind() {
    ErrorKind::UnexpectedEof => GridError::Format("truncated record".to_string()),
    _ => err.into(),
  })?;
  match read_marker(input)? {
    Some(tail) if tail == head => Ok(payload),
    Some(tail) => Err(GridError::Format(format!("record tail {tail} does not match head {head}"))),
    None => Err(GridError::Format("missing record tail".to_string())),
  }
}

fn decode(code: &str, bytes: &[u8]) -> EclArray {
  match code {
    "INTE" => EclArray::Inte(
      bytes
        .chunks_exact(4)
        .map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .collect(),
    ),
    "REAL" => EclArray::Real(
      bytes
        .chunks_exact(4)
        .map(|b| f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .collect(),
    ),
    "DOUB" => EclArray::Doub(
      bytes
        .chunks_exact(8)
        .map(|b| f64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
        .collect(),
    ),
    "LOGI" => EclArray::Logi(
      bytes
        .chunks_exact(4)
        .map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]) != 0)
        .collect(),
    ),
    "CHAR" => EclArray::Char(
      bytes
        .chunks_exact(CHAR_WIDTH)
        .map(|b| String::from_utf8_lossy(b).trim_end().to_string())
        .collect(),
    ),
    _ => EclArray::Mess,
  }
}

/// Read the next named array. `None` at a clean end of input.
pub fn read_array<R: Read>(input: &mut R) -> GridResult<Option<(String, EclArray)>> {
  let Some(head) = read_marker(input)? else {
    return Ok(None);
  };
  if head != HEADER_BYTES {
    return Err(GridError::Format(format!("array header length {head}, expected 16")));
  }
  let header = read_record(input, head, HEADER_BYTES as usize)?;
  let name = String::from_utf8_lossy(&header[0..8]).trim_end().to_string();
  let count = i32::from_be_bytes([header[8], header[9], header[10], header[11]]);
  let code = String::from_utf8_lossy(&header[12..16]).to_string();
  let (width, block) = layout(&code)?;
  let count = usize::try_from(count).map_err(|_| GridError::Format(format!("{name}: negative element count")))?;

  if width == 0 {
    return Ok(Some((name, EclArray::Mess)));
  }

  let mut bytes = Vec::with_capacity(count.min(block) * width);
  let mut remaining = count;
  while remaining > 0 {
    let head = read_marker(input)?.ok_or_else(|| GridError::Format(format!("{name}: missing data record")))?;
    let payload = read_record(input, head, block * width)?;
    let elements = payload.len() / width;
    if payload.len() % width != 0 || elements == 0 || elements > remaining.min(block) {
      return Err(GridError::Format(format!(
        "{name}: data record of {} bytes inconsistent with {remaining} remaining {code} values",
        payload.len()
      )));
    }
    bytes.extend(payload);
    remaining -= elements;
  }
  Ok(Some((name, decode(&code, &bytes))))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn written(name: &str, array: &EclArray) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_array(&mut bytes, name, array).unwrap();
    bytes
  }

  #[test]
  fn test_header_layout() {
    let bytes = written("ENDGRID", &EclArray::Inte(vec![]));
    assert_eq!(bytes.len(), 24);
    assert_eq!(&bytes[0..4], &16_i32.to_be_bytes());
    assert_eq!(&bytes[4..12], b"ENDGRID ");
    assert_eq!(&bytes[16..20], b"INTE");
    assert_eq!(&bytes[20..24], &16_i32.to_be_bytes());
  }

  /// 2500 values split into records of 1000, 1000 and 500.
  #[test]
  fn test_numeric_blocks() {
    let values: Vec<i32> = (0..2500).collect();
    let bytes = written("ACTNUM", &EclArray::Inte(values.clone()));
    assert_eq!(bytes.len(), 24 + 3 * 8 + 2500 * 4);
    assert_eq!(&bytes[24..28], &4000_i32.to_be_bytes());

    let (name, array) = read_array(&mut bytes.as_slice()).unwrap().unwrap();
    assert_eq!(name, "ACTNUM");
    assert_eq!(array, EclArray::Inte(values));
  }

  #[test]
  fn test_char_blocks_and_padding() {
    let labels: Vec<String> = (0..200).map(|n| format!("L{n}")).collect();
    let bytes = written("NAMES", &EclArray::Char(labels.clone()));
    assert_eq!(&bytes[24..28], &(105 * 8_i32).to_be_bytes());
    let (_, array) = read_array(&mut bytes.as_slice()).unwrap().unwrap();
    assert_eq!(array, EclArray::Char(labels));
  }

  #[test]
  fn test_logical_encoding() {
    let bytes = written("FLAGS", &EclArray::Logi(vec![true, false]));
    assert_eq!(&bytes[28..32], &(-1_i32).to_be_bytes());
    assert_eq!(&bytes[32..36], &0_i32.to_be_bytes());
  }

  #[test]
  fn test_message_has_no_data() {
    let bytes = written("STARTSOL", &EclArray::Mess);
    assert_eq!(bytes.len(), 24);
    let mut input = bytes.as_slice();
    assert_eq!(read_array(&mut input).unwrap().unwrap().1, EclArray::Mess);
    assert!(read_array(&mut input).unwrap().is_none());
  }

  #[test]
  fn test_long_name_rejected() {
    let mut bytes = Vec::new();
    assert!(write_array(&mut bytes, "TOOLONGNAME", &EclArray::Mess).is_err());
    assert!(write_array(&mut bytes, "GRIDUNIT", &EclArray::Char(vec!["CENTIMETRE".into()])).is_err());
  }

  #[test]
  fn test_mismatched_tail() {
    let mut bytes = written("COORD", &EclArray::Real(vec![1.0, 2.0]));
    let last = bytes.len() - 1;
    bytes[last] = 9;
    assert!(matches!(read_array(&mut bytes.as_slice()), Err(GridError::Format(_))));
  }

  #[test]
  fn test_truncated_data() {
    let bytes = written("ZCORN", &EclArray::Doub(vec![1.0; 10]));
    let cut = &bytes[..bytes.len() - 12];
    assert!(matches!(read_array(&mut &cut[..]), Err(GridError::Format(_))));
  }

  fn header(name: &str, count: i32, code: &str) -> Vec<u8> {
    let mut bytes = 16_i32.to_be_bytes().to_vec();
    bytes.extend(format!("{name:<8}").as_bytes());
    bytes.extend(count.to_be_bytes());
    bytes.extend(code.as_bytes());
    bytes.extend(16_i32.to_be_bytes());
    bytes
  }

  /// A corrupt element count fails on the missing data, not on allocation.
  #[test]
  fn test_huge_count_rejected() {
    let bytes = header("ZCORN", i32::MAX, "DOUB");
    assert!(matches!(read_array(&mut bytes.as_slice()), Err(GridError::Format(_))));
  }

  #[test]
  fn test_huge_record_length_rejected() {
    let mut bytes = header("ACTNUM", 10, "INTE");
    bytes.extend(i32::MAX.to_be_bytes());
    bytes.extend([0u8; 40]);
    match read_array(&mut bytes.as_slice()) {
      Err(GridError::Format(message)) => assert!(message.contains("exceeds"), "{message}"),
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn test_bad_header_length() {
    let mut bytes = written("COORD", &EclArray::Real(vec![1.0]));
    bytes[3] = 12;
    assert!(read_array(&mut bytes.as_slice()).is_err());
  }
}
