//! Binary GDSII stream writer.
//!
//! Serialises a [`GdsLibrary`] to GDSII stream format: big-endian records of
//! `(u16 length, u8 record type, u8 data type)` headers followed by payload.
//! Reals use the GDSII excess-64 base-16 format. Database unit is 1 nm with
//! a 1 µm user unit.
//!
//! Library and structure timestamps are written as zeros so that exporting
//! the same layout twice produces byte-identical files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::model::{GdsElement, GdsLibrary};

/// Errors from GDSII serialisation.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("GDSII name '{0}' exceeds 32 characters")]
    NameTooLong(String),

    #[error("Array reference must have positive columns and rows, got {columns}x{rows}")]
    InvalidArray { columns: i16, rows: i16 },

    #[error("Boundary needs at least 3 vertices, got {0}")]
    DegenerateBoundary(usize),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

// Record types.
const HEADER: u8 = 0x00;
const BGNLIB: u8 = 0x01;
const LIBNAME: u8 = 0x02;
const UNITS: u8 = 0x03;
const ENDLIB: u8 = 0x04;
const BGNSTR: u8 = 0x05;
const STRNAME: u8 = 0x06;
const ENDSTR: u8 = 0x07;
const BOUNDARY: u8 = 0x08;
const AREF: u8 = 0x0B;
const LAYER: u8 = 0x0D;
const DATATYPE: u8 = 0x0E;
const XY: u8 = 0x10;
const ENDEL: u8 = 0x11;
const SNAME: u8 = 0x12;
const COLROW: u8 = 0x13;

// Data types.
const DT_NONE: u8 = 0x00;
const DT_I16: u8 = 0x02;
const DT_I32: u8 = 0x03;
const DT_REAL8: u8 = 0x05;
const DT_ASCII: u8 = 0x06;

/// GDSII stream format version.
const STREAM_VERSION: i16 = 600;

/// User units per database unit (1 nm expressed in µm).
const USER_UNITS_PER_DBU: f64 = 1e-3;

/// Database unit in metres (1 nm).
const DBU_IN_METRES: f64 = 1e-9;

/// Encode a float as a GDSII 8-byte real: sign bit, excess-64 base-16
/// exponent, 56-bit mantissa normalised to [1/16, 1).
fn real8(value: f64) -> [u8; 8] {
    if value == 0.0 {
        return [0; 8];
    }

    let sign = if value < 0.0 { 0x80u8 } else { 0x00 };
    let mut mantissa = value.abs();
    let mut exponent: i32 = 64;

    while mantissa >= 1.0 {
        mantissa /= 16.0;
        exponent += 1;
    }
    while mantissa < 1.0 / 16.0 {
        mantissa *= 16.0;
        exponent -= 1;
    }

    // 56-bit mantissa; rounding can push it to 2^56, which must carry into
    // the exponent to stay in range.
    let mut bits = (mantissa * (1u64 << 56) as f64).round() as u64;
    if bits >= 1u64 << 56 {
        bits >>= 4;
        exponent += 1;
    }

    let mut out = [0u8; 8];
    out[0] = sign | (exponent as u8);
    for i in 0..7 {
        out[1 + i] = ((bits >> (8 * (6 - i))) & 0xFF) as u8;
    }
    out
}

/// Append one record: header then payload, padded by the caller to an even
/// byte count.
fn push_record(out: &mut Vec<u8>, record_type: u8, data_type: u8, payload: &[u8]) {
    debug_assert!(payload.len() % 2 == 0, "GDSII records must be even-length");
    let length = (payload.len() + 4) as u16;
    out.extend_from_slice(&length.to_be_bytes());
    out.push(record_type);
    out.push(data_type);
    out.extend_from_slice(payload);
}

fn push_i16_record(out: &mut Vec<u8>, record_type: u8, values: &[i16]) {
    let mut payload = Vec::with_capacity(values.len() * 2);
    for v in values {
        payload.extend_from_slice(&v.to_be_bytes());
    }
    push_record(out, record_type, DT_I16, &payload);
}

fn push_name_record(out: &mut Vec<u8>, record_type: u8, name: &str) -> Result<(), ExportError> {
    if name.len() > 32 {
        return Err(ExportError::NameTooLong(name.to_string()));
    }
    let mut payload = name.as_bytes().to_vec();
    if payload.len() % 2 != 0 {
        payload.push(0);
    }
    push_record(out, record_type, DT_ASCII, &payload);
    Ok(())
}

fn push_xy_record(out: &mut Vec<u8>, points: &[(i32, i32)]) {
    let mut payload = Vec::with_capacity(points.len() * 8);
    for &(x, y) in points {
        payload.extend_from_slice(&x.to_be_bytes());
        payload.extend_from_slice(&y.to_be_bytes());
    }
    push_record(out, XY, DT_I32, &payload);
}

fn push_element(out: &mut Vec<u8>, element: &GdsElement) -> Result<(), ExportError> {
    match element {
        GdsElement::Boundary { layer, points } => {
            if points.len() < 3 {
                return Err(ExportError::DegenerateBoundary(points.len()));
            }
            push_record(out, BOUNDARY, DT_NONE, &[]);
            push_i16_record(out, LAYER, &[*layer]);
            push_i16_record(out, DATATYPE, &[0]);

            // GDSII boundaries are explicitly closed.
            let mut closed = points.clone();
            closed.push(points[0]);
            push_xy_record(out, &closed);
        }
        GdsElement::ArrayRef {
            cell,
            columns,
            rows,
            origin,
            column_pitch,
            row_pitch,
        } => {
            if *columns < 1 || *rows < 1 {
                return Err(ExportError::InvalidArray {
                    columns: *columns,
                    rows: *rows,
                });
            }
            push_record(out, AREF, DT_NONE, &[]);
            push_name_record(out, SNAME, cell)?;
            push_i16_record(out, COLROW, &[*columns, *rows]);

            // Three reference points: origin, far column corner, far row corner.
            let (x0, y0) = *origin;
            push_xy_record(
                out,
                &[
                    (x0, y0),
                    (x0 + i32::from(*columns) * column_pitch, y0),
                    (x0, y0 + i32::from(*rows) * row_pitch),
                ],
            );
        }
    }
    push_record(out, ENDEL, DT_NONE, &[]);
    Ok(())
}

/// Serialise a library to GDSII stream bytes.
///
/// Deterministic: the same library always yields the same bytes.
pub fn to_bytes(library: &GdsLibrary) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();

    push_i16_record(&mut out, HEADER, &[STREAM_VERSION]);
    // Zeroed modification/access timestamps (6 i16 fields each).
    push_i16_record(&mut out, BGNLIB, &[0; 12]);
    push_name_record(&mut out, LIBNAME, &library.name)?;

    let mut units = Vec::with_capacity(16);
    units.extend_from_slice(&real8(USER_UNITS_PER_DBU));
    units.extend_from_slice(&real8(DBU_IN_METRES));
    push_record(&mut out, UNITS, DT_REAL8, &units);

    for cell in &library.cells {
        push_i16_record(&mut out, BGNSTR, &[0; 12]);
        push_name_record(&mut out, STRNAME, &cell.name)?;
        for element in &cell.elements {
            push_element(&mut out, element)?;
        }
        push_record(&mut out, ENDSTR, DT_NONE, &[]);
    }

    push_record(&mut out, ENDLIB, DT_NONE, &[]);
    Ok(out)
}

/// Serialise a library and write it to `path`.
pub fn write_file(library: &GdsLibrary, path: &Path) -> Result<(), ExportError> {
    let bytes = to_bytes(library)?;

    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    info!(
        "Exported GDSII: {} cells, {} bytes to {}",
        library.cells.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GdsCell;

    /// Decode a GDSII real8 back to f64.
    fn decode_real8(bytes: &[u8; 8]) -> f64 {
        let sign = if bytes[0] & 0x80 != 0 { -1.0 } else { 1.0 };
        let exponent = i32::from(bytes[0] & 0x7F) - 64;
        let mut mantissa = 0u64;
        for &b in &bytes[1..] {
            mantissa = (mantissa << 8) | u64::from(b);
        }
        sign * (mantissa as f64 / (1u64 << 56) as f64) * 16f64.powi(exponent)
    }

    #[test]
    fn test_real8_one() {
        // 1.0 = (1/16) * 16^1: exponent byte 0x41, mantissa 0x10...
        let bytes = real8(1.0);
        assert_eq!(bytes[0], 0x41);
        assert_eq!(bytes[1], 0x10);
        assert!(bytes[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_real8_round_trip() {
        for value in [1e-3, 1e-9, 0.5, -0.5, 123.456, 2.0e-7] {
            let decoded = decode_real8(&real8(value));
            let err = ((decoded - value) / value).abs();
            assert!(err < 1e-14, "{value}: decoded {decoded}, rel err {err:.2e}");
        }
    }

    #[test]
    fn test_real8_zero() {
        assert_eq!(real8(0.0), [0u8; 8]);
    }

    fn sample_library() -> GdsLibrary {
        GdsLibrary {
            name: "TEST".into(),
            cells: vec![GdsCell {
                name: "CELL".into(),
                elements: vec![GdsElement::rectangle(1, 0, 0, 10, 10)],
            }],
        }
    }

    #[test]
    fn test_stream_starts_with_header_record() {
        let bytes = to_bytes(&sample_library()).unwrap();
        // length 6, HEADER, i16, version 600
        assert_eq!(&bytes[..6], &[0x00, 0x06, 0x00, 0x02, 0x02, 0x58]);
    }

    #[test]
    fn test_stream_ends_with_endlib() {
        let bytes = to_bytes(&sample_library()).unwrap();
        assert_eq!(&bytes[bytes.len() - 4..], &[0x00, 0x04, 0x04, 0x00]);
    }

    #[test]
    fn test_records_tile_the_stream() {
        // Walking record-by-record must land exactly on the end.
        let bytes = to_bytes(&sample_library()).unwrap();
        let mut offset = 0usize;
        let mut records = 0usize;
        while offset < bytes.len() {
            let len = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]) as usize;
            assert!(len >= 4 && len % 2 == 0, "bad record length {len} at {offset}");
            offset += len;
            records += 1;
        }
        assert_eq!(offset, bytes.len());
        // HEADER, BGNLIB, LIBNAME, UNITS, BGNSTR, STRNAME,
        // BOUNDARY, LAYER, DATATYPE, XY, ENDEL, ENDSTR, ENDLIB
        assert_eq!(records, 13);
    }

    #[test]
    fn test_boundary_xy_is_closed() {
        let bytes = to_bytes(&sample_library()).unwrap();
        // Find the XY record (type 0x10) and check the first point repeats.
        let mut offset = 0usize;
        while offset < bytes.len() {
            let len = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]) as usize;
            if bytes[offset + 2] == XY {
                let payload = &bytes[offset + 4..offset + len];
                assert_eq!(payload.len(), 5 * 8, "4 corners + closing point");
                assert_eq!(&payload[..8], &payload[payload.len() - 8..]);
                return;
            }
            offset += len;
        }
        panic!("no XY record found");
    }

    #[test]
    fn test_rejects_overlong_names() {
        let mut lib = sample_library();
        lib.name = "X".repeat(33);
        assert!(matches!(to_bytes(&lib), Err(ExportError::NameTooLong(_))));
    }

    #[test]
    fn test_write_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gds");
        let lib = sample_library();

        write_file(&lib, &path).unwrap();
        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk, to_bytes(&lib).unwrap());
    }
}
