//! Plain-data GDSII layout model.
//!
//! Geometry is stored in database units (1 dbu = 1 nm). Cells are referenced
//! by name; the writer resolves nothing — a dangling reference is written as
//! given, matching GDSII stream semantics.

use serde::{Deserialize, Serialize};

/// A GDSII library: named collection of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdsLibrary {
    /// Library name (LIBNAME record).
    pub name: String,
    /// Cells in definition order. Referenced cells must precede their
    /// referees for maximum reader compatibility.
    pub cells: Vec<GdsCell>,
}

/// A named cell containing drawable elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdsCell {
    /// Structure name (STRNAME record).
    pub name: String,
    pub elements: Vec<GdsElement>,
}

/// A drawable element inside a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GdsElement {
    /// A closed polygon on a layer. Vertices in dbu; the closing vertex is
    /// implicit and supplied by the writer.
    Boundary {
        layer: i16,
        points: Vec<(i32, i32)>,
    },
    /// An array instance of another cell (AREF record).
    ArrayRef {
        /// Name of the referenced cell.
        cell: String,
        columns: i16,
        rows: i16,
        /// Origin of the (0, 0) instance (dbu).
        origin: (i32, i32),
        /// Column-to-column displacement along x (dbu).
        column_pitch: i32,
        /// Row-to-row displacement along y (dbu).
        row_pitch: i32,
    },
}

impl GdsElement {
    /// Axis-aligned rectangle helper: corners `(x0, y0)` to `(x1, y1)` in dbu.
    pub fn rectangle(layer: i16, x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        GdsElement::Boundary {
            layer,
            points: vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)],
        }
    }
}
