//! Scatterer-array layout construction.
//!
//! Builds the fabrication layout for a [`StructureParams`]: a `DISK` cell
//! holding one polygon-approximated disk, and a `TOP` cell that places an
//! N×1 array of disks at the lattice pitch plus four alignment marks at the
//! array extremities.

use bicsim_core::types::StructureParams;

use crate::model::{GdsCell, GdsElement, GdsLibrary};

/// Number of polygon vertices approximating the disk.
pub const DISK_POLYGON_POINTS: usize = 64;

/// Layer carrying the scatterer disks.
pub const LAYER_DISK: i16 = 1;

/// Layer carrying the alignment marks.
pub const LAYER_ALIGNMENT: i16 = 2;

/// Alignment mark width as a fraction of the lattice pitch.
const MARK_SIZE_FRACTION: f64 = 0.5;

/// Alignment mark aspect: height is width / 10.
const MARK_ASPECT: f64 = 10.0;

/// Convert metres to database units (1 dbu = 1 nm).
fn to_dbu(metres: f64) -> i32 {
    (metres * 1e9).round() as i32
}

/// Polygon approximation of a disk centred at the origin.
fn disk_polygon(radius: f64) -> Vec<(i32, i32)> {
    (0..DISK_POLYGON_POINTS)
        .map(|k| {
            let angle = 2.0 * std::f64::consts::PI * k as f64 / DISK_POLYGON_POINTS as f64;
            (
                to_dbu(radius * angle.cos()),
                to_dbu(radius * angle.sin()),
            )
        })
        .collect()
}

/// Build the fabrication layout for a scatterer array.
///
/// Deterministic: identical parameters produce an identical library (and,
/// through the writer's fixed timestamps, identical bytes on disk).
pub fn build_layout(params: &StructureParams) -> GdsLibrary {
    let disk_cell = GdsCell {
        name: "DISK".into(),
        elements: vec![GdsElement::Boundary {
            layer: LAYER_DISK,
            points: disk_polygon(params.radius),
        }],
    };

    let mut top_elements = vec![GdsElement::ArrayRef {
        cell: "DISK".into(),
        columns: params.cells as i16,
        rows: 1,
        origin: (0, 0),
        column_pitch: to_dbu(params.pitch),
        row_pitch: 0,
    }];

    // Four alignment marks framing the array: one bar at each combination of
    // (just before the first disk, just past the last disk) x (below, above).
    let mark_half_width = to_dbu(MARK_SIZE_FRACTION * params.pitch / 2.0);
    let mark_half_height = to_dbu(MARK_SIZE_FRACTION * params.pitch / (2.0 * MARK_ASPECT));
    let mark_offset = to_dbu(MARK_SIZE_FRACTION * params.pitch);

    let x_positions = [-to_dbu(params.pitch), to_dbu(params.cells as f64 * params.pitch)];
    let y_positions = [-mark_offset, mark_offset];

    for &x in &x_positions {
        for &y in &y_positions {
            top_elements.push(GdsElement::rectangle(
                LAYER_ALIGNMENT,
                x - mark_half_width,
                y - mark_half_height,
                x + mark_half_width,
                y + mark_half_height,
            ));
        }
    }

    GdsLibrary {
        name: "BICSIM".into(),
        cells: vec![
            disk_cell,
            GdsCell {
                name: "TOP".into(),
                elements: top_elements,
            },
        ],
    }
}
