//! Resonance scatter plot rendering.
//!
//! Renders the accepted `(frequency, Q)` records as a PNG scatter chart with
//! a logarithmic Q axis, points colour-coded by log10(Q), and the reference
//! solution overlaid as a horizontal (target Q) and vertical (design
//! frequency) line. With no records, only the reference overlay is drawn.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use bicsim_core::types::{ReferenceSolution, ResonanceRecord, StructureParams};

/// Plot dimensions in pixels.
const PLOT_SIZE: (u32, u32) = (1400, 700);

/// Marker radius for resonance points.
const POINT_SIZE: i32 = 4;

/// Map `t` in [0, 1] onto a viridis-like colour ramp.
fn viridis(t: f64) -> RGBColor {
    // Control points sampled from the viridis map.
    const STOPS: [(f64, (u8, u8, u8)); 5] = [
        (0.00, (68, 1, 84)),
        (0.25, (59, 82, 139)),
        (0.50, (33, 145, 140)),
        (0.75, (94, 201, 98)),
        (1.00, (253, 231, 37)),
    ];

    let t = t.clamp(0.0, 1.0);
    for window in STOPS.windows(2) {
        let (t0, c0) = window[0];
        let (t1, c1) = window[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let lerp = |a: u8, b: u8| (a as f64 + f * (b as f64 - a as f64)).round() as u8;
            return RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2));
        }
    }
    let (_, c) = STOPS[STOPS.len() - 1];
    RGBColor(c.0, c.1, c.2)
}

/// Render the resonance scatter chart to a PNG file.
pub fn render_scatter(
    records: &[ResonanceRecord],
    reference: &ReferenceSolution,
    params: &StructureParams,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    // Axis ranges cover the data and the reference overlay with margin.
    let mut x_lo = reference.frequency_thz;
    let mut x_hi = reference.frequency_thz;
    let mut q_lo = reference.q;
    let mut q_hi = reference.q;
    for r in records {
        x_lo = x_lo.min(r.frequency_thz);
        x_hi = x_hi.max(r.frequency_thz);
        q_lo = q_lo.min(r.q);
        q_hi = q_hi.max(r.q);
    }
    let x_range = (x_lo - 0.1)..(x_hi + 0.1);
    let y_range = (q_lo / 2.0)..(q_hi * 2.0);

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let title = format!(
        "BIC Resonance | N={} | eps''={:.1e}",
        params.cells, params.epsilon.im
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 26))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), y_range.clone().log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Frequency (THz)")
        .y_desc("Quality factor Q")
        .draw()?;

    if !records.is_empty() {
        // Colour by log10(Q), normalised over the observed spread.
        let log_lo = q_lo.log10();
        let log_span = q_hi.log10() - log_lo;
        chart
            .draw_series(records.iter().map(|r| {
                let t = if log_span > 0.0 {
                    (r.q.log10() - log_lo) / log_span
                } else {
                    0.5
                };
                Circle::new((r.frequency_thz, r.q), POINT_SIZE, viridis(t).filled())
            }))?
            .label("Simulated resonances")
            .legend(|(x, y)| Circle::new((x, y), POINT_SIZE, viridis(0.8).filled()));
    }

    chart
        .draw_series(LineSeries::new(
            vec![(x_range.start, reference.q), (x_range.end, reference.q)],
            RED.stroke_width(2),
        ))?
        .label("Target Q")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            vec![
                (reference.frequency_thz, y_range.start),
                (reference.frequency_thz, y_range.end),
            ],
            BLACK.stroke_width(1),
        ))?
        .label("Design frequency")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLACK.stroke_width(1)));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
