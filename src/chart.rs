use crate::dataset::Dataset;
use crate::error::ChartError;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::PathBuf;

// Inset between neighboring bars in a group, in slot units.
const BAR_GAP: f64 = 0.02;

// Headroom multiplier past the longest bar so the plot frame and the
// longest bar don't touch.
const X_HEADROOM: f64 = 1.08;

// Annotations sit this fraction of the x range away from the axis origin.
const ANNOTATION_X_FRAC: f64 = 0.012;

/// Style knobs shared by every chart, passed explicitly with each spec so a
/// render never depends on process-global plotting state. Font sizes are in
/// points and scale with the spec's DPI.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Canvas size in inches; the pixel canvas is this times the DPI.
    pub figure_size: (f64, f64),
    /// Fraction of each category slot occupied by the whole bar group.
    pub group_fill: f64,
    /// Fraction of the canvas width reserved for the legend strip on the
    /// right, outside the axes.
    pub legend_width_frac: f64,
    pub title_pt: f64,
    pub axis_label_pt: f64,
    pub tick_label_pt: f64,
    pub legend_pt: f64,
    pub annotation_pt: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            figure_size: (10.0, 6.0),
            group_fill: 0.8,
            legend_width_frac: 0.18,
            title_pt: 14.0,
            axis_label_pt: 11.0,
            tick_label_pt: 10.0,
            legend_pt: 10.0,
            annotation_pt: 10.0,
        }
    }
}

/// Everything describing one chart apart from the numbers themselves.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    /// One color per series, in series order.
    pub colors: Vec<RGBColor>,
    /// Dashed vertical marker across the full plot height, e.g. parity at 1.0.
    pub reference_line: Option<f64>,
    /// One text label per category, drawn near the axis origin at the
    /// category's slot center.
    pub annotations: Option<Vec<String>>,
    pub output_path: PathBuf,
    pub dpi: u32,
    pub style: ChartStyle,
}

/// Geometry of a single bar, in data coordinates. The bar spans
/// `0..length` horizontally and `y_lo..y_hi` vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub series: usize,
    pub category: usize,
    pub length: f64,
    pub y_lo: f64,
    pub y_hi: f64,
}

/// Width of one bar, derived from the series count and the fraction of the
/// slot the whole group may occupy.
pub fn bar_width(series_count: usize, group_fill: f64) -> f64 {
    group_fill / series_count as f64
}

/// Compute bar geometry for a grouped horizontal bar chart.
///
/// Category `i` occupies the slot centered on `y = i` (slot 0 at the bottom
/// of the chart). Within a slot, series `s` is offset by
/// `(s - (S-1)/2) * bar_width` so the group stays centered. Absent values
/// produce no bar at all.
pub fn layout_bars(dataset: &Dataset, group_fill: f64) -> Vec<Bar> {
    let s_count = dataset.series_count();
    let width = bar_width(s_count, group_fill);
    let mut bars = Vec::with_capacity(dataset.bar_count());

    for (s_idx, series) in dataset.series().iter().enumerate() {
        let offset = (s_idx as f64 - (s_count as f64 - 1.0) / 2.0) * width;
        for (c_idx, value) in series.values.iter().enumerate() {
            let Some(length) = value else { continue };
            let center = c_idx as f64 + offset;
            bars.push(Bar {
                series: s_idx,
                category: c_idx,
                length: *length,
                y_lo: center - width / 2.0 + BAR_GAP,
                y_hi: center + width / 2.0 - BAR_GAP,
            });
        }
    }

    bars
}

/// Endpoints of the reference line: the full plot height at a fixed x.
fn reference_line_span(x: f64, category_count: usize) -> [(f64, f64); 2] {
    [(x, -0.5), (x, category_count as f64 - 0.5)]
}

fn pt_px(pt: f64, dpi: u32) -> u32 {
    (pt * f64::from(dpi) / 72.0).round().max(1.0) as u32
}

/// Draw a grouped horizontal bar chart for `dataset` and persist it as a PNG
/// at `spec.output_path`.
///
/// The call is self-contained: it owns its drawing surface and releases it on
/// return, success or failure. All validation happens before the backend
/// touches the filesystem, so a failed call writes no file.
pub fn render(dataset: &Dataset, spec: &ChartSpec) -> Result<(), ChartError> {
    let s_count = dataset.series_count();
    let n = dataset.category_count();

    if spec.colors.len() < s_count {
        return Err(ChartError::Configuration(format!(
            "{} series but only {} colors",
            s_count,
            spec.colors.len()
        )));
    }
    if let Some(notes) = &spec.annotations {
        if notes.len() != n {
            return Err(ChartError::Configuration(format!(
                "{} annotations for {} categories",
                notes.len(),
                n
            )));
        }
    }
    if spec.dpi == 0 {
        return Err(ChartError::Configuration("dpi must be positive".to_string()));
    }
    if spec.style.figure_size.0 <= 0.0 || spec.style.figure_size.1 <= 0.0 {
        return Err(ChartError::Configuration(
            "figure size must be positive".to_string(),
        ));
    }
    if let Some(dir) = spec.output_path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::metadata(dir)?;
        }
    }

    let style = &spec.style;
    let w_px = (style.figure_size.0 * f64::from(spec.dpi)).round() as u32;
    let h_px = (style.figure_size.1 * f64::from(spec.dpi)).round() as u32;

    let mut x_max = dataset.max_value();
    if let Some(line) = spec.reference_line {
        x_max = x_max.max(line);
    }
    let x_max = if x_max > 0.0 { x_max * X_HEADROOM } else { 1.0 };

    let root = BitMapBackend::new(&spec.output_path, (w_px, h_px)).into_drawing_area();
    root.fill(&WHITE)?;

    let legend_w = (f64::from(w_px) * style.legend_width_frac).round() as u32;
    let (plot_area, legend_area) = root.split_horizontally(w_px.saturating_sub(legend_w));

    let categories = dataset.categories();
    let mut chart = ChartBuilder::on(&plot_area)
        .caption(&spec.title, ("sans-serif", pt_px(style.title_pt, spec.dpi)))
        .margin(pt_px(12.0, spec.dpi))
        .x_label_area_size(pt_px(40.0, spec.dpi))
        .y_label_area_size(pt_px(85.0, spec.dpi))
        .build_cartesian_2d(0.0..x_max, -0.5..(n as f64 - 0.5))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|y| {
            let idx = y.round() as usize;
            if idx < categories.len() && (y - idx as f64).abs() < 0.3 {
                categories[idx].clone()
            } else {
                String::new()
            }
        })
        .x_desc(spec.x_label.as_str())
        .label_style(("sans-serif", pt_px(style.tick_label_pt, spec.dpi)))
        .axis_desc_style(("sans-serif", pt_px(style.axis_label_pt, spec.dpi)))
        .draw()?;

    for bar in layout_bars(dataset, style.group_fill) {
        let color = spec.colors[bar.series];
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, bar.y_lo), (bar.length, bar.y_hi)],
            color.filled(),
        )))?;
    }

    if let Some(x) = spec.reference_line {
        let dash = pt_px(3.0, spec.dpi) as i32;
        chart.draw_series(DashedLineSeries::new(
            reference_line_span(x, n),
            dash,
            dash,
            BLACK.mix(0.45).stroke_width(pt_px(1.0, spec.dpi)),
        ))?;
    }

    if let Some(notes) = &spec.annotations {
        let x_note = x_max * ANNOTATION_X_FRAC;
        let font = ("sans-serif", pt_px(style.annotation_pt, spec.dpi))
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (c_idx, note) in notes.iter().enumerate() {
            chart.draw_series(std::iter::once(Text::new(
                note.clone(),
                (x_note, c_idx as f64),
                font.clone(),
            )))?;
        }
    }

    draw_legend(&legend_area, dataset, spec)?;

    root.present()?;
    Ok(())
}

/// Draw one swatch-and-name entry per series into the strip right of the
/// axes, top-down. Living outside the plot area, the legend can never
/// overlap a bar.
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    dataset: &Dataset,
    spec: &ChartSpec,
) -> Result<(), ChartError> {
    let swatch = pt_px(9.0, spec.dpi) as i32;
    let pad = pt_px(6.0, spec.dpi) as i32;
    let font = ("sans-serif", pt_px(spec.style.legend_pt, spec.dpi))
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    let mut y = pt_px(spec.style.title_pt, spec.dpi) as i32 * 2;
    for (s_idx, series) in dataset.series().iter().enumerate() {
        let color = spec.colors[s_idx];
        area.draw(&Rectangle::new(
            [(pad, y), (pad + swatch * 2, y + swatch)],
            color.filled(),
        ))?;
        area.draw(&Text::new(
            series.name.clone(),
            (pad * 2 + swatch * 2, y + swatch / 2),
            font.clone(),
        ))?;
        y += swatch + pad;
    }

    Ok(())
}
