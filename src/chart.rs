use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;

use crate::calc::SemesterStats;
use crate::roster::{SEMESTER_COUNT, SEMESTER_LABELS};

pub const CLASS_CHART_SIZE: (u32, u32) = (1000, 500);
pub const STUDENT_CHART_SIZE: (u32, u32) = (640, 480);

/// CGPA scale; every score column lives on this axis.
const Y_MAX: f64 = 10.0;

const BAR_FILL: RGBColor = RGBColor(0, 255, 255);
const MEAN_LINE: RGBColor = RGBColor(218, 165, 32);
const MAX_LINE: RGBColor = RGBColor(0, 128, 0);
const MIN_LINE: RGBColor = RGBColor(255, 0, 0);
const STUDENT_LINE: RGBColor = RGBColor(0, 0, 255);
const CLASS_LINE: RGBColor = RGBColor(255, 165, 0);

#[derive(Debug, Clone, Serialize)]
pub struct RenderError {
    pub code: String,
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: "render_failed".to_string(),
            message: message.into(),
        }
    }
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::new(e.to_string())
}

/// Split a five-slot series into runs of consecutive present points so a
/// missing semester renders as a gap, never interpolated, never zero.
fn present_runs(series: &[Option<f64>; SEMESTER_COUNT]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut run: Vec<(f64, f64)> = Vec::new();
    for (i, slot) in series.iter().enumerate() {
        match slot {
            Some(v) => run.push((i as f64, *v)),
            None => {
                if !run.is_empty() {
                    runs.push(std::mem::take(&mut run));
                }
            }
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }
    runs
}

fn present_points(series: &[Option<f64>; SEMESTER_COUNT]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect()
}

fn semester_label(x: &f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() < 1e-6 && (0.0..SEMESTER_COUNT as f64).contains(&nearest) {
        SEMESTER_LABELS[nearest as usize].to_string()
    } else {
        String::new()
    }
}

fn value_label_style(color: &RGBColor) -> TextStyle<'_> {
    TextStyle::from(("sans-serif", 13))
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Bottom))
}

fn encode_png(raw: Vec<u8>, size: (u32, u32)) -> Result<Vec<u8>, RenderError> {
    let img = image::RgbImage::from_raw(size.0, size.1, raw)
        .ok_or_else(|| RenderError::new("chart buffer has unexpected size"))?;
    let mut out = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut out),
        image::ImageOutputFormat::Png,
    )
    .map_err(draw_err)?;
    Ok(out)
}

/// Class view: per-semester mean as bars, overlaid with mean/max/min line
/// series, every value annotated to two decimals.
pub fn render_class_chart(stats: &[SemesterStats]) -> Result<Vec<u8>, RenderError> {
    if stats.is_empty() {
        return Err(RenderError::new("no aggregate stats to plot"));
    }
    let size = CLASS_CHART_SIZE;
    let mut raw = vec![0u8; (size.0 * size.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut raw, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        // Axis labels come from the stats themselves so a partial aggregation
        // still labels its columns correctly.
        let labels: Vec<&str> = stats.iter().map(|s| s.semester.as_str()).collect();
        let column_label = |x: &f64| -> String {
            let nearest = x.round();
            if (x - nearest).abs() < 1e-6 && (0.0..labels.len() as f64).contains(&nearest) {
                labels[nearest as usize].to_string()
            } else {
                String::new()
            }
        };

        let mut chart = ChartBuilder::on(&root)
            .caption("Class Performance", ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(stats.len() as f64 - 0.5), 0f64..Y_MAX)
            .map_err(draw_err)?;
        chart
            .configure_mesh()
            .x_desc("Semester")
            .y_desc("CGPA")
            .x_labels(stats.len())
            .x_label_formatter(&column_label)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(stats.iter().enumerate().map(|(i, s)| {
                Rectangle::new(
                    [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, s.mean)],
                    BAR_FILL.mix(0.8).filled(),
                )
            }))
            .map_err(draw_err)?;

        // Bars carry the mean values; annotating the mean line again would
        // double every label.
        let series: [(&str, Vec<f64>, RGBColor, bool); 3] = [
            ("Average CGPA", stats.iter().map(|s| s.mean).collect(), MEAN_LINE, false),
            ("Highest CGPA", stats.iter().map(|s| s.max.value).collect(), MAX_LINE, true),
            ("Lowest CGPA", stats.iter().map(|s| s.min.value).collect(), MIN_LINE, true),
        ];

        for (label, values, color, annotate) in series {
            let points: Vec<(f64, f64)> = values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect();
            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                .map_err(draw_err)?
                .label(label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                )
                .map_err(draw_err)?;
            if annotate {
                chart
                    .draw_series(points.iter().map(|&(x, y)| {
                        Text::new(format!("{:.2}", y), (x, y + 0.15), value_label_style(&BLACK))
                    }))
                    .map_err(draw_err)?;
            }
        }

        chart
            .draw_series(stats.iter().enumerate().map(|(i, s)| {
                Text::new(
                    format!("{:.2}", s.mean),
                    (i as f64, s.mean + 0.15),
                    value_label_style(&BLACK),
                )
            }))
            .map_err(draw_err)?;

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(draw_err)?;
        root.present().map_err(draw_err)?;
    }
    encode_png(raw, size)
}

/// Student view: the student's scores against the class mean, both annotated.
pub fn render_student_chart(
    student_name: &str,
    student: &[Option<f64>; SEMESTER_COUNT],
    class_mean: &[Option<f64>; SEMESTER_COUNT],
) -> Result<Vec<u8>, RenderError> {
    if student.iter().all(Option::is_none) && class_mean.iter().all(Option::is_none) {
        return Err(RenderError::new("both series are empty"));
    }
    let size = STUDENT_CHART_SIZE;
    let mut raw = vec![0u8; (size.0 * size.1 * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut raw, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Performance Across Semesters for {}", student_name),
                ("sans-serif", 18),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..(SEMESTER_COUNT as f64 - 0.5), 0f64..Y_MAX)
            .map_err(draw_err)?;
        chart
            .configure_mesh()
            .x_desc("Semester")
            .y_desc("CGPA")
            .x_labels(SEMESTER_COUNT)
            .x_label_formatter(&semester_label)
            .draw()
            .map_err(draw_err)?;

        for run in present_runs(student) {
            chart
                .draw_series(LineSeries::new(run, STUDENT_LINE.stroke_width(2)))
                .map_err(draw_err)?;
        }
        for run in present_runs(class_mean) {
            chart
                .draw_series(DashedLineSeries::new(
                    run,
                    5,
                    3,
                    CLASS_LINE.stroke_width(2),
                ))
                .map_err(draw_err)?;
        }

        // Markers double as the legend anchors: a lone recorded semester still
        // shows as a point even when no line segment survives the gaps.
        let labelled: [(&str, &[Option<f64>; SEMESTER_COUNT], RGBColor); 2] = [
            ("Student Performance", student, STUDENT_LINE),
            ("Class Average", class_mean, CLASS_LINE),
        ];
        for (label, series, color) in labelled {
            let points = present_points(series);
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                )
                .map_err(draw_err)?
                .label(label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart
                .draw_series(points.iter().map(|&(x, y)| {
                    Text::new(format!("{:.2}", y), (x, y + 0.15), value_label_style(&color))
                }))
                .map_err(draw_err)?;
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(draw_err)?;
        root.present().map_err(draw_err)?;
    }
    encode_png(raw, size)
}
