/// Distribution donut chart.
///
/// Labels, values and colors are positional: label `i` is drawn with value
/// `i` in color `i`. Extra entries in any of the three are passed through as
/// given; the chart library ignores what it cannot pair up.
use super::{
    ChartConfig, ChartData, ChartKind, ChartOptions, ChartSurface, Dataset, Legend,
    LegendLabels, LegendPosition, Paint, Plugins, draw_if_present,
};

const CUTOUT: &str = "70%";

pub fn donut_chart_config(labels: &[String], values: &[f64], colors: &[String]) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: labels.to_vec(),
            datasets: vec![Dataset {
                data: values.to_vec(),
                background_color: Some(Paint::PerPoint(colors.to_vec())),
                border_width: Some(0),
                hover_offset: Some(10),
                ..Dataset::default()
            }],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            cutout: Some(CUTOUT.to_string()),
            plugins: Plugins {
                legend: Legend {
                    display: None,
                    position: Some(LegendPosition::Bottom),
                    labels: Some(LegendLabels {
                        padding: 20,
                        use_point_style: true,
                    }),
                },
                tooltip: None,
            },
            scales: None,
        },
    }
}

/// Draw a donut chart onto `canvas_id`. No-op if the canvas is absent.
pub fn create_donut_chart(
    surface: &mut dyn ChartSurface,
    canvas_id: &str,
    labels: &[String],
    values: &[f64],
    colors: &[String],
) -> bool {
    draw_if_present(surface, canvas_id, || {
        donut_chart_config(labels, values, colors)
    })
}
