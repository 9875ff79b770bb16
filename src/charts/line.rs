/// Weekly recycling line chart.
///
/// Input is the `reciclajes_semana` mapping from the dashboard endpoint:
/// ISO dates to recycling counts, in the order the server sent them. Each
/// date becomes a short Spanish weekday + day-of-month label (`vie 30`).
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use indexmap::IndexMap;

use super::{
    Axis, ChartConfig, ChartData, ChartKind, ChartOptions, ChartSurface, Dataset, Font, Grid,
    Legend, Paint, Plugins, Scales, Tooltip, draw_if_present,
};

const ACCENT: &str = "#667eea";
const ACCENT_FILL: &str = "rgba(102, 126, 234, 0.1)";
const POINT_BORDER: &str = "#fff";
const TOOLTIP_BACKGROUND: &str = "#333";
const Y_GRID: &str = "rgba(0, 0, 0, 0.05)";

/// Build the line chart configuration for weekly recycling counts.
pub fn recycling_chart_config(data: &IndexMap<String, u64>) -> ChartConfig {
    let labels = data.keys().map(|d| date_label(d)).collect();
    let values = data.values().map(|&v| v as f64).collect();

    ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels,
            datasets: vec![Dataset {
                label: Some("Reciclajes".to_string()),
                data: values,
                border_color: Some(Paint::Single(ACCENT.to_string())),
                background_color: Some(Paint::Single(ACCENT_FILL.to_string())),
                border_width: Some(3),
                fill: Some(true),
                tension: Some(0.4),
                point_background_color: Some(Paint::Single(ACCENT.to_string())),
                point_border_color: Some(Paint::Single(POINT_BORDER.to_string())),
                point_border_width: Some(2),
                point_radius: Some(5),
                hover_offset: None,
            }],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            cutout: None,
            plugins: Plugins {
                legend: Legend {
                    display: Some(false),
                    ..Legend::default()
                },
                tooltip: Some(Tooltip {
                    background_color: TOOLTIP_BACKGROUND.to_string(),
                    title_font: Font { size: 14 },
                    body_font: Font { size: 13 },
                    padding: 12,
                    corner_radius: 8,
                }),
            },
            scales: Some(Scales {
                y: Axis {
                    begin_at_zero: Some(true),
                    grid: Grid {
                        color: Some(Y_GRID.to_string()),
                        display: None,
                    },
                },
                x: Axis {
                    begin_at_zero: None,
                    grid: Grid {
                        color: None,
                        display: Some(false),
                    },
                },
            }),
        },
    }
}

/// Draw the weekly recycling chart onto `canvas_id`. No-op if the canvas is
/// absent.
pub fn create_recycling_chart(
    surface: &mut dyn ChartSurface,
    canvas_id: &str,
    data: &IndexMap<String, u64>,
) -> bool {
    draw_if_present(surface, canvas_id, || recycling_chart_config(data))
}

/// Short Spanish weekday plus day of month for an ISO date or datetime.
///
/// Keys that are not dates are returned unchanged.
pub fn date_label(key: &str) -> String {
    match parse_date(key) {
        Some(date) => format!("{} {}", weekday_short_es(date.weekday()), date.day()),
        None => key.to_string(),
    }
}

fn parse_date(key: &str) -> Option<NaiveDate> {
    let key = key.trim();
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(key, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(key)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn weekday_short_es(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lun",
        Weekday::Tue => "mar",
        Weekday::Wed => "mié",
        Weekday::Thu => "jue",
        Weekday::Fri => "vie",
        Weekday::Sat => "sáb",
        Weekday::Sun => "dom",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn week() -> IndexMap<String, u64> {
        let mut data = IndexMap::new();
        data.insert("2026-01-30".to_string(), 15);
        data.insert("2026-01-31".to_string(), 22);
        data.insert("2026-02-01".to_string(), 18);
        data
    }

    #[test]
    fn labels_are_spanish_short_weekdays() {
        assert_eq!(date_label("2026-01-30"), "vie 30");
        assert_eq!(date_label("2026-01-31"), "sáb 31");
        assert_eq!(date_label("2026-02-01"), "dom 1");
        assert_eq!(date_label("2026-02-04"), "mié 4");
    }

    #[test]
    fn datetime_keys_use_their_date() {
        assert_eq!(date_label("2026-02-02T10:30:00"), "lun 2");
        assert_eq!(date_label("2026-02-03T23:00:00+00:00"), "mar 3");
    }

    #[test]
    fn unparseable_keys_pass_through() {
        assert_eq!(date_label("semana 5"), "semana 5");
        assert_eq!(date_label(""), "");
    }

    #[test]
    fn labels_and_values_follow_key_order() {
        let chart = recycling_chart_config(&week());
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.data.labels, vec!["vie 30", "sáb 31", "dom 1"]);
        assert_eq!(chart.data.datasets[0].data, vec![15.0, 22.0, 18.0]);
    }

    #[test]
    fn serialized_shape_matches_chart_js() {
        let json = recycling_chart_config(&week()).to_json();
        let ds = &json["data"]["datasets"][0];
        assert_eq!(ds["label"], "Reciclajes");
        assert_eq!(ds["borderColor"], "#667eea");
        assert_eq!(ds["backgroundColor"], "rgba(102, 126, 234, 0.1)");
        assert_eq!(ds["borderWidth"], 3);
        assert_eq!(ds["fill"], true);
        assert_eq!(ds["tension"], 0.4);
        assert_eq!(ds["pointBorderColor"], "#fff");
        assert_eq!(ds["pointRadius"], 5);

        let opts = &json["options"];
        assert_eq!(opts["plugins"]["legend"]["display"], false);
        assert_eq!(opts["plugins"]["tooltip"]["backgroundColor"], "#333");
        assert_eq!(opts["plugins"]["tooltip"]["titleFont"]["size"], 14);
        assert_eq!(opts["plugins"]["tooltip"]["cornerRadius"], 8);
        assert_eq!(opts["scales"]["y"]["beginAtZero"], true);
        assert_eq!(opts["scales"]["y"]["grid"]["color"], "rgba(0, 0, 0, 0.05)");
        assert_eq!(opts["scales"]["x"]["grid"]["display"], false);
    }

    #[test]
    fn empty_week_builds_empty_chart() {
        let chart = recycling_chart_config(&IndexMap::new());
        assert!(chart.data.labels.is_empty());
        assert!(chart.data.datasets[0].data.is_empty());
    }
}
