//! SVG Charts
//!
//! Bar chart of mean time per benchmark and line chart for `n` sweeps. The y
//! axis is logarithmic by default: variants differ by orders of magnitude.

use crate::format_duration;
use crate::report::{ComparisonSeries, Report};
use std::fmt::Write as _;

const MARGIN_LEFT: f64 = 100.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 120.0;

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Dark text on white
    #[default]
    Light,
    /// Light text on near-black
    Dark,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

struct Palette {
    background: &'static str,
    foreground: &'static str,
    grid: &'static str,
    minor_grid: &'static str,
    series: &'static [&'static str],
}

impl Theme {
    fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: "#ffffff",
                foreground: "#222222",
                grid: "#555555",
                minor_grid: "#dddddd",
                series: &["#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3", "#937860"],
            },
            Theme::Dark => Palette {
                background: "#1e1e1e",
                foreground: "#eeeeee",
                grid: "#aaaaaa",
                minor_grid: "#444444",
                series: &["#8ab4f8", "#f6ae2d", "#81c995", "#f28b82", "#c58af9", "#fdd663"],
            },
        }
    }
}

/// Chart rendering options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color theme
    pub theme: Theme,
    /// Logarithmic y axis
    pub log_scale: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            theme: Theme::Light,
            log_scale: true,
        }
    }
}

/// Chart rendering errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartError {
    /// No plottable values
    #[error("nothing to plot")]
    NoData,
    /// A value a log scale cannot place
    #[error("'{label}' has value {value}, which a log scale cannot show")]
    NonPositive {
        /// Bar or series label
        label: String,
        /// Offending value
        value: f64,
    },
    /// Image below the minimum size
    #[error("chart size {width}x{height} is too small (minimum 320x240)")]
    TooSmall {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// No results or series for the requested group
    #[error("group '{0}' not found in report")]
    UnknownGroup(String),
}

/// Maps values to vertical pixel positions
struct YScale {
    lo: f64,
    hi: f64,
    log: bool,
    top: f64,
    bottom: f64,
}

impl YScale {
    fn new(min: f64, max: f64, log: bool, top: f64, bottom: f64) -> Self {
        let (lo, hi) = if log {
            let lo = min.log10().floor();
            let hi = max.log10().ceil();
            (lo, if hi <= lo { lo + 1.0 } else { hi })
        } else {
            let hi = if max > 0.0 { max * 1.1 } else { 1.0 };
            (0.0, hi)
        };
        Self {
            lo,
            hi,
            log,
            top,
            bottom,
        }
    }

    fn y(&self, value: f64) -> f64 {
        let v = if self.log { value.log10() } else { value };
        let frac = ((v - self.lo) / (self.hi - self.lo)).clamp(0.0, 1.0);
        self.bottom - frac * (self.bottom - self.top)
    }

    /// (value, is_major) grid lines
    fn grid(&self) -> Vec<(f64, bool)> {
        let mut lines = Vec::new();
        if self.log {
            let (lo, hi) = (self.lo as i32, self.hi as i32);
            for decade in lo..=hi {
                let base = 10f64.powi(decade);
                lines.push((base, true));
                if decade < hi {
                    lines.extend((2..10).map(|m| (base * f64::from(m), false)));
                }
            }
        } else {
            lines.extend((0..=5).map(|i| (self.hi * f64::from(i) / 5.0, true)));
        }
        lines
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn check_size(options: &ChartOptions) -> Result<(), ChartError> {
    if options.width < 320 || options.height < 240 {
        return Err(ChartError::TooSmall {
            width: options.width,
            height: options.height,
        });
    }
    Ok(())
}

fn check_positive<'a>(
    options: &ChartOptions,
    values: impl Iterator<Item = (&'a str, f64)>,
) -> Result<(f64, f64), ChartError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut any = false;
    for (label, value) in values {
        if options.log_scale && value <= 0.0 {
            return Err(ChartError::NonPositive {
                label: label.to_string(),
                value,
            });
        }
        min = min.min(value);
        max = max.max(value);
        any = true;
    }
    if !any {
        return Err(ChartError::NoData);
    }
    Ok((min, max))
}

/// Header, background, title, grid and y axis
fn open_svg(title: &str, y_label: &str, scale: &YScale, options: &ChartOptions) -> String {
    let palette = options.theme.palette();
    let w = f64::from(options.width);
    let right = w - MARGIN_RIGHT;
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" font-family="sans-serif">"#,
        options.width, options.height, options.width, options.height
    );
    let _ = writeln!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        palette.background
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="22" fill="{}">{}</text>"#,
        w / 2.0,
        MARGIN_TOP / 2.0,
        palette.foreground,
        escape_xml(title)
    );

    for (value, major) in scale.grid() {
        let y = scale.y(value);
        let (stroke, width) = if major {
            (palette.grid, 1.0)
        } else {
            (palette.minor_grid, 0.5)
        };
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{}"/>"#,
            MARGIN_LEFT, y, right, y, stroke, width
        );
        if major {
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12" fill="{}">{}</text>"#,
                MARGIN_LEFT - 8.0,
                y + 4.0,
                palette.foreground,
                escape_xml(&format_duration(value))
            );
        }
    }

    let _ = writeln!(
        svg,
        r#"<text transform="translate({:.1},{:.1}) rotate(-90)" text-anchor="middle" font-size="14" fill="{}">{}</text>"#,
        24.0,
        (scale.top + scale.bottom) / 2.0,
        palette.foreground,
        escape_xml(y_label)
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}"/>"#,
        MARGIN_LEFT, scale.top, MARGIN_LEFT, scale.bottom, palette.foreground
    );
    svg
}

/// Bar chart, one bar per `(label, value)`
pub fn render_bar_chart(
    title: &str,
    y_label: &str,
    bars: &[(String, f64)],
    options: &ChartOptions,
) -> Result<String, ChartError> {
    check_size(options)?;
    let (min, max) = check_positive(options, bars.iter().map(|(l, v)| (l.as_str(), *v)))?;

    let palette = options.theme.palette();
    let bottom = f64::from(options.height) - MARGIN_BOTTOM;
    let scale = YScale::new(min, max, options.log_scale, MARGIN_TOP, bottom);
    let mut svg = open_svg(title, y_label, &scale, options);

    let plot_width = f64::from(options.width) - MARGIN_LEFT - MARGIN_RIGHT;
    let slot = plot_width / bars.len() as f64;
    let bar_width = slot * 0.7;

    for (i, (label, value)) in bars.iter().enumerate() {
        let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_width) / 2.0;
        let y = scale.y(*value);
        let color = palette.series[i % palette.series.len()];
        let center = x + bar_width / 2.0;

        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"#,
            x,
            y,
            bar_width,
            (bottom - y).max(0.0),
            color,
            escape_xml(label),
            escape_xml(&format_duration(*value))
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="{}">{}</text>"#,
            center,
            y - 6.0,
            palette.foreground,
            escape_xml(&format_duration(*value))
        );
        let _ = writeln!(
            svg,
            r#"<text transform="translate({:.1},{:.1}) rotate(-35)" text-anchor="end" font-size="13" fill="{}">{}</text>"#,
            center,
            bottom + 18.0,
            palette.foreground,
            escape_xml(label)
        );
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Line chart: one polyline per series across the x values
pub fn render_line_chart(
    series: &ComparisonSeries,
    options: &ChartOptions,
) -> Result<String, ChartError> {
    check_size(options)?;
    if series.x_values.is_empty() {
        return Err(ChartError::NoData);
    }
    let points = series
        .series_names
        .iter()
        .zip(&series.series_data)
        .flat_map(|(name, row)| row.iter().flatten().map(move |v| (name.as_str(), *v)));
    let (min, max) = check_positive(options, points)?;

    let palette = options.theme.palette();
    let bottom = f64::from(options.height) - MARGIN_BOTTOM;
    let scale = YScale::new(min, max, options.log_scale, MARGIN_TOP, bottom);
    let mut svg = open_svg(&series.title, &series.metric, &scale, options);

    let plot_width = f64::from(options.width) - MARGIN_LEFT - MARGIN_RIGHT;
    let step = plot_width / series.x_values.len() as f64;
    let x_at = |i: usize| MARGIN_LEFT + step * (i as f64 + 0.5);

    for (i, x_value) in series.x_values.iter().enumerate() {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="{}">{}</text>"#,
            x_at(i),
            bottom + 18.0,
            palette.foreground,
            escape_xml(x_value)
        );
    }
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14" fill="{}">{}</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        bottom + 48.0,
        palette.foreground,
        escape_xml(&series.x_label)
    );

    for (s, (name, row)) in series.series_names.iter().zip(&series.series_data).enumerate() {
        let color = palette.series[s % palette.series.len()];
        let coords: Vec<(f64, f64)> = row
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (x_at(i), scale.y(v))))
            .collect();

        let path: Vec<String> = coords.iter().map(|(x, y)| format!("{:.1},{:.1}", x, y)).collect();
        let _ = writeln!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            path.join(" "),
            color
        );
        for (x, y) in &coords {
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{}"/>"#,
                x, y, color
            );
        }

        let legend_y = MARGIN_TOP + 18.0 * s as f64;
        let legend_x = f64::from(options.width) - MARGIN_RIGHT - 160.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/><text x="{:.1}" y="{:.1}" font-size="12" fill="{}">{}</text>"#,
            legend_x,
            legend_y,
            color,
            legend_x + 18.0,
            legend_y + 10.0,
            palette.foreground,
            escape_xml(name)
        );
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Chart for a saved report: the sweep series when present, otherwise a bar
/// chart of mean time per benchmark.
pub fn chart_from_report(
    report: &Report,
    group: Option<&str>,
    options: &ChartOptions,
) -> Result<String, ChartError> {
    if let Some(series) = report
        .comparison_series
        .iter()
        .find(|s| group.is_none_or(|g| s.group == g))
    {
        return render_line_chart(series, options);
    }

    if let Some(g) = group {
        if !report.results.iter().any(|r| r.group == g) {
            return Err(ChartError::UnknownGroup(g.to_string()));
        }
    }

    let bars: Vec<(String, f64)> = report
        .results
        .iter()
        .filter(|r| group.is_none_or(|g| r.group == g))
        .filter_map(|r| r.metrics.as_ref().map(|m| (r.id.clone(), m.mean_ns)))
        .collect();

    let title = match group {
        Some(g) => format!("{}: mean time per call", g),
        None => "Mean time per call".to_string(),
    };
    render_bar_chart(&title, "time per call", &bars, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::{sample_report, sample_series};

    #[test]
    fn test_bar_chart_contains_every_bar() {
        let svg = chart_from_report(&sample_report(), Some("fib"), &ChartOptions::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect x=").count(), 3);
        assert!(svg.contains("fib/naive"));
        assert!(svg.contains("571.00 µs"));
    }

    #[test]
    fn test_crashed_benchmarks_are_skipped() {
        let svg = chart_from_report(&sample_report(), Some("stddev"), &ChartOptions::default()).unwrap();
        assert_eq!(svg.matches("<rect x=").count(), 1);
        assert!(!svg.contains("stddev/native"));
    }

    #[test]
    fn test_log_scale_decades() {
        let scale = YScale::new(7.31, 571_000.0, true, 0.0, 100.0);
        assert_eq!(scale.lo, 0.0);
        assert_eq!(scale.hi, 6.0);
        let majors = scale.grid().iter().filter(|(_, major)| *major).count();
        assert_eq!(majors, 7);
        assert!((scale.y(1.0) - 100.0).abs() < 1e-9);
        assert!((scale.y(1_000_000.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_scale_rejects_zero() {
        let bars = vec![("a".to_string(), 0.0)];
        let err = render_bar_chart("t", "y", &bars, &ChartOptions::default()).unwrap_err();
        assert!(matches!(err, ChartError::NonPositive { .. }));

        let linear = ChartOptions {
            log_scale: false,
            ..ChartOptions::default()
        };
        assert!(render_bar_chart("t", "y", &bars, &linear).is_ok());
    }

    #[test]
    fn test_errors() {
        let options = ChartOptions::default();
        assert_eq!(
            render_bar_chart("t", "y", &[], &options).unwrap_err(),
            ChartError::NoData
        );
        assert_eq!(
            chart_from_report(&sample_report(), Some("nope"), &options).unwrap_err(),
            ChartError::UnknownGroup("nope".into())
        );
        let tiny = ChartOptions {
            width: 10,
            ..options
        };
        assert!(matches!(
            render_bar_chart("t", "y", &[("a".into(), 1.0)], &tiny),
            Err(ChartError::TooSmall { .. })
        ));
    }

    #[test]
    fn test_line_chart_from_series() {
        let mut report = sample_report();
        report.comparison_series.push(sample_series());
        let svg = chart_from_report(&report, None, &ChartOptions::default()).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 2);
        // One missing point in the second series
        assert_eq!(svg.matches("<circle").count(), 7);
        assert!(svg.contains("iterative"));
    }

    #[test]
    fn test_dark_theme_and_escaping() {
        let options = ChartOptions {
            theme: "dark".parse().unwrap(),
            ..ChartOptions::default()
        };
        let bars = vec![("a<b>&c".to_string(), 10.0)];
        let svg = render_bar_chart("x & y", "t", &bars, &options).unwrap();
        assert!(svg.contains("#1e1e1e"));
        assert!(svg.contains("a&lt;b&gt;&amp;c"));
        assert!(svg.contains("x &amp; y"));
    }
}
