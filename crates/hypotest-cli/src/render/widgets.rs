use hypotest_analysis::figure::{BarSeries, DensityBin, Labeled, Panel, Plot};
use hypotest_stats::boxplot::{BoxSummary, MeanSpread};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::{Marker, merge::MergeStrategy},
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType, Paragraph, Widget,
        canvas::{self, Canvas, Points},
    },
};

const SERIES_COLORS: [Color; 4] = [Color::Cyan, Color::Yellow, Color::Magenta, Color::Green];

// Yellow-green-blue sequential scale, light to dark
const HEAT_STOPS: [(u8, u8, u8); 5] = [
    (255, 255, 217),
    (199, 233, 180),
    (65, 182, 196),
    (34, 94, 168),
    (8, 29, 88),
];

pub(super) struct PanelWidget<'a> {
    pub panel: &'a Panel,
}

impl Widget for PanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let panel = self.panel;
        let block = Block::bordered()
            .merge_borders(MergeStrategy::Exact)
            .title(panel.title.as_str());
        let inner = block.inner(area);
        Widget::render(block, area, buf);

        match &panel.plot {
            Plot::DensityHistogram { bins, density } => DensityChart {
                bins,
                density,
                x_title: &panel.x_label,
                y_title: &panel.y_label,
            }
            .render(inner, buf),
            Plot::Heatmap {
                row_labels,
                col_labels,
                counts,
            } => Heatmap {
                row_labels,
                col_labels,
                counts,
            }
            .render(inner, buf),
            Plot::GroupedBars { categories, series } => {
                GroupedBars { categories, series }.render(inner, buf);
            }
            Plot::BoxPlot { boxes } => BoxPlot { boxes }.render(inner, buf),
            Plot::PointPlot { points } => PointPlot { points }.render(inner, buf),
        }
    }
}

fn axis_labels(bounds: [f64; 2]) -> [String; 3] {
    [
        format!("{:.2}", bounds[0]),
        format!("{:.2}", f64::midpoint(bounds[0], bounds[1])),
        format!("{:.2}", bounds[1]),
    ]
}

/// `[min, max]` of `values` padded by 5% on both sides.
fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((max - min) * 0.05).max(f64::EPSILON.max(min.abs() * 1e-6));
    [min - pad, max + pad]
}

struct DensityChart<'a> {
    bins: &'a [DensityBin],
    density: &'a [(f64, f64)],
    x_title: &'a str,
    y_title: &'a str,
}

impl Widget for DensityChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let (Some(first), Some(last)) = (self.bins.first(), self.bins.last()) else {
            Paragraph::new("no data").render(area, buf);
            return;
        };
        let bars = self
            .bins
            .iter()
            .map(|bin| (f64::midpoint(bin.start, bin.end), bin.density))
            .collect::<Vec<_>>();
        let x_bounds = [first.start, last.end];
        let y_max = bars
            .iter()
            .chain(self.density)
            .map(|(_, y)| *y)
            .fold(0.0, f64::max);
        let y_bounds = [0.0, if y_max > 0.0 { y_max * 1.1 } else { 1.0 }];

        let mut datasets = vec![
            Dataset::default()
                .name("histogram")
                .marker(Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(Color::Cyan))
                .data(&bars),
        ];
        if !self.density.is_empty() {
            datasets.push(
                Dataset::default()
                    .name("KDE")
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::Yellow))
                    .data(self.density),
            );
        }

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title(self.x_title)
                    .bounds(x_bounds)
                    .labels(axis_labels(x_bounds)),
            )
            .y_axis(
                Axis::default()
                    .title(self.y_title)
                    .bounds(y_bounds)
                    .labels(axis_labels(y_bounds)),
            );
        Widget::render(chart, area, buf);
    }
}

struct Heatmap<'a> {
    row_labels: &'a [String],
    col_labels: &'a [String],
    counts: &'a [Vec<u64>],
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn heat_color(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0) * (HEAT_STOPS.len() - 1) as f64;
    let idx = (t.floor() as usize).min(HEAT_STOPS.len() - 2);
    let frac = t - idx as f64;
    let (r0, g0, b0) = HEAT_STOPS[idx];
    let (r1, g1, b1) = HEAT_STOPS[idx + 1];
    let lerp =
        |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    Color::Rgb(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

impl Widget for Heatmap<'_> {
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let max = self.counts.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
        let label_width = self
            .row_labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
            .min(usize::from(area.width / 3)) as u16
            + 1;

        let rows = Layout::vertical(
            std::iter::once(Constraint::Length(1))
                .chain(self.row_labels.iter().map(|_| Constraint::Fill(1))),
        )
        .split(area);
        let columns = |row: Rect| {
            Layout::horizontal(
                std::iter::once(Constraint::Length(label_width))
                    .chain(self.col_labels.iter().map(|_| Constraint::Fill(1))),
            )
            .split(row)
        };

        let header = columns(rows[0]);
        for (label, cell) in self.col_labels.iter().zip(header.iter().skip(1)) {
            Paragraph::new(label.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::BOLD))
                .render(*cell, buf);
        }

        let body_rows = rows.iter().skip(1);
        for ((label, counts), row) in self.row_labels.iter().zip(self.counts).zip(body_rows) {
            let cells = columns(*row);
            Paragraph::new(label.as_str())
                .style(Style::default().add_modifier(Modifier::BOLD))
                .render(cells[0], buf);
            for (count, cell) in counts.iter().zip(cells.iter().skip(1)) {
                let t = *count as f64 / max;
                let fg = if t < 0.5 { Color::Black } else { Color::White };
                // Vertically centre the annotation
                let [_, middle, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(1),
                    Constraint::Fill(1),
                ])
                .areas(*cell);
                Block::default()
                    .style(Style::default().bg(heat_color(t)))
                    .render(*cell, buf);
                Paragraph::new(count.to_string())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(fg).bg(heat_color(t)))
                    .render(middle, buf);
            }
        }
    }
}

struct GroupedBars<'a> {
    categories: &'a [String],
    series: &'a [BarSeries],
}

impl Widget for GroupedBars<'_> {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let legend = Line::from(
            self.series
                .iter()
                .zip(SERIES_COLORS.iter().cycle())
                .map(|(s, color)| {
                    Span::styled(format!("■ {}  ", s.label), Style::default().fg(*color))
                })
                .collect::<Vec<_>>(),
        );
        let [legend_area, chart_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        legend.render(legend_area, buf);

        let num_series = u16::try_from(self.series.len()).unwrap_or(u16::MAX).max(1);
        let num_groups = u16::try_from(self.categories.len()).unwrap_or(u16::MAX).max(1);
        let bar_width = (chart_area.width / num_groups)
            .saturating_sub(2)
            .checked_div(num_series)
            .unwrap_or(1)
            .clamp(1, 9);

        let mut chart = BarChart::default().bar_width(bar_width).bar_gap(0).group_gap(2);
        for (idx, category) in self.categories.iter().enumerate() {
            let bars = self
                .series
                .iter()
                .zip(SERIES_COLORS.iter().cycle())
                .map(|(s, color)| {
                    let value = s.values.get(idx).copied().unwrap_or(0.0);
                    Bar::default()
                        .value(value.max(0.0).round() as u64)
                        .text_value(format!("{value:.1}"))
                        .style(Style::default().fg(*color))
                })
                .collect::<Vec<_>>();
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(category.clone()))
                    .bars(&bars),
            );
        }
        Widget::render(chart, chart_area, buf);
    }
}

/// Prints category labels under the x positions `1..=n`.
#[expect(clippy::cast_precision_loss)]
fn print_category_labels(ctx: &mut canvas::Context<'_>, labels: &[String], y: f64) {
    ctx.layer();
    for (idx, label) in labels.iter().enumerate() {
        ctx.print(idx as f64 + 0.7, y, Line::from(label.clone()));
    }
}

#[expect(clippy::cast_precision_loss)]
fn category_x_bounds(count: usize) -> [f64; 2] {
    [0.0, count as f64 + 1.0]
}

struct BoxPlot<'a> {
    boxes: &'a [Labeled<BoxSummary>],
}

impl Widget for BoxPlot<'_> {
    #[expect(clippy::cast_precision_loss)]
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let labels = self.boxes.iter().map(|b| b.label.clone()).collect::<Vec<_>>();
        let y_bounds = padded_bounds(self.boxes.iter().flat_map(|b| {
            let s = &b.value;
            [s.lower_whisker, s.upper_whisker]
                .into_iter()
                .chain(s.outliers.iter().copied())
        }));
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(category_x_bounds(labels.len()))
            .y_bounds(y_bounds)
            .paint(|ctx| {
                let colored = self.boxes.iter().zip(SERIES_COLORS.iter().cycle());
                for (idx, (b, color)) in colored.enumerate() {
                    let s = &b.value;
                    let x = idx as f64 + 1.0;
                    let (left, right) = (x - 0.3, x + 0.3);
                    let line = |x1, y1, x2, y2| canvas::Line::new(x1, y1, x2, y2, *color);
                    // Box
                    ctx.draw(&line(left, s.q1, right, s.q1));
                    ctx.draw(&line(left, s.q3, right, s.q3));
                    ctx.draw(&line(left, s.q1, left, s.q3));
                    ctx.draw(&line(right, s.q1, right, s.q3));
                    let median = canvas::Line::new(left, s.median, right, s.median, Color::White);
                    ctx.draw(&median);
                    // Whiskers with caps
                    ctx.draw(&line(x, s.q3, x, s.upper_whisker));
                    ctx.draw(&line(x, s.q1, x, s.lower_whisker));
                    ctx.draw(&line(x - 0.15, s.upper_whisker, x + 0.15, s.upper_whisker));
                    ctx.draw(&line(x - 0.15, s.lower_whisker, x + 0.15, s.lower_whisker));

                    let outliers = s.outliers.iter().map(|y| (x, *y)).collect::<Vec<_>>();
                    ctx.draw(&Points {
                        coords: &outliers,
                        color: Color::Red,
                    });
                }
                print_category_labels(ctx, &labels, y_bounds[0]);
            });
        Widget::render(canvas, area, buf);
    }
}

struct PointPlot<'a> {
    points: &'a [Labeled<MeanSpread>],
}

impl Widget for PointPlot<'_> {
    #[expect(clippy::cast_precision_loss)]
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let spread = |m: &MeanSpread| if m.std_dev.is_finite() { m.std_dev } else { 0.0 };
        let labels = self.points.iter().map(|p| p.label.clone()).collect::<Vec<_>>();
        let y_bounds = padded_bounds(self.points.iter().flat_map(|p| {
            let m = &p.value;
            [m.mean - spread(m), m.mean + spread(m)]
        }));
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(category_x_bounds(labels.len()))
            .y_bounds(y_bounds)
            .paint(|ctx| {
                let means = self
                    .points
                    .iter()
                    .enumerate()
                    .map(|(idx, p)| (idx as f64 + 1.0, p.value.mean))
                    .collect::<Vec<_>>();
                for pair in means.windows(2) {
                    let [(x1, y1), (x2, y2)] = [pair[0], pair[1]];
                    ctx.draw(&canvas::Line::new(x1, y1, x2, y2, Color::DarkGray));
                }
                for ((x, mean), p) in means.iter().zip(self.points) {
                    let sd = spread(&p.value);
                    let (low, high) = (mean - sd, mean + sd);
                    ctx.draw(&canvas::Line::new(*x, low, *x, high, Color::Cyan));
                    ctx.draw(&canvas::Line::new(x - 0.1, low, x + 0.1, low, Color::Cyan));
                    ctx.draw(&canvas::Line::new(x - 0.1, high, x + 0.1, high, Color::Cyan));
                }
                ctx.draw(&Points {
                    coords: &means,
                    color: Color::Yellow,
                });
                print_category_labels(ctx, &labels, y_bounds[0]);
            });
        Widget::render(canvas, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(0.0), Color::Rgb(255, 255, 217));
        assert_eq!(heat_color(1.0), Color::Rgb(8, 29, 88));
        assert_eq!(heat_color(2.0), Color::Rgb(8, 29, 88));
    }

    #[test]
    fn test_padded_bounds() {
        assert_eq!(padded_bounds(std::iter::empty()), [0.0, 1.0]);
        let [lo, hi] = padded_bounds([0.0, 10.0].into_iter());
        assert!((lo + 0.5).abs() < 1e-12);
        assert!((hi - 10.5).abs() < 1e-12);
        let [lo, hi] = padded_bounds([3.0, 3.0].into_iter());
        assert!(lo < 3.0 && hi > 3.0);
    }

    #[test]
    fn test_panels_draw_into_buffer() {
        let panel = Panel {
            title: "counts".to_owned(),
            x_label: "col".to_owned(),
            y_label: "row".to_owned(),
            plot: Plot::Heatmap {
                row_labels: vec!["a".to_owned(), "b".to_owned()],
                col_labels: vec!["x".to_owned(), "y".to_owned()],
                counts: vec![vec![1, 2], vec![3, 40]],
            },
        };
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        PanelWidget { panel: &panel }.render(area, &mut buf);
        let text = buf
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert!(text.contains("counts"));
        assert!(text.contains("40"));
    }
}
