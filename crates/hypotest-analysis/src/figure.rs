//! Renderable chart descriptions
//!
//! Every operation describes its charts as a [`Figure`]: a titled stack of one
//! or more [`Panel`]s. Figures are plain data; turning them into pixels or
//! terminal cells is the job of a [`Renderer`].

use hypotest_stats::boxplot::{BoxSummary, MeanSpread};

/// A figure made of vertically stacked panels.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Figure {
    pub title: String,
    /// Never empty.
    pub panels: Vec<Panel>,
}

impl Figure {
    /// Figure with a single panel.
    #[must_use]
    pub fn single(title: impl Into<String>, panel: Panel) -> Self {
        Self {
            title: title.into(),
            panels: vec![panel],
        }
    }

    /// Figure stacking the given panels; `None` when there are no panels.
    #[must_use]
    pub fn stacked(title: impl Into<String>, panels: Vec<Panel>) -> Option<Self> {
        (!panels.is_empty()).then(|| Self {
            title: title.into(),
            panels,
        })
    }
}

/// One plotting area with its own title and axis labels.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub plot: Plot,
}

/// What is drawn inside a panel.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Plot {
    /// Density-scaled histogram with an optional smoothed density curve.
    DensityHistogram {
        bins: Vec<DensityBin>,
        /// `(x, density)` points; empty when no density can be estimated.
        density: Vec<(f64, f64)>,
    },
    /// Annotated count matrix.
    Heatmap {
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        counts: Vec<Vec<u64>>,
    },
    /// Side-by-side bars per category, one bar per series.
    GroupedBars {
        categories: Vec<String>,
        series: Vec<BarSeries>,
    },
    /// One box per category.
    BoxPlot { boxes: Vec<Labeled<BoxSummary>> },
    /// One mean marker with a standard-deviation error bar per category.
    PointPlot { points: Vec<Labeled<MeanSpread>> },
}

/// A histogram bar.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct DensityBin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
    pub density: f64,
}

/// Values of one bar series, aligned with the plot's categories.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BarSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// A value tagged with the category it belongs to.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Labeled<T> {
    pub label: String,
    pub value: T,
}

/// Failure to display or store a figure.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RenderError {
    #[display("I/O error while rendering: {_0}")]
    Io(std::io::Error),
    #[display("failed to serialize figure: {_0}")]
    Serialize(serde_json::Error),
    #[display("no interactive terminal available for rendering")]
    #[from(skip)]
    NoTerminal,
}

/// Turns figures into visual output.
///
/// Implementations may block until the output has been dismissed.
pub trait Renderer {
    fn render(&mut self, figure: &Figure) -> Result<(), RenderError>;
}

/// Renderer that discards every figure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _figure: &Figure) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Hands `figure` to `renderer`, logging instead of propagating failures.
///
/// Returns whether rendering succeeded.
pub(crate) fn render_logged(renderer: &mut dyn Renderer, figure: &Figure) -> bool {
    match renderer.render(figure) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(figure = %figure.title, error = %err, "failed to render figure");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Panel {
        Panel {
            title: "t".into(),
            x_label: "x".into(),
            y_label: "y".into(),
            plot: Plot::GroupedBars {
                categories: vec!["a".into()],
                series: vec![],
            },
        }
    }

    #[test]
    fn test_stacked_requires_panels() {
        assert!(Figure::stacked("empty", vec![]).is_none());
        let figure = Figure::stacked("one", vec![panel()]).unwrap();
        assert_eq!(figure.panels.len(), 1);
    }

    #[test]
    fn test_plot_serializes_with_kind_tag() {
        let json = serde_json::to_value(Figure::single("f", panel())).unwrap();
        assert_eq!(json["panels"][0]["plot"]["kind"], "grouped_bars");
    }

    #[test]
    fn test_failing_renderer_is_logged() {
        struct Failing;
        impl Renderer for Failing {
            fn render(&mut self, _figure: &Figure) -> Result<(), RenderError> {
                Err(RenderError::NoTerminal)
            }
        }
        assert!(!render_logged(&mut Failing, &Figure::single("f", panel())));
        assert!(render_logged(&mut NullRenderer, &Figure::single("f", panel())));
    }
}
