//! Figure renderers used by the commands

use std::path::PathBuf;

use hypotest_analysis::figure::{NullRenderer, Renderer};

pub(crate) use self::{terminal::TerminalRenderer, writer::FigureWriter};

mod terminal;
mod widgets;
mod writer;

/// Options selecting how figures are shown.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct FigureArg {
    /// Skip building and showing figures
    #[arg(long)]
    pub no_visualize: bool,

    /// Write figures as JSON files into this directory instead of showing them
    #[arg(long, conflicts_with = "no_visualize")]
    pub figure_dir: Option<PathBuf>,
}

impl FigureArg {
    pub(crate) fn visualize(&self) -> bool {
        !self.no_visualize
    }

    pub(crate) fn renderer(&self) -> Box<dyn Renderer> {
        match (&self.figure_dir, self.no_visualize) {
            (_, true) => Box::new(NullRenderer),
            (Some(dir), false) => Box::new(FigureWriter::new(dir.clone())),
            (None, false) => Box::new(TerminalRenderer),
        }
    }
}
