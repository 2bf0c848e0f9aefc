use std::{
    fs::{self, File},
    io::{BufWriter, Write as _},
    path::PathBuf,
};

use hypotest_analysis::figure::{Figure, RenderError, Renderer};

/// Stores every figure as pretty-printed JSON, numbered in rendering order.
#[derive(Debug)]
pub(crate) struct FigureWriter {
    dir: PathBuf,
    written: usize,
}

impl FigureWriter {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir, written: 0 }
    }
}

impl Renderer for FigureWriter {
    fn render(&mut self, figure: &Figure) -> Result<(), RenderError> {
        fs::create_dir_all(&self.dir)?;
        let path = self
            .dir
            .join(format!("figure-{:02}.json", self.written + 1));
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, figure)?;
        writeln!(writer)?;
        writer.flush()?;
        self.written += 1;
        tracing::info!(path = %path.display(), title = %figure.title, "figure written");
        Ok(())
    }
}
