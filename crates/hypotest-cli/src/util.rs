use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use hypotest_analysis::table::RecordTable;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as JSON to `output_path` when one is given; `-` selects
    /// stdout.
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let Some(path) = output_path else {
            return Ok(());
        };
        let mut output = Output::from_output_path(path)?;
        output.write_json(value)?;
        if let Output::File { path, .. } = &output {
            tracing::info!(path = %path.display(), "result written");
        }
        Ok(())
    }

    pub fn from_output_path(output_path: &Path) -> anyhow::Result<Self> {
        if output_path == Path::new("-") {
            Ok(Output::stdout())
        } else {
            Output::open(output_path.to_path_buf())
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Loads a CSV file with a header row.
pub fn read_csv_file<P>(path: P) -> anyhow::Result<RecordTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let table = RecordTable::from_csv_path(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        rows = table.num_rows(),
        columns = table.column_names().count(),
        "loaded table"
    );
    Ok(table)
}

/// Formats an optional statistic for table output.
pub fn format_optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.precision$}"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_save_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        Output::save_json(&serde_json::json!({ "p_value": 0.5 }), Some(&path)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"p_value\": 0.5"));
    }

    #[test]
    fn test_save_json_without_path_is_noop() {
        Output::save_json(&1, None).unwrap();
    }

    #[test]
    fn test_read_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rent.csv");
        fs::write(&path, "bhk,rent\n1,100\n2,NA\n").unwrap();
        let table = read_csv_file(&path).unwrap();
        assert_eq!(table.num_rows(), 2);

        let err = read_csv_file(dir.path().join("missing.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to read CSV file"));
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(0.123_456), 4), "0.1235");
        assert_eq!(format_optional(None, 4), "-");
    }
}
