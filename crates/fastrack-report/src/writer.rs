//! Tab-separated curve writer.
//!
//! [`CurveWriter`] streams one row per successful sample to any `Write`
//! sink. The header is written immediately on construction; failed
//! samples become comment lines so plotting tools skip them.

use std::io::Write;

use fastrack_core::{ParameterResolution, ResolutionQuantity};
use fastrack_engine::{ReportMode, ResolutionResult, SampleFailure};

use crate::error::ReportError;
use crate::FORMAT_VERSION;

/// Describes the table a [`CurveWriter`] is about to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportHeader {
    /// Which curves the table holds.
    pub mode: ReportMode,
    /// Number of completed samples in the scan.
    pub samples: usize,
    /// [`report_hash`](crate::report_hash) of those samples.
    pub fingerprint: u64,
}

/// Writes resolution rows to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use fastrack_engine::ReportMode;
/// use fastrack_report::{CurveWriter, ReportHeader};
///
/// let header = ReportHeader { mode: ReportMode::TrackerOnly, samples: 0, fingerprint: 0 };
/// let mut buf = Vec::new();
/// let writer = CurveWriter::new(&mut buf, &header).unwrap();
/// assert_eq!(writer.rows_written(), 0);
/// drop(writer);
///
/// let text = String::from_utf8(buf).unwrap();
/// assert!(text.starts_with("# fastrack report v1\n# mode: tracker-only\n"));
/// ```
pub struct CurveWriter<W: Write> {
    writer: W,
    rows_written: u64,
}

impl<W: Write> CurveWriter<W> {
    /// Create a writer, immediately writing the header block and the
    /// column names.
    pub fn new(mut writer: W, header: &ReportHeader) -> Result<Self, ReportError> {
        writeln!(writer, "# fastrack report v{FORMAT_VERSION}")?;
        writeln!(writer, "# mode: {}", header.mode)?;
        writeln!(writer, "# samples: {}", header.samples)?;
        writeln!(writer, "# fingerprint: {:#018x}", header.fingerprint)?;

        let mut columns = vec!["pt".to_string(), "eta".to_string()];
        columns.extend(ResolutionQuantity::ALL.iter().map(|q| q.label().to_string()));
        columns.extend(
            ResolutionQuantity::ALL
                .iter()
                .map(|q| format!("expected_{}", q.label())),
        );
        columns.extend(
            [
                "reconstruction_probability",
                "good_probability",
                "fake_probability",
                "unfit_probability",
                "reached_layers",
                "x_over_x0",
            ]
            .map(String::from),
        );
        writeln!(writer, "{}", columns.join("\t"))?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Append one successful sample.
    pub fn write_result(&mut self, r: &ResolutionResult) -> Result<(), ReportError> {
        write!(self.writer, "{}\t{}", r.pt, r.rapidity)?;
        self.write_resolution(Some(&r.nominal))?;
        self.write_resolution(r.expected.as_ref())?;
        writeln!(
            self.writer,
            "\t{}\t{}\t{}\t{}\t{}\t{}",
            r.reconstruction_probability,
            r.good_probability,
            r.fake_probability,
            r.unfit_probability,
            r.reached_layers,
            r.material
        )?;
        self.rows_written += 1;
        Ok(())
    }

    /// Append a failed sample as a comment line.
    pub fn write_failure(&mut self, f: &SampleFailure) -> Result<(), ReportError> {
        writeln!(self.writer, "# failed {f}")?;
        Ok(())
    }

    // Missing values are written as `nan` so every row keeps its width.
    fn write_resolution(&mut self, r: Option<&ParameterResolution>) -> Result<(), ReportError> {
        for q in ResolutionQuantity::ALL {
            match r {
                Some(r) => write!(self.writer, "\t{}", r.get(q))?,
                None => write!(self.writer, "\tnan")?,
            }
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), ReportError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of data rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Consume the writer and return the underlying `Write` sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
