//! Line-oriented verdict report

use std::io::{self, Write};

use domain_claims::{ClaimOutcome, VerdictLabels};

use crate::error::CliError;

/// Writes one `<id> -> <LABEL>` line per outcome
///
/// Write failures do not interrupt the batch; the first one is kept and
/// returned by [`ReportWriter::finish`].
pub struct ReportWriter<'a, W: Write> {
    labels: VerdictLabels,
    out: &'a mut W,
    error: Option<io::Error>,
    lines: usize,
}

impl<'a, W: Write> ReportWriter<'a, W> {
    pub fn new(labels: VerdictLabels, out: &'a mut W) -> Self {
        Self {
            labels,
            out,
            error: None,
            lines: 0,
        }
    }

    pub fn write_outcome(&mut self, outcome: &ClaimOutcome) {
        if self.error.is_some() {
            return;
        }
        let line = self.labels.report_line(outcome);
        match writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            Ok(()) => self.lines += 1,
            Err(err) => self.error = Some(err),
        }
    }

    /// Number of lines written, or the first write failure
    pub fn finish(self) -> Result<usize, CliError> {
        match self.error {
            Some(source) => Err(CliError::Report(source)),
            None => Ok(self.lines),
        }
    }
}
