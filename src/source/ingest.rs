//! Raw ingest: split, align, clean, filter
//!
//! Every line gets a fresh UUID before cleaning. Lines that fail validation
//! are counted and dropped; nothing here returns an error.

use super::record::CleanedRecord;
use super::traits::{RejectionReason, SourceAdapter};
use tracing::{debug, info};
use uuid::Uuid;

/// Counts from one ingest pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Lines read, including blank ones
    pub lines: usize,
    pub blank: usize,
    pub accepted: usize,
    pub wrong_width: usize,
    pub invalid_name: usize,
    pub invalid_coordinates: usize,
}

impl IngestReport {
    pub fn rejected(&self) -> usize {
        self.wrong_width + self.invalid_name + self.invalid_coordinates
    }

    fn record(&mut self, reason: &RejectionReason) {
        match reason {
            RejectionReason::WrongWidth { .. } => self.wrong_width += 1,
            RejectionReason::InvalidName(_) => self.invalid_name += 1,
            RejectionReason::InvalidCoordinates => self.invalid_coordinates += 1,
        }
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: &IngestReport) {
        self.lines += other.lines;
        self.blank += other.blank;
        self.accepted += other.accepted;
        self.wrong_width += other.wrong_width;
        self.invalid_name += other.invalid_name;
        self.invalid_coordinates += other.invalid_coordinates;
    }
}

/// Split a tab-delimited line into exactly `width` fields.
///
/// Ragged schemas pad short lines with empty fields and drop excess ones;
/// strict schemas reject any other width.
pub fn split_line(line: &str, width: usize, ragged: bool) -> Result<Vec<&str>, RejectionReason> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields: Vec<&str> = line.split('\t').collect();

    if fields.len() == width {
        return Ok(fields);
    }
    if !ragged {
        return Err(RejectionReason::WrongWidth {
            expected: width,
            found: fields.len(),
        });
    }
    fields.resize(width, "");
    Ok(fields)
}

/// Clean a single raw line with `adapter`.
pub fn ingest_line(adapter: &dyn SourceAdapter, line: &str) -> Result<CleanedRecord, RejectionReason> {
    let fields = split_line(line, adapter.columns().len(), adapter.ragged())?;
    adapter.clean(Uuid::new_v4(), &fields)
}

/// Clean every line, keeping the records that validate.
pub fn ingest<I, S>(adapter: &dyn SourceAdapter, lines: I) -> (Vec<CleanedRecord>, IngestReport)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = IngestReport::default();
    let mut records = Vec::new();

    for (number, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        report.lines += 1;
        if line.trim().is_empty() {
            report.blank += 1;
            continue;
        }

        match ingest_line(adapter, line) {
            Ok(record) => {
                report.accepted += 1;
                records.push(record);
            }
            Err(reason) => {
                debug!(source = %adapter.kind(), line = number + 1, %reason, "dropped raw record");
                report.record(&reason);
            }
        }
    }

    info!(
        source = %adapter.kind(),
        lines = report.lines,
        accepted = report.accepted,
        rejected = report.rejected(),
        "ingested raw lines"
    );
    (records, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;

    #[test]
    fn split_line_exact_width() {
        assert_eq!(split_line("a\tb\tc", 3, false).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_line_strips_line_endings() {
        assert_eq!(split_line("a\tb\r\n", 2, false).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn ragged_lines_are_padded_or_truncated() {
        assert_eq!(split_line("a\tb\t", 4, true).unwrap(), vec!["a", "b", "", ""]);
        assert_eq!(split_line("a\tb\tc\td\t", 3, true).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn strict_lines_of_wrong_width_are_rejected() {
        assert_eq!(
            split_line("a\tb\t", 2, false).unwrap_err(),
            RejectionReason::WrongWidth { expected: 2, found: 3 }
        );
    }

    #[test]
    fn ingest_counts_every_outcome() {
        let adapter = SourceKind::Gbif.adapter(7);
        let width = adapter.columns().len();

        let mut good = vec![""; width];
        good[9] = "Puma concolor";
        good[15] = "10";
        good[16] = "20";
        let mut no_name = good.clone();
        no_name[9] = "";
        let mut off_map = good.clone();
        off_map[15] = "100";
        off_map[16] = "200";

        let lines = vec![
            good.join("\t"),
            String::new(),
            no_name.join("\t"),
            off_map.join("\t"),
            "too\tshort".to_string(),
            good.join("\t"),
        ];
        let (records, report) = ingest(adapter.as_ref(), &lines);

        assert_eq!(records.len(), 2);
        assert_ne!(records[0].uuid, records[1].uuid);
        assert_eq!(
            report,
            IngestReport {
                lines: 6,
                blank: 1,
                accepted: 2,
                wrong_width: 1,
                invalid_name: 1,
                invalid_coordinates: 1,
            }
        );
        assert_eq!(report.rejected(), 3);
    }

    #[test]
    fn reports_merge() {
        let mut total = IngestReport {
            lines: 2,
            accepted: 1,
            invalid_name: 1,
            ..Default::default()
        };
        total.merge(&IngestReport {
            lines: 3,
            accepted: 3,
            ..Default::default()
        });
        assert_eq!(total.lines, 5);
        assert_eq!(total.accepted, 4);
        assert_eq!(total.rejected(), 1);
    }
}
