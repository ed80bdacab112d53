//! Per-stage counts

use crate::source::{IngestReport, SourceKind};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionReport {
    pub taxonomy: usize,
    pub locations: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxLocReport {
    pub pairs: usize,
    /// Records that did not resolve against both dimensions
    pub misses: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactReport {
    pub facts: usize,
    pub dropped: usize,
}

/// Everything a full run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub ingest: BTreeMap<SourceKind, IngestReport>,
    pub dimensions: DimensionReport,
    pub taxloc: TaxLocReport,
    pub facts: BTreeMap<SourceKind, FactReport>,
}

impl RunReport {
    pub fn total_facts(&self) -> usize {
        self.facts.values().map(|f| f.facts).sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<10} {:>10} {:>10} {:>10}", "SOURCE", "LINES", "ACCEPTED", "REJECTED")?;
        for (source, report) in &self.ingest {
            writeln!(
                f,
                "{:<10} {:>10} {:>10} {:>10}",
                source,
                report.lines,
                report.accepted,
                report.rejected()
            )?;
        }
        writeln!(f, "taxonomy rows:  {}", self.dimensions.taxonomy)?;
        writeln!(f, "location rows:  {}", self.dimensions.locations)?;
        writeln!(f, "taxloc pairs:   {}", self.taxloc.pairs)?;
        for (source, report) in &self.facts {
            write!(f, "facts {:<8} {}", source, report.facts)?;
            if report.dropped > 0 {
                write!(f, " ({} dropped)", report.dropped)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
