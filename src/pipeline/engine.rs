//! Stage sequencing over a table store

use super::error::{PipelineError, PipelineResult};
use super::paths::{cleaned_source, cleaned_table, fact_table, LOCATION_TABLE, TAXLOC_TABLE, TAXONOMY_TABLE};
use super::report::{DimensionReport, FactReport, RunReport, TaxLocReport};
use crate::clean::DEFAULT_SIGFIGS;
use crate::config::{InputConfig, PipelineConfig};
use crate::source::{ingest, CleanedRecord, FileLineSource, IngestReport, LineSource, SourceKind};
use crate::star::{
    assemble, location_dimension, resolve_pairs, taxonomy_dimension, IdStrategy, LocationRow,
    OccurrenceFact, TaxLocRow, TaxonomyRow,
};
use crate::storage::{read_table, write_table, TableStore};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Runs the normalization stages against a store.
///
/// Every stage reads its inputs from the store and writes its outputs back
/// before returning, so any stage can be re-run on its own once the tables
/// upstream of it exist.
pub struct Pipeline {
    store: Arc<dyn TableStore>,
    lines: Arc<dyn LineSource>,
    sigfigs: usize,
    id_strategy: IdStrategy,
}

impl Pipeline {
    /// Pipeline reading raw files from disk with default settings
    pub fn with_store(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            lines: Arc::new(FileLineSource),
            sigfigs: DEFAULT_SIGFIGS,
            id_strategy: IdStrategy::default(),
        }
    }

    pub fn from_config(store: Arc<dyn TableStore>, config: &PipelineConfig) -> Self {
        Self::with_store(store)
            .sigfigs(config.sigfigs)
            .id_strategy(config.id_strategy)
    }

    pub fn line_source(mut self, lines: Arc<dyn LineSource>) -> Self {
        self.lines = lines;
        self
    }

    pub fn sigfigs(mut self, sigfigs: usize) -> Self {
        self.sigfigs = sigfigs;
        self
    }

    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn store(&self) -> &dyn TableStore {
        self.store.as_ref()
    }

    /// Clean every input and replace `cleaned/<source>` for each source named.
    ///
    /// Inputs of the same source are merged into one table. A source that is
    /// not named keeps whatever cleaned table it already had.
    pub fn ingest_stage(
        &self,
        inputs: &[InputConfig],
    ) -> PipelineResult<BTreeMap<SourceKind, IngestReport>> {
        let mut by_source: BTreeMap<SourceKind, Vec<&InputConfig>> = BTreeMap::new();
        for input in inputs {
            by_source.entry(input.source).or_default().push(input);
        }

        let mut reports = BTreeMap::new();
        for (source, inputs) in by_source {
            let adapter = source.adapter(self.sigfigs);
            let mut records = Vec::new();
            let mut report = IngestReport::default();

            for input in inputs {
                let lines = self.read_lines(&input.path, input.skip_header)?;
                let (mut cleaned, file_report) = ingest(adapter.as_ref(), lines);
                records.append(&mut cleaned);
                report.merge(&file_report);
            }

            let written = write_table(self.store(), &cleaned_table(source), source, &records)?;
            info!(%source, rows = written, "wrote cleaned table");
            reports.insert(source, report);
        }
        Ok(reports)
    }

    fn read_lines(&self, path: &Path, skip_header: bool) -> PipelineResult<Vec<String>> {
        let io_err = |source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        };
        let lines = self
            .lines
            .lines(path)
            .map_err(io_err)?
            .skip(usize::from(skip_header))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(io_err)?;
        Ok(lines)
    }

    /// Sources that currently have a cleaned table
    pub fn cleaned_sources(&self) -> PipelineResult<Vec<SourceKind>> {
        let mut sources: Vec<SourceKind> = self
            .store
            .list_tables()?
            .iter()
            .filter_map(|path| cleaned_source(path))
            .collect();
        sources.sort();
        Ok(sources)
    }

    fn cleaned_records(&self) -> PipelineResult<Vec<CleanedRecord>> {
        let sources = self.cleaned_sources()?;
        if sources.is_empty() {
            return Err(PipelineError::NoCleanedTables);
        }
        let mut records = Vec::new();
        for source in sources {
            records.extend(read_table::<CleanedRecord>(self.store(), &cleaned_table(source), source)?);
        }
        Ok(records)
    }

    /// Build `dim/taxonomy` and `dim/location` from every cleaned table
    pub fn dimension_stage(&self) -> PipelineResult<DimensionReport> {
        let records = self.cleaned_records()?;
        let taxonomy = taxonomy_dimension(&records, &self.id_strategy);
        let locations = location_dimension(&records, &self.id_strategy);

        let report = DimensionReport {
            taxonomy: write_table(self.store(), TAXONOMY_TABLE, (), &taxonomy)?,
            locations: write_table(self.store(), LOCATION_TABLE, (), &locations)?,
        };
        info!(
            records = records.len(),
            taxonomy = report.taxonomy,
            locations = report.locations,
            "wrote dimensions"
        );
        Ok(report)
    }

    fn dimensions(&self) -> PipelineResult<(Vec<TaxonomyRow>, Vec<LocationRow>)> {
        Ok((
            read_table(self.store(), TAXONOMY_TABLE, ())?,
            read_table(self.store(), LOCATION_TABLE, ())?,
        ))
    }

    /// Build `dim/taxonomy_location` from the dimensions and cleaned tables
    pub fn taxloc_stage(&self) -> PipelineResult<TaxLocReport> {
        let (taxonomy, locations) = self.dimensions()?;
        let records = self.cleaned_records()?;
        let outcome = resolve_pairs(&taxonomy, &locations, &records, &self.id_strategy);

        let report = TaxLocReport {
            pairs: write_table(self.store(), TAXLOC_TABLE, (), &outcome.rows)?,
            misses: outcome.misses,
        };
        info!(pairs = report.pairs, misses = report.misses, "wrote taxonomy-location pairs");
        Ok(report)
    }

    /// Build `fact/<source>` for every source with a cleaned table
    pub fn fact_stage(&self) -> PipelineResult<BTreeMap<SourceKind, FactReport>> {
        let (taxonomy, locations) = self.dimensions()?;
        let taxloc: Vec<TaxLocRow> = read_table(self.store(), TAXLOC_TABLE, ())?;

        let sources = self.cleaned_sources()?;
        if sources.is_empty() {
            return Err(PipelineError::NoCleanedTables);
        }

        let mut reports = BTreeMap::new();
        for source in sources {
            let records: Vec<CleanedRecord> = read_table(self.store(), &cleaned_table(source), source)?;
            let outcome = assemble(&taxonomy, &locations, &taxloc, records);
            let facts = write_table::<OccurrenceFact>(self.store(), &fact_table(source), source, &outcome.facts)?;
            info!(%source, facts, dropped = outcome.dropped, "wrote fact table");
            reports.insert(
                source,
                FactReport {
                    facts,
                    dropped: outcome.dropped,
                },
            );
        }
        Ok(reports)
    }

    /// Every stage in order.
    ///
    /// A full run supersedes the previous one: cleaned and fact tables of
    /// sources not named in `inputs` are dropped before the dimensions are
    /// rebuilt.
    pub fn run(&self, inputs: &[InputConfig]) -> PipelineResult<RunReport> {
        let ingest = self.ingest_stage(inputs)?;
        for source in SourceKind::ALL {
            if ingest.contains_key(&source) {
                continue;
            }
            let cleaned = self.store.drop_table(&cleaned_table(source))?;
            let facts = self.store.drop_table(&fact_table(source))?;
            if cleaned || facts {
                info!(%source, "dropped tables from a previous run");
            }
        }
        let dimensions = self.dimension_stage()?;
        let taxloc = self.taxloc_stage()?;
        let facts = self.fact_stage()?;
        Ok(RunReport {
            ingest,
            dimensions,
            taxloc,
            facts,
        })
    }
}
