//! Common test utilities for the star schema tests
//!
//! Raw dump lines are built from a source-independent `Occurrence` so the
//! same observation can be written in each publisher's column layout.

#![allow(dead_code)]

use biostar::{InputConfig, SourceKind};
use std::path::{Path, PathBuf};

pub const VERTNET_WIDTH: usize = 24;
pub const EBIRD_WIDTH: usize = 23;
pub const GBIF_WIDTH: usize = 24;

/// One observation before it is laid out as a raw line
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub id: String,
    pub taxonomy: [String; 7],
    pub lat: String,
    pub lon: String,
    pub date: String,
}

impl Occurrence {
    pub fn new(taxonomy: [&str; 7], lat: &str, lon: &str) -> Self {
        Self {
            id: format!("urn:occ:{}", uuid::Uuid::new_v4()),
            taxonomy: taxonomy.map(String::from),
            lat: lat.into(),
            lon: lon.into(),
            date: "1962-07-14".into(),
        }
    }

    pub fn peromyscus() -> Self {
        Self::new(
            [
                "Peromyscus maniculatus",
                "Animalia",
                "Chordata",
                "Mammalia",
                "Rodentia",
                "",
                "Peromyscus",
            ],
            "39.539146",
            "-87.41389",
        )
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.taxonomy[0] = name.into();
        self
    }

    /// VertNet harvest line; `scientificname` then the six ranks
    pub fn vertnet_line(&self) -> String {
        let mut fields = vec![String::new(); VERTNET_WIDTH];
        fields[0] = self.id.clone();
        fields[1] = "MVZ".into();
        for (i, value) in self.taxonomy.iter().enumerate() {
            fields[5 + i] = value.clone();
        }
        fields[14] = self.lat.clone();
        fields[15] = self.lon.clone();
        fields[16] = "30".into();
        fields[18] = self.date.clone();
        fields[19] = "United States".into();
        fields.join("\t")
    }

    /// eBird line; only the scientific name is carried
    pub fn ebird_line(&self) -> String {
        let mut fields = vec![String::new(); EBIRD_WIDTH];
        fields[0] = self.id.clone();
        fields[3] = "Common name".into();
        fields[4] = self.taxonomy[0].clone();
        fields[17] = self.lat.clone();
        fields[18] = self.lon.clone();
        fields[19] = self.date.clone();
        fields.join("\t")
    }

    /// GBIF simple download line; ranks first, then species
    pub fn gbif_line(&self) -> String {
        let mut fields = vec![String::new(); GBIF_WIDTH];
        fields[0] = self.id.clone();
        for (i, value) in self.taxonomy[1..].iter().enumerate() {
            fields[3 + i] = value.clone();
        }
        fields[9] = self.taxonomy[0].clone();
        fields[15] = self.lat.clone();
        fields[16] = self.lon.clone();
        let mut date = self.date.split('-');
        fields[18] = date.next().unwrap_or_default().into();
        fields[19] = date.next().unwrap_or_default().into();
        fields.join("\t")
    }

    pub fn line(&self, source: SourceKind) -> String {
        match source {
            SourceKind::VertNet => self.vertnet_line(),
            SourceKind::EBird => self.ebird_line(),
            SourceKind::Gbif => self.gbif_line(),
        }
    }
}

/// Write `lines` as a raw dump file under `dir`
pub fn write_dump(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut text = lines.join("\n");
    text.push('\n');
    std::fs::write(&path, text).unwrap();
    path
}

pub fn input(source: SourceKind, path: PathBuf) -> InputConfig {
    InputConfig {
        source,
        path,
        skip_header: false,
    }
}
