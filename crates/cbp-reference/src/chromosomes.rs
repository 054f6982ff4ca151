//! Chromosome length tables per reference genome build.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{ReferenceError, Result};
use crate::http::HttpFetcher;
use crate::paths::CHROMOSOME_SIZES_DIR;

/// Build assumed when a study does not declare one.
pub const DEFAULT_REFERENCE_GENOME: &str = "hg19";

/// Builds a study may declare.
pub const SUPPORTED_BUILDS: &[&str] = &["hg19", "hg38", "mm10"];

const UCSC_DOWNLOAD_URL: &str = "https://hgdownload.soe.ucsc.edu/goldenPath";

/// Length of every canonical chromosome of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromosomeLengths {
    lengths: BTreeMap<String, u64>,
}

impl ChromosomeLengths {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        Self {
            lengths: pairs
                .into_iter()
                .map(|(name, length)| (normalize_chromosome(name), length))
                .collect(),
        }
    }

    /// Parse a UCSC `chrom.sizes` table (name, tab, length). Alternate
    /// haplotypes, unplaced contigs and the mitochondrial genome are dropped.
    pub fn parse(reader: impl Read, origin: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut lengths = BTreeMap::new();
        for record in reader.records() {
            let record = record.map_err(|error| ReferenceError::Table {
                path: origin.to_path_buf(),
                message: error.to_string(),
            })?;
            let (Some(name), Some(length)) = (record.get(0), record.get(1)) else {
                continue;
            };
            let name = normalize_chromosome(name);
            if !is_canonical(&name) {
                continue;
            }
            let length = length
                .trim()
                .parse::<u64>()
                .map_err(|error| ReferenceError::Table {
                    path: origin.to_path_buf(),
                    message: format!("invalid length for {name}: {error}"),
                })?;
            lengths.insert(name, length);
        }
        Ok(Self { lengths })
    }

    /// Length of `chromosome`, accepting `chr` prefixes and `23`/`24` for X/Y.
    pub fn length_of(&self, chromosome: &str) -> Option<u64> {
        self.lengths.get(&normalize_chromosome(chromosome)).copied()
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

/// Strip a `chr` prefix and map numeric sex chromosomes to their letters.
pub fn normalize_chromosome(name: &str) -> String {
    let trimmed = name.trim();
    let bare = trimmed
        .strip_prefix("chr")
        .or_else(|| trimmed.strip_prefix("CHR"))
        .or_else(|| trimmed.strip_prefix("Chr"))
        .unwrap_or(trimmed);
    match bare {
        "23" => "X".to_string(),
        "24" => "Y".to_string(),
        "x" => "X".to_string(),
        "y" => "Y".to_string(),
        other => other.to_string(),
    }
}

fn is_canonical(name: &str) -> bool {
    name == "X" || name == "Y" || name.parse::<u8>().is_ok_and(|number| number > 0)
}

/// Provider of chromosome lengths for a reference genome build.
pub trait ChromosomeSource {
    fn chromosome_lengths(&self, build: &str) -> Result<ChromosomeLengths>;
}

/// Fixed tables, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChromosomes {
    builds: BTreeMap<String, ChromosomeLengths>,
}

impl InMemoryChromosomes {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_build(mut self, build: impl Into<String>, lengths: ChromosomeLengths) -> Self {
        self.builds.insert(build.into(), lengths);
        self
    }
}

impl ChromosomeSource for InMemoryChromosomes {
    fn chromosome_lengths(&self, build: &str) -> Result<ChromosomeLengths> {
        self.builds
            .get(build)
            .cloned()
            .ok_or_else(|| ReferenceError::UnknownBuild {
                build: build.to_string(),
            })
    }
}

/// Reads `<dir>/chromosome-sizes/<build>.chrom.sizes`, falling back to the
/// UCSC download server when a fetcher is configured.
#[derive(Debug, Clone, Default)]
pub struct CachedChromosomeSource {
    cache_dir: Option<PathBuf>,
    fetcher: Option<HttpFetcher>,
}

impl CachedChromosomeSource {
    pub fn new(cache_dir: Option<PathBuf>, fetcher: Option<HttpFetcher>) -> Self {
        Self { cache_dir, fetcher }
    }

    fn cached_path(&self, build: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| {
                dir.join(CHROMOSOME_SIZES_DIR)
                    .join(format!("{build}.chrom.sizes"))
            })
            .filter(|path| path.is_file())
    }
}

impl ChromosomeSource for CachedChromosomeSource {
    fn chromosome_lengths(&self, build: &str) -> Result<ChromosomeLengths> {
        if let Some(path) = self.cached_path(build) {
            debug!(path = %path.display(), "reading cached chromosome lengths");
            let file = File::open(&path).map_err(|source| ReferenceError::io(&path, source))?;
            return ChromosomeLengths::parse(file, &path);
        }
        let Some(fetcher) = &self.fetcher else {
            return Err(ReferenceError::UnknownBuild {
                build: build.to_string(),
            });
        };
        let url = format!("{UCSC_DOWNLOAD_URL}/{build}/bigZips/{build}.chrom.sizes");
        let body = fetcher.get_text(&url)?;
        let lengths = ChromosomeLengths::parse(body.as_bytes(), Path::new(&url))?;
        if lengths.is_empty() {
            return Err(ReferenceError::Decode {
                url,
                message: "no canonical chromosomes listed".to_string(),
            });
        }
        info!(build, chromosomes = lengths.len(), "downloaded chromosome lengths");
        Ok(lengths)
    }
}
