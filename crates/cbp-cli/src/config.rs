//! Run configuration: options file, flag overrides and the portal data source.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use cbp_model::PortalInstance;
use cbp_reference::{
    CachedChromosomeSource, HttpFetcher, PortalClient, load_portal_info, portal_info_dir_from_env,
};
use cbp_validate::ValidationOptions;

/// Where portal reference data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalSource {
    /// Offline portal-info directory.
    Directory(PathBuf),
    /// Live portal REST API.
    Url(String),
    /// No portal checks at all.
    Disabled,
}

impl PortalSource {
    /// Pick the source from the flags, falling back to `PORTAL_INFO_DIR`.
    ///
    /// Without any of them, portal checks are disabled.
    pub fn select(dir: Option<&Path>, url: Option<&str>, no_portal_checks: bool) -> Self {
        Self::select_with_env(dir, url, no_portal_checks, portal_info_dir_from_env())
    }

    pub fn select_with_env(
        dir: Option<&Path>,
        url: Option<&str>,
        no_portal_checks: bool,
        env_dir: Option<PathBuf>,
    ) -> Self {
        if no_portal_checks {
            return Self::Disabled;
        }
        if let Some(dir) = dir {
            return Self::Directory(dir.to_path_buf());
        }
        if let Some(url) = url {
            return Self::Url(url.to_string());
        }
        env_dir.map_or(Self::Disabled, Self::Directory)
    }

    /// Load the portal snapshot.
    pub fn load_portal(&self) -> Result<PortalInstance> {
        match self {
            Self::Directory(dir) => {
                info!(dir = %dir.display(), "loading portal info directory");
                load_portal_info(dir)
                    .with_context(|| format!("load portal info from {}", dir.display()))
            }
            Self::Url(url) => {
                info!(url = %url, "fetching portal info");
                let client = PortalClient::new(url.as_str()).context("create portal client")?;
                client
                    .fetch_portal_info()
                    .with_context(|| format!("fetch portal info from {url}"))
            }
            Self::Disabled => {
                warn!("portal checks disabled");
                Ok(PortalInstance::without_checks())
            }
        }
    }

    /// Chromosome lengths come from the portal-info directory cache first.
    /// Downloads are only allowed when portal checks are enabled.
    pub fn chromosome_source(&self) -> Result<CachedChromosomeSource> {
        match self {
            Self::Directory(dir) => Ok(CachedChromosomeSource::new(
                Some(dir.clone()),
                Some(HttpFetcher::new().context("create HTTP client")?),
            )),
            Self::Url(_) => Ok(CachedChromosomeSource::new(
                None,
                Some(HttpFetcher::new().context("create HTTP client")?),
            )),
            Self::Disabled => Ok(CachedChromosomeSource::new(portal_info_dir_from_env(), None)),
        }
    }
}

/// Flag values that override the options file.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub relaxed_mode: bool,
    pub strict_maf_checks: bool,
    pub max_reported_values: Option<usize>,
}

impl OptionOverrides {
    /// Flags only ever switch behavior on; they never reset a file value.
    pub fn apply(&self, mut options: ValidationOptions) -> ValidationOptions {
        if self.relaxed_mode {
            options.relaxed_mode = true;
        }
        if self.strict_maf_checks {
            options.strict_maf_checks = true;
        }
        if let Some(max) = self.max_reported_values {
            options.max_reported_values = max;
        }
        options
    }
}

/// Parse a TOML options file. Missing keys keep their defaults.
pub fn parse_options(text: &str) -> Result<ValidationOptions> {
    toml::from_str(text).context("parse options file")
}

/// Build the run's options from an optional TOML file plus flag overrides.
pub fn load_options(path: Option<&Path>, overrides: &OptionOverrides) -> Result<ValidationOptions> {
    let base = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read options file {}", path.display()))?;
            parse_options(&text).with_context(|| format!("in {}", path.display()))?
        }
        None => ValidationOptions::default(),
    };
    Ok(overrides.apply(base))
}
