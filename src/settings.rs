use crate::error::Result;
use crate::models::MonthLabel;
use crate::utils::constants::{
    COL_TOTAL_POWER, DEFAULT_CACHE_FILE, DEFAULT_DPI, DEFAULT_MONTHS, DEFAULT_NUM_BINS,
    DEFAULT_YEAR_SUFFIX, ENV_PREFIX, FIGURES_DIR,
};
use crate::utils::filename::slice_path;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Everything a pipeline run needs; no paths are baked into the program
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    /// Directory holding the monthly slices and the aggregate cache
    pub source_dir: PathBuf,

    /// Cache file name, relative to `source_dir`
    #[validate(length(min = 1))]
    pub cache_file: String,

    /// Defaults to `<source_dir>/figures`
    #[serde(default)]
    pub figures_dir: Option<PathBuf>,

    /// Months to aggregate; the first is the base the others are appended to
    #[validate(length(min = 1))]
    pub months: Vec<MonthLabel>,

    #[validate(length(min = 1))]
    pub year_suffix: String,

    #[validate(range(min = 1))]
    pub num_bins: usize,

    #[validate(length(min = 1))]
    pub feature: String,

    #[validate(range(min = 10, max = 600))]
    pub dpi: u32,

    pub annotate: bool,
}

/// Values supplied on the command line, applied over every other source
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub figures_dir: Option<PathBuf>,
    pub months: Option<Vec<String>>,
    pub num_bins: Option<usize>,
    pub feature: Option<String>,
    pub dpi: Option<u32>,
    pub no_annotations: bool,
}

impl PipelineConfig {
    /// Defaults for slices stored in `source_dir`
    pub fn new(source_dir: &Path) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            cache_file: DEFAULT_CACHE_FILE.to_string(),
            figures_dir: None,
            months: DEFAULT_MONTHS
                .iter()
                .filter_map(|m| m.parse().ok())
                .collect(),
            year_suffix: DEFAULT_YEAR_SUFFIX.to_string(),
            num_bins: DEFAULT_NUM_BINS,
            feature: COL_TOTAL_POWER.to_string(),
            dpi: DEFAULT_DPI,
            annotate: true,
        }
    }

    /// Layer built-in defaults, an optional config file, `LTE_*` environment
    /// variables and command-line overrides, in that order.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("source_dir", ".")?
            .set_default("cache_file", DEFAULT_CACHE_FILE)?
            .set_default("months", DEFAULT_MONTHS.to_vec())?
            .set_default("year_suffix", DEFAULT_YEAR_SUFFIX)?
            .set_default("num_bins", DEFAULT_NUM_BINS as i64)?
            .set_default("feature", COL_TOTAL_POWER)?
            .set_default("dpi", DEFAULT_DPI as i64)?
            .set_default("annotate", true)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("months"),
            )
            .set_override_option(
                "source_dir",
                overrides
                    .source_dir
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option(
                "figures_dir",
                overrides
                    .figures_dir
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("months", overrides.months.clone())?
            .set_override_option("num_bins", overrides.num_bins.map(|n| n as i64))?
            .set_override_option("feature", overrides.feature.clone())?
            .set_override_option("dpi", overrides.dpi.map(i64::from))?;

        if overrides.no_annotations {
            builder = builder.set_override("annotate", false)?;
        }

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(?config, "Loaded pipeline configuration");
        Ok(config)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.source_dir.join(&self.cache_file)
    }

    pub fn figures_path(&self) -> PathBuf {
        self.figures_dir
            .clone()
            .unwrap_or_else(|| self.source_dir.join(FIGURES_DIR))
    }

    pub fn slice_paths(&self) -> Vec<PathBuf> {
        self.months
            .iter()
            .map(|&month| slice_path(&self.source_dir, month, &self.year_suffix))
            .collect()
    }
}
