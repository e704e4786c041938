use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::settings::ConfigOverrides;

#[derive(Parser)]
#[command(name = "lte-power-mapper")]
#[command(about = "Maps LTE signal power per operator from monthly measurement slices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress spinners")]
    pub quiet: bool,
}

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Directory holding the monthly slices")]
    pub source_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Output directory for figures [default: <source-dir>/figures]")]
    pub figures_dir: Option<PathBuf>,

    #[arg(long, global = true, value_delimiter = ',', help = "Months to aggregate, e.g. Jun,Jul,Aug")]
    pub months: Option<Vec<String>>,

    #[arg(short, long, global = true, help = "Quantile bins per axis")]
    pub num_bins: Option<usize>,

    #[arg(long, global = true, help = "Numeric column to smooth and classify")]
    pub feature: Option<String>,

    #[arg(long, global = true, help = "Figure resolution")]
    pub dpi: Option<u32>,

    #[arg(long, global = true, help = "Skip captions, axis labels and legends (no fonts needed)")]
    pub no_annotations: bool,
}

impl SettingsArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_dir: self.source_dir.clone(),
            figures_dir: self.figures_dir.clone(),
            months: self.months.clone(),
            num_bins: self.num_bins,
            feature: self.feature.clone(),
            dpi: self.dpi,
            no_annotations: self.no_annotations,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate (or load cached) slices, bin, classify and render figures
    Run {
        #[arg(long, help = "Write a JSON run summary to this path")]
        summary_json: Option<PathBuf>,
    },

    /// Build the aggregated cache file from the monthly slices
    Aggregate {
        #[arg(long, help = "Rebuild even if a cache file exists")]
        force: bool,
    },

    /// Summarise the aggregated dataset and report integrity issues
    Info,
}
