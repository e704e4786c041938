use crate::analyzers::{DatasetAnalyzer, GaussianKde};
use crate::cache::CsvFrameCache;
use crate::error::{ProcessingError, Result};
use crate::models::{MeasurementFrame, Operator, PowerClass};
use crate::processors::{
    BinnedFrame, ClassPartition, FeatureSmoother, IntegrityChecker, IntegrityReport,
    MonthlyAggregator, PowerThresholds, SpatialBinner,
};
use crate::readers::SliceReader;
use crate::settings::PipelineConfig;
use crate::utils::constants::{
    COL_LATITUDE, COL_LONGITUDE, COL_OPERATOR, DENSITY_FIGURE_FILE, KDE_EVAL_POINTS,
};
use crate::utils::filename::operator_figure_path;
use crate::utils::progress::ProgressReporter;
use crate::writers::{DensityCurve, FigureWriter, ScatterLayer};
use serde::Serialize;
use std::path::PathBuf;

const DENSITY_TITLE: &str = "4G signal strength by operator";
const DENSITY_X_LABEL: &str = "Total signal power";

/// Per-operator outcome of a run
#[derive(Debug, Clone, Serialize)]
pub struct OperatorSummary {
    pub operator: Operator,
    pub records: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub kde_bandwidth: Option<f64>,
    pub figure: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_records: usize,
    pub num_bins: usize,
    pub feature: String,
    pub thresholds: PowerThresholds,
    pub integrity: IntegrityReport,
    pub operators: Vec<OperatorSummary>,
    pub density_figure: PathBuf,
}

/// Load → aggregate → cache → bin → per-operator smoothing, classification and figures
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn cache(&self) -> CsvFrameCache {
        CsvFrameCache::new(&self.config.source_dir).with_sources(self.config.slice_paths())
    }

    /// Read every configured month and concatenate them
    pub fn aggregate_slices(&self, progress: Option<&ProgressReporter>) -> Result<MeasurementFrame> {
        let reader = SliceReader::new().with_year_suffix(&self.config.year_suffix);
        let month_map = reader.read_months(&self.config.source_dir, &self.config.months, progress)?;
        MonthlyAggregator::new().aggregate(&month_map, &self.config.months)
    }

    /// The aggregated dataset, from the cache when present
    pub fn load_aggregate(
        &self,
        force_refresh: bool,
        progress: Option<&ProgressReporter>,
    ) -> Result<MeasurementFrame> {
        let cache = self.cache();
        if force_refresh {
            cache.invalidate(&self.config.cache_file)?;
        }

        if let Some(p) = progress {
            p.set_message("Loading aggregated measurements...");
        }
        cache.get_or_compute(&self.config.cache_file, || self.aggregate_slices(progress))
    }

    pub fn run(&self, progress: Option<&ProgressReporter>) -> Result<RunSummary> {
        let figures_dir = self.config.figures_path();
        if !figures_dir.is_dir() {
            return Err(ProcessingError::MissingOutputDir(
                figures_dir.display().to_string(),
            ));
        }

        let frame = self.load_aggregate(false, progress)?;
        self.run_on(frame, progress)
    }

    /// Everything after aggregation, on an already loaded frame
    pub fn run_on(
        &self,
        frame: MeasurementFrame,
        progress: Option<&ProgressReporter>,
    ) -> Result<RunSummary> {
        let config = &self.config;
        let figures_dir = config.figures_path();

        if let Some(p) = progress {
            p.set_message("Checking measurement integrity...");
        }
        let integrity = IntegrityChecker::new().check_integrity(&frame)?;

        // Thresholds come from the whole dataset, before the per-operator split
        let thresholds = PowerThresholds::from_values(&frame.numeric_column(&config.feature)?)?;
        tracing::info!(
            low = thresholds.low,
            high = thresholds.high,
            feature = %config.feature,
            "Global power thresholds"
        );

        let stats = DatasetAnalyzer::new(&config.feature, config.num_bins).analyze(&frame)?;
        for line in stats.bin_width_summary().lines() {
            tracing::info!("{}", line);
        }

        if let Some(p) = progress {
            p.set_message("Binning measurements spatially...");
        }
        let total_records = frame.len();
        let binned = SpatialBinner::new(config.num_bins).bin(frame)?;

        let operator_rows = self.rows_by_operator(&binned)?;
        let writer = FigureWriter::new(config.dpi).with_annotations(config.annotate);
        let smoother = FeatureSmoother::new(&config.feature);

        let mut curves = Vec::new();
        let mut operators = Vec::new();

        for (operator, rows) in operator_rows {
            if rows.is_empty() {
                tracing::warn!(%operator, "No measurements for operator, skipping");
                continue;
            }
            if let Some(p) = progress {
                p.set_message(&format!("Mapping {}...", operator));
            }

            let subset = binned.select(&rows);

            let values = subset.frame.numeric_column(&config.feature)?;
            let kde = match GaussianKde::new(values.iter().flatten().copied().collect()) {
                Ok(kde) => Some(kde),
                Err(e) => {
                    tracing::warn!(%operator, error = %e, "No density curve for operator");
                    None
                }
            };
            if let Some(ref kde) = kde {
                curves.push(DensityCurve {
                    operator,
                    points: kde.curve(KDE_EVAL_POINTS),
                });
            }

            let smoothed = smoother.smooth(subset)?;
            let partition = ClassPartition::build(&smoothed, &thresholds);
            let layers = scatter_layers(&smoothed.binned, &partition)?;

            let figure = operator_figure_path(&figures_dir, operator);
            writer.write_scatter(operator.label(), &layers, &figure)?;

            tracing::info!(
                %operator,
                records = rows.len(),
                low = partition.low.len(),
                medium = partition.medium.len(),
                high = partition.high.len(),
                "Classified operator bins"
            );

            operators.push(OperatorSummary {
                operator,
                records: rows.len(),
                low: partition.low.len(),
                medium: partition.medium.len(),
                high: partition.high.len(),
                kde_bandwidth: kde.as_ref().map(GaussianKde::bandwidth),
                figure,
            });
        }

        let density_figure = figures_dir.join(DENSITY_FIGURE_FILE);
        writer.write_density(&curves, DENSITY_TITLE, DENSITY_X_LABEL, &density_figure)?;

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Mapped {} operators from {} records",
                operators.len(),
                total_records
            ));
        }

        Ok(RunSummary {
            total_records,
            num_bins: config.num_bins,
            feature: config.feature.clone(),
            thresholds,
            integrity,
            operators,
            density_figure,
        })
    }

    /// Row indices per known operator, in enum order
    fn rows_by_operator(&self, binned: &BinnedFrame) -> Result<Vec<(Operator, Vec<usize>)>> {
        let labels = binned.frame.text_column(COL_OPERATOR)?;
        Ok(Operator::ALL
            .iter()
            .map(|&op| {
                let rows = labels
                    .iter()
                    .enumerate()
                    .filter(|(_, label)| **label == Some(op.label()))
                    .map(|(i, _)| i)
                    .collect();
                (op, rows)
            })
            .collect())
    }
}

/// (longitude, latitude) points of each class, skipping rows without a location
fn scatter_layers(binned: &BinnedFrame, partition: &ClassPartition) -> Result<Vec<ScatterLayer>> {
    let latitudes = binned.frame.numeric_column(COL_LATITUDE)?;
    let longitudes = binned.frame.numeric_column(COL_LONGITUDE)?;

    Ok(PowerClass::ALL
        .iter()
        .map(|&class| ScatterLayer {
            class,
            points: partition
                .rows(class)
                .iter()
                .filter_map(|&row| Some((longitudes[row]?, latitudes[row]?)))
                .collect(),
        })
        .collect())
}
