use crate::analyzers::DatasetAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::processors::{IntegrityChecker, Pipeline};
use crate::settings::PipelineConfig;
use crate::utils::progress::ProgressReporter;

pub fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::load(cli.settings.config.as_deref(), &cli.settings.overrides())?;
    let quiet = cli.quiet;
    let pipeline = Pipeline::new(config);

    match cli.command {
        Commands::Run { summary_json } => {
            let config = pipeline.config();
            println!("Mapping signal power...");
            println!("Source directory: {}", config.source_dir.display());
            println!("Figures directory: {}", config.figures_path().display());
            println!("Bins per axis: {}, Feature: {}", config.num_bins, config.feature);

            let progress = ProgressReporter::new_spinner("Starting pipeline...", quiet);
            let summary = pipeline.run(Some(&progress))?;

            let checker = IntegrityChecker::new();
            println!("\n{}", checker.generate_summary(&summary.integrity));

            println!(
                "Thresholds: low < {:.2}, high > {:.2}",
                summary.thresholds.low, summary.thresholds.high
            );
            for op in &summary.operators {
                println!(
                    "{:<10} {:>8} records  low {:>7}  medium {:>7}  high {:>7}  -> {}",
                    op.operator.label(),
                    op.records,
                    op.low,
                    op.medium,
                    op.high,
                    op.figure.display()
                );
            }
            println!("Density figure: {}", summary.density_figure.display());

            if let Some(path) = summary_json {
                let file = std::fs::File::create(&path)?;
                serde_json::to_writer_pretty(file, &summary)?;
                println!("Run summary written to {}", path.display());
            }

            println!("Processing complete!");
        }

        Commands::Aggregate { force } => {
            let config = pipeline.config();
            println!("Aggregating {} monthly slices...", config.months.len());

            let progress = ProgressReporter::new(
                config.months.len() as u64,
                "Reading monthly slices...",
                quiet,
            );
            let frame = pipeline.load_aggregate(force, Some(&progress))?;
            progress.finish_with_message(&format!("Aggregated {} records", frame.len()));

            println!(
                "Cache file: {} ({} records, {} columns)",
                config.cache_path().display(),
                frame.len(),
                frame.headers().len()
            );
        }

        Commands::Info => {
            let config = pipeline.config();
            println!("Analyzing aggregated data in {}", config.source_dir.display());

            let progress = ProgressReporter::new_spinner("Loading measurements...", quiet);
            let frame = pipeline.load_aggregate(false, Some(&progress))?;
            progress.finish_with_message(&format!("Loaded {} records", frame.len()));

            let analyzer = DatasetAnalyzer::new(&config.feature, config.num_bins);
            let stats = analyzer.analyze(&frame)?;
            println!("\n{}", stats.detailed_summary());

            let checker = IntegrityChecker::new();
            let report = checker.check_integrity(&frame)?;
            println!("\n{}", checker.generate_summary(&report));
        }
    }

    Ok(())
}
