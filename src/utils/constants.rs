/// Required column names
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_OPERATOR: &str = "operator";
pub const COL_TOTAL_POWER: &str = "total_power";

/// File names
pub const SLICE_FILE_PREFIX: &str = "lte";
pub const DEFAULT_YEAR_SUFFIX: &str = "18";
pub const DEFAULT_CACHE_FILE: &str = "4g_monthly_agg.csv";
pub const DENSITY_FIGURE_FILE: &str = "density.png";

/// Directory names
pub const FIGURES_DIR: &str = "figures";

/// Field delimiters
pub const SLICE_DELIMITER: u8 = b'\t';
pub const CACHE_DELIMITER: u8 = b',';

/// Months covered by the 2018 yellow-train slice
pub const DEFAULT_MONTHS: [&str; 6] = ["Jun", "Jul", "Aug", "Sep", "Oct", "Nov"];

/// Processing defaults
pub const DEFAULT_NUM_BINS: usize = 50;
pub const DEFAULT_DPI: u32 = 100;
pub const KDE_EVAL_POINTS: usize = 10;
pub const LOW_QUANTILE: f64 = 0.25;
pub const HIGH_QUANTILE: f64 = 0.75;

/// Figure geometry (inches, matplotlib defaults)
pub const FIGURE_WIDTH_IN: f64 = 6.4;
pub const FIGURE_HEIGHT_IN: f64 = 4.8;

/// Scatter marker area in points squared
pub const SCATTER_MARKER_AREA: f64 = 25.0;
pub const SCATTER_ALPHA: f64 = 0.1;

/// Field values treated as missing
pub const MISSING_MARKERS: [&str; 5] = ["", "NaN", "nan", "NA", "null"];

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "LTE";
