use crate::models::{MonthLabel, Operator};
use crate::utils::constants::SLICE_FILE_PREFIX;
use std::path::{Path, PathBuf};

/// Slice file name with format: lte_{Mon}_{YY}.csv
pub fn slice_file_name(month: MonthLabel, year_suffix: &str) -> String {
    format!("{}_{}_{}.csv", SLICE_FILE_PREFIX, month, year_suffix)
}

/// Full path of a monthly slice inside `dir`
pub fn slice_path(dir: &Path, month: MonthLabel, year_suffix: &str) -> PathBuf {
    dir.join(slice_file_name(month, year_suffix))
}

/// Scatter figure path with format: {figures_dir}/{operator}.png
pub fn operator_figure_path(figures_dir: &Path, operator: Operator) -> PathBuf {
    figures_dir.join(format!("{}.png", operator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_file_name() {
        let month: MonthLabel = "Jun".parse().unwrap();
        assert_eq!(slice_file_name(month, "18"), "lte_Jun_18.csv");

        let month: MonthLabel = "september".parse().unwrap();
        assert_eq!(slice_file_name(month, "19"), "lte_Sep_19.csv");
    }

    #[test]
    fn test_slice_path() {
        let month: MonthLabel = "Nov".parse().unwrap();
        let path = slice_path(Path::new("data/yellow"), month, "18");
        assert_eq!(path, PathBuf::from("data/yellow/lte_Nov_18.csv"));
    }

    #[test]
    fn test_operator_figure_path() {
        let path = operator_figure_path(Path::new("figures"), Operator::Vodafone);
        assert_eq!(path, PathBuf::from("figures/Vodafone.png"));
    }
}
