use std::path::{Path, PathBuf};

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// File layout of a data directory.
///
/// `generate` writes the inputs, `report` reads them and writes the two reports
/// next to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub base_dir: PathBuf,
    pub products: PathBuf,
    pub salespeople: PathBuf,
    pub sales_dir: PathBuf,
    pub salesperson_report: PathBuf,
    pub product_report: PathBuf,
}

impl Layout {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            products: base_dir.join("products.csv"),
            salespeople: base_dir.join("salespeople.csv"),
            sales_dir: base_dir.join("sales"),
            salesperson_report: base_dir.join("salesperson_report.csv"),
            product_report: base_dir.join("product_report.csv"),
            base_dir,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
