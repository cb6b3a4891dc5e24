use std::{fs::File, path::Path};

use tracing::{info, warn};

use crate::{
    catalog::{ProductCatalog, SalespersonCatalog},
    error::PipelineError,
    sales::parse_sales_file,
    totals::SalesTotals,
};

/// Extension of the per salesperson sales files, matched case-sensitively
pub const SALES_FILE_EXTENSION: &str = "csv";

/// Counters of one scan, for the closing log line
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub files_read: usize,
    pub files_skipped: usize,
    pub lines_accepted: usize,
    pub lines_rejected: usize,
}

/// Sales files in `dir`, sorted by file name so the log reads the same on every run
pub fn sales_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, PipelineError> {
    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let path = entry.path();
        let is_sales_file = path
            .extension()
            .is_some_and(|ext| ext == SALES_FILE_EXTENSION);
        if is_sales_file && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse every sales file in `dir` and add the accepted sales to `totals`.
///
/// A missing directory only produces a warning and leaves `totals` untouched.
pub fn scan_sales_dir(
    dir: &Path,
    products: &ProductCatalog,
    salespeople: &SalespersonCatalog,
    totals: &mut SalesTotals,
) -> Result<ScanSummary, PipelineError> {
    let mut summary = ScanSummary::default();

    if !dir.is_dir() {
        warn!(dir = %dir.display(), "sales directory does not exist");
        return Ok(summary);
    }

    for path in sales_files(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!(file = %name, error = %e, "could not open sales file");
                summary.files_skipped += 1;
                continue;
            }
        };

        let Some(sales) = parse_sales_file(&name, file, products, salespeople)? else {
            summary.files_skipped += 1;
            continue;
        };

        summary.files_read += 1;
        summary.lines_rejected += sales.rejected;
        for line in &sales.lines {
            // the parser only accepts ids that are in the catalog
            let Some(product) = products.get(&line.product) else {
                continue;
            };
            match totals.add_line(line, product) {
                Ok(()) => summary.lines_accepted += 1,
                Err(reason) => {
                    warn!(file = %name, product = %line.product, %reason, "skipping sale");
                    summary.lines_rejected += 1;
                }
            }
        }
    }

    info!(
        dir = %dir.display(),
        files_read = summary.files_read,
        files_skipped = summary.files_skipped,
        lines_accepted = summary.lines_accepted,
        lines_rejected = summary.lines_rejected,
        "sales scanned"
    );
    Ok(summary)
}
