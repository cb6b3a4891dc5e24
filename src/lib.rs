//! Sales reports from flat files.
//!
//! `generate` writes a random product catalog, a salesperson list and one sales
//! file per salesperson. `report` reads them back, adds up the money each
//! salesperson collected and the units sold of each product, and writes both
//! rankings.

pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod input;
pub mod model;
pub mod money;
pub mod report;
pub mod sales;
pub mod scanner;
pub mod totals;

use tracing::info;

pub use config::Layout;
pub use error::{PipelineError, Rejection};
pub use money::Money;
pub use totals::SalesTotals;

/// Separator of every input and output file
pub const FIELD_SEPARATOR: char = ';';

/// Load the catalogs in `layout`, aggregate every sales file and write both reports
pub fn run_report(layout: &Layout) -> Result<scanner::ScanSummary, PipelineError> {
    let products = catalog::load_products(&layout.products)?;
    let salespeople = catalog::load_salespeople(&layout.salespeople)?;

    let mut totals = SalesTotals::new();
    let summary = scanner::scan_sales_dir(&layout.sales_dir, &products, &salespeople, &mut totals)?;

    report::write_salesperson_report(&layout.salesperson_report, &totals, &salespeople)?;
    report::write_product_report(&layout.product_report, &totals, &products)?;

    info!(dir = %layout.base_dir.display(), "reports generated");
    Ok(summary)
}
