//! The two ranked summary reports.
//!
//! Both files start with a UTF-8 byte order mark so spreadsheet tools pick the
//! right encoding, and neither has a header row.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    FIELD_SEPARATOR,
    catalog::{ProductCatalog, SalespersonCatalog},
    error::PipelineError,
    money::Money,
    totals::SalesTotals,
};

pub const BOM: &[u8] = "\u{feff}".as_bytes();

/// `FullName;Total`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalespersonRow {
    pub name: String,
    pub total: Money,
}

/// `Name;UnitPrice;TotalQuantity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub name: String,
    pub unit_price: Money,
    pub quantity: u64,
}

/// Rows of the salesperson report, highest total first.
///
/// Keys without a catalog entry are reported under the key itself.
pub fn salesperson_rows(totals: &SalesTotals, salespeople: &SalespersonCatalog) -> Vec<SalespersonRow> {
    let mut rows: Vec<SalespersonRow> = totals
        .money_by_salesperson()
        .iter()
        .map(|(key, total)| SalespersonRow {
            name: salespeople
                .get(key)
                .map(|s| s.full_name())
                .unwrap_or_else(|| key.to_string()),
            total: *total,
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Rows of the product report, most units first
pub fn product_rows(totals: &SalesTotals, products: &ProductCatalog) -> Vec<ProductRow> {
    let mut rows: Vec<ProductRow> = totals
        .units_by_product()
        .iter()
        .filter_map(|(id, quantity)| {
            let Some(product) = products.get(id) else {
                warn!(product = %id, "sold product has no catalog entry, leaving it out of the report");
                return None;
            };
            Some(ProductRow {
                name: product.name().to_string(),
                unit_price: product.unit_price(),
                quantity: *quantity,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    rows
}

/// Write the byte order mark followed by one `;` separated line per row.
///
/// Fields are written raw, never quoted, so a fallback key such as `CC;123`
/// reads back as `CC;123;10.00`.
pub fn write_rows<W: Write, R: Serialize>(mut writer: W, rows: &[R]) -> Result<(), csv::Error> {
    writer.write_all(BOM)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(FIELD_SEPARATOR as u8)
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_report<R: Serialize>(path: &Path, rows: &[R]) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    write_rows(BufWriter::new(file), rows).map_err(|e| PipelineError::csv(path, e))?;
    info!(file = %path.display(), rows = rows.len(), "report written");
    Ok(())
}

pub fn write_salesperson_report(
    path: &Path,
    totals: &SalesTotals,
    salespeople: &SalespersonCatalog,
) -> Result<(), PipelineError> {
    write_report(path, &salesperson_rows(totals, salespeople))
}

pub fn write_product_report(
    path: &Path,
    totals: &SalesTotals,
    products: &ProductCatalog,
) -> Result<(), PipelineError> {
    write_report(path, &product_rows(totals, products))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Product, ProductId, Salesperson, SalespersonKey};

    fn price(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn render<R: Serialize>(rows: &[R]) -> String {
        let mut out = Vec::new();
        write_rows(&mut out, rows).unwrap();
        assert!(out.starts_with(BOM), "report should start with a byte order mark");
        String::from_utf8(out[BOM.len()..].to_vec()).unwrap()
    }

    fn sample() -> (SalesTotals, ProductCatalog, SalespersonCatalog) {
        let keyboard = Product::new(ProductId::new("P0001"), "Keyboard", price("50000.00"));
        let mouse = Product::new(ProductId::new("P0002"), "Mouse", price("20"));
        let ana = Salesperson::new("CC", "111", "Ana", "Diaz");
        let juan = Salesperson::new("CE", "222", "Juan", "Lopez");

        let mut totals = SalesTotals::new();
        totals.accumulate(&ana.key(), keyboard.id(), 5, keyboard.unit_price()).unwrap();
        totals.accumulate(&juan.key(), mouse.id(), 7, mouse.unit_price()).unwrap();
        totals.accumulate(&SalespersonKey::new("TI", "999"), mouse.id(), 1, mouse.unit_price()).unwrap();

        (
            totals,
            ProductCatalog::from([(keyboard.id().clone(), keyboard), (mouse.id().clone(), mouse)]),
            SalespersonCatalog::from([(ana.key(), ana), (juan.key(), juan)]),
        )
    }

    #[test]
    fn salesperson_report_is_sorted_by_total() {
        let (totals, _, people) = sample();
        let text = render(&salesperson_rows(&totals, &people));
        assert_eq!("Ana Diaz;250000.00\nJuan Lopez;140.00\nTI;999;20.00\n", text);
    }

    #[test]
    /// Quotes in a name are written as they were read
    fn names_are_written_raw() {
        let monitor = Product::new(ProductId::new("P0003"), "\"Big\" Monitor", price("10"));
        let mut totals = SalesTotals::new();
        totals
            .accumulate(&SalespersonKey::new("CE", "999"), monitor.id(), 1, monitor.unit_price())
            .unwrap();
        let products = ProductCatalog::from([(monitor.id().clone(), monitor)]);

        assert_eq!(
            "CE;999;10.00\n",
            render(&salesperson_rows(&totals, &SalespersonCatalog::new()))
        );
        assert_eq!("\"Big\" Monitor;10.00;1\n", render(&product_rows(&totals, &products)));
    }

    #[test]
    fn product_report_is_sorted_by_quantity() {
        let (totals, products, _) = sample();
        let text = render(&product_rows(&totals, &products));
        assert_eq!("Mouse;20.00;8\nKeyboard;50000.00;5\n", text);
    }

    #[test]
    /// A product that disappeared from the catalog is left out, not reported blank
    fn product_without_catalog_entry_is_skipped() {
        let (totals, mut products, _) = sample();
        products.remove(&ProductId::new("P0002"));
        let rows = product_rows(&totals, &products);
        assert_eq!(1, rows.len());
        assert_eq!("Keyboard", rows[0].name);
    }

    #[test]
    /// Equal totals end up next to each other, their order is not part of the contract
    fn ties_are_grouped() {
        let mut totals = SalesTotals::new();
        let p = ProductId::new("P1");
        for (n, qty) in [("1", 2), ("2", 5), ("3", 2), ("4", 9)] {
            totals.accumulate(&SalespersonKey::new("CC", n), &p, qty, price("1.00")).unwrap();
        }
        let rows = salesperson_rows(&totals, &SalespersonCatalog::new());
        let values: Vec<String> = rows.iter().map(|r| r.total.to_string()).collect();
        assert_eq!(vec!["9.00", "5.00", "2.00", "2.00"], values);
    }

    #[test]
    fn empty_totals_write_only_the_bom() {
        let rows: Vec<SalespersonRow> = Vec::new();
        assert_eq!("", render(&rows));
    }

    #[test]
    fn reports_are_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let (totals, products, people) = sample();
        let sellers = dir.path().join("salesperson_report.csv");
        let items = dir.path().join("product_report.csv");

        write_salesperson_report(&sellers, &totals, &people).unwrap();
        write_product_report(&items, &totals, &products).unwrap();

        let sellers = std::fs::read(sellers).unwrap();
        assert!(sellers.starts_with(BOM));
        assert!(String::from_utf8_lossy(&sellers).contains("Ana Diaz;250000.00\n"));
        let items = std::fs::read_to_string(items).unwrap();
        assert!(items.ends_with("Keyboard;50000.00;5\n"));
    }
}
