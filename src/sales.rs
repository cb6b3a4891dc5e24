//! Parsing and validation of a single sales file.
//!
//! The first line names the salesperson (`DocType;DocNumber`), every other line is
//! a sale (`ProductID;Quantity;`). Bad lines are logged and dropped, the rest of the
//! file is still used.

use std::io::Read;

use tracing::{debug, warn};

use crate::{
    catalog::{ProductCatalog, SalespersonCatalog},
    error::{PipelineError, Rejection},
    input::{InputLine, input_lines},
    model::{ProductId, SaleLine, SalespersonKey},
};

/// The accepted content of one sales file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesFile {
    pub seller: SalespersonKey,
    pub lines: Vec<SaleLine>,
    /// number of body lines that were dropped
    pub rejected: usize,
}

/// Read the salesperson key from the header fields
pub fn parse_header(fields: &[String]) -> Result<SalespersonKey, Rejection> {
    match fields {
        [document_type, document_number, ..] => {
            Ok(SalespersonKey::new(document_type, document_number))
        }
        _ => Err(Rejection::InvalidHeader(fields.join(";"))),
    }
}

/// Validate one body line against the product catalog
pub fn parse_sale(
    seller: &SalespersonKey,
    fields: &[String],
    products: &ProductCatalog,
) -> Result<SaleLine, Rejection> {
    let [product, quantity, ..] = fields else {
        return Err(Rejection::TooFewFields {
            required: 2,
            found: fields.len(),
        });
    };

    let product = ProductId::new(product.as_str());
    if !products.contains_key(&product) {
        return Err(Rejection::UnknownProduct(product.to_string()));
    }

    let quantity: i32 = quantity
        .parse()
        .map_err(|_| Rejection::InvalidQuantity(quantity.clone()))?;
    if quantity <= 0 {
        return Err(Rejection::NonPositiveQuantity(quantity));
    }

    Ok(SaleLine {
        seller: seller.clone(),
        product,
        quantity: quantity.unsigned_abs(),
    })
}

/// Parse a whole sales file.
///
/// The header is the first physical line. Returns `Ok(None)` when the file has
/// to be skipped as a whole (empty, or a first line that does not name a
/// salesperson). Only an I/O error while reading is
/// an `Err`.
pub fn parse_sales_file<R: Read>(
    source_name: &str,
    source: R,
    products: &ProductCatalog,
    salespeople: &SalespersonCatalog,
) -> Result<Option<SalesFile>, PipelineError> {
    let mut lines = input_lines(source);

    let header = match lines.next() {
        None => {
            warn!(file = source_name, reason = %Rejection::EmptyFile, "skipping sales file");
            return Ok(None);
        }
        Some(line) => line.map_err(|e| PipelineError::csv(source_name, e))?,
    };
    let seller = match header {
        InputLine::Record { number: 1, fields } => parse_header(&fields),
        // the first line was blank, so the file has no header
        InputLine::Record { .. } => Err(Rejection::InvalidHeader(String::new())),
        InputLine::Unreadable { rejection, .. } => Err(rejection),
    };
    let seller = match seller {
        Ok(seller) => seller,
        Err(reason) => {
            warn!(file = source_name, %reason, "skipping sales file");
            return Ok(None);
        }
    };

    if !salespeople.contains_key(&seller) {
        // the money is still booked under this key
        warn!(file = source_name, %seller, "salesperson not found in catalog");
    }

    let mut out = SalesFile {
        seller,
        lines: Vec::new(),
        rejected: 0,
    };
    for line in lines {
        let line = line.map_err(|e| PipelineError::csv(source_name, e))?;
        let number = line.number();
        let (sale, text) = match line {
            InputLine::Record { fields, .. } => {
                (parse_sale(&out.seller, &fields, products), fields.join(";"))
            }
            InputLine::Unreadable { rejection, .. } => (Err(rejection), String::new()),
        };
        match sale {
            Ok(sale) => out.lines.push(sale),
            Err(reason) => {
                out.rejected += 1;
                warn!(file = source_name, line = number, %reason, %text, "skipping sale");
            }
        }
    }

    debug!(
        file = source_name,
        seller = %out.seller,
        accepted = out.lines.len(),
        rejected = out.rejected,
        "sales file parsed"
    );
    Ok(Some(out))
}
