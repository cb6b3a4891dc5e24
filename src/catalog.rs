//! Loading of the product and salesperson reference files.

use std::{collections::HashMap, hash::Hash, path::Path};

use tracing::{debug, info, warn};

use crate::{
    error::{PipelineError, Rejection},
    input::{InputLine, InputLines, open_input},
    model::{Product, ProductId, Salesperson, SalespersonKey},
    money::Money,
};

pub type ProductCatalog = HashMap<ProductId, Product>;
pub type SalespersonCatalog = HashMap<SalespersonKey, Salesperson>;

/// A record type that can be read from a catalog file
pub trait CatalogRecord: Sized {
    type Key: Eq + Hash + std::fmt::Display;

    /// Used in log messages
    const KIND: &'static str;
    const REQUIRED_FIELDS: usize;

    /// Build the record, `fields` holds at least `REQUIRED_FIELDS` entries
    fn from_fields(fields: &[String]) -> Result<Self, Rejection>;

    fn catalog_key(&self) -> Self::Key;
}

impl CatalogRecord for Product {
    type Key = ProductId;
    const KIND: &'static str = "product";
    const REQUIRED_FIELDS: usize = 3;

    fn from_fields(fields: &[String]) -> Result<Self, Rejection> {
        let price: Money = fields[2].parse()?;
        Ok(Product::new(
            ProductId::new(fields[0].as_str()),
            fields[1].as_str(),
            price,
        ))
    }

    fn catalog_key(&self) -> ProductId {
        self.id().clone()
    }
}

impl CatalogRecord for Salesperson {
    type Key = SalespersonKey;
    const KIND: &'static str = "salesperson";
    const REQUIRED_FIELDS: usize = 4;

    fn from_fields(fields: &[String]) -> Result<Self, Rejection> {
        Ok(Salesperson::new(
            fields[0].as_str(),
            fields[1].as_str(),
            fields[2].as_str(),
            fields[3].as_str(),
        ))
    }

    fn catalog_key(&self) -> SalespersonKey {
        self.key()
    }
}

/// Parse one catalog line
fn parse_record<T: CatalogRecord>(fields: &[String]) -> Result<T, Rejection> {
    if fields.len() < T::REQUIRED_FIELDS {
        return Err(Rejection::TooFewFields {
            required: T::REQUIRED_FIELDS,
            found: fields.len(),
        });
    }
    T::from_fields(fields)
}

/// Load a catalog file into a lookup table.
///
/// Bad lines are logged and skipped, later lines replace earlier ones with the
/// same key. Only a file that can not be read is an error.
pub fn load_catalog<T: CatalogRecord>(path: &Path) -> Result<HashMap<T::Key, T>, PipelineError> {
    let reader = open_input(path)?;
    let file = path.display();

    let mut out = HashMap::new();
    let mut rejected = 0usize;
    for line in InputLines::new(reader) {
        let line = line.map_err(|e| PipelineError::csv(path, e))?;
        let number = line.number();
        let record = match line {
            InputLine::Record { fields, .. } => parse_record::<T>(&fields).map_err(|r| (r, fields.join(";"))),
            InputLine::Unreadable { rejection, .. } => Err((rejection, String::new())),
        };
        match record {
            Ok(record) => {
                let key = record.catalog_key();
                if out.insert(key, record).is_some() {
                    debug!(%file, line = number, kind = T::KIND, "duplicate id, keeping the later entry");
                }
            }
            Err((reason, text)) => {
                rejected += 1;
                warn!(%file, line = number, kind = T::KIND, %reason, %text, "skipping catalog line");
            }
        }
    }

    info!(%file, kind = T::KIND, loaded = out.len(), rejected, "catalog loaded");
    Ok(out)
}

pub fn load_products(path: &Path) -> Result<ProductCatalog, PipelineError> {
    load_catalog::<Product>(path)
}

pub fn load_salespeople(path: &Path) -> Result<SalespersonCatalog, PipelineError> {
    load_catalog::<Salesperson>(path)
}
