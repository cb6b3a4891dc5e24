use std::fmt;

use crate::{FIELD_SEPARATOR, money::Money};

/// Product identifier, e.g. `P0001`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry of the product catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    unit_price: Money,
}

impl Product {
    /// The price is a [`Money`], so it is already rounded to cents and not negative
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
}

/// Identity of a salesperson: document type and number joined by the field separator.
///
/// This is also the header line of each sales file, so the key read from a sales
/// file and the key built from the salesperson catalog compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SalespersonKey(String);

impl SalespersonKey {
    pub fn new(document_type: &str, document_number: &str) -> Self {
        Self(format!(
            "{}{}{}",
            document_type.trim(),
            FIELD_SEPARATOR,
            document_number.trim()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SalespersonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salesperson {
    document_type: String,
    document_number: String,
    first_names: String,
    last_names: String,
}

impl Salesperson {
    pub fn new(
        document_type: impl Into<String>,
        document_number: impl Into<String>,
        first_names: impl Into<String>,
        last_names: impl Into<String>,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            document_number: document_number.into(),
            first_names: first_names.into(),
            last_names: last_names.into(),
        }
    }

    pub fn key(&self) -> SalespersonKey {
        SalespersonKey::new(&self.document_type, &self.document_number)
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn document_number(&self) -> &str {
        &self.document_number
    }

    /// Name used in the salesperson report
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_names)
    }
}

/// One accepted line of a sales file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
    pub seller: SalespersonKey,
    pub product: ProductId,
    /// always at least one
    pub quantity: u32,
}
