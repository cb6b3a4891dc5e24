use std::collections::BTreeMap;

use crate::{
    error::Rejection,
    model::{Product, ProductId, SaleLine, SalespersonKey},
    money::Money,
};

/// Running totals of one processing pass.
///
/// Both maps only ever grow; the report writer consumes them at the end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SalesTotals {
    /// money collected per salesperson
    money: BTreeMap<SalespersonKey, Money>,
    /// units sold per product
    units: BTreeMap<ProductId, u64>,
}

impl SalesTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sale: `unit_price * quantity` (rounded to cents) goes to the
    /// salesperson and `quantity` goes to the product.
    ///
    /// When the amount does not fit, nothing is recorded and the sale is rejected.
    pub fn accumulate(
        &mut self,
        seller: &SalespersonKey,
        product: &ProductId,
        quantity: u32,
        unit_price: Money,
    ) -> Result<(), Rejection> {
        let overflow = || Rejection::AmountOverflow {
            unit_price: unit_price.to_string(),
            quantity,
        };
        let current_money = self.money.get(seller).copied().unwrap_or_default();
        let money = unit_price
            .times(quantity)
            .and_then(|subtotal| current_money.checked_add(subtotal))
            .ok_or_else(overflow)?;
        let current_units = self.units.get(product).copied().unwrap_or_default();
        let units = current_units
            .checked_add(u64::from(quantity))
            .ok_or_else(overflow)?;

        self.money.insert(seller.clone(), money);
        self.units.insert(product.clone(), units);
        Ok(())
    }

    /// Accumulate an accepted line, priced with its catalog entry
    pub fn add_line(&mut self, line: &SaleLine, product: &Product) -> Result<(), Rejection> {
        debug_assert_eq!(&line.product, product.id());
        self.accumulate(&line.seller, &line.product, line.quantity, product.unit_price())
    }

    pub fn money_by_salesperson(&self) -> &BTreeMap<SalespersonKey, Money> {
        &self.money
    }

    pub fn units_by_product(&self) -> &BTreeMap<ProductId, u64> {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.money.is_empty() && self.units.is_empty()
    }
}
