//! Shopping cart and its conversion into an order.

use depot_api::FormErrors;
use depot_api::models::{
    OrderDraft, OrderLineDraft, PaymentMethod, Product, ProductId, WarehouseId,
};
use rust_decimal::Decimal;

/// Flat shipping fee added to every order.
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Product being bought
    pub product_id: ProductId,
    /// Name at the time it was added
    pub name: String,
    /// SKU at the time it was added
    pub sku: String,
    /// Unit price at the time it was added
    pub price: Decimal,
    /// Units, at least 1
    pub quantity: u32,
}

impl CartLine {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Who the order is for and where it goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    /// Customer name
    pub name: String,
    /// Customer email
    pub email: Option<String>,
    /// Customer phone
    pub phone: Option<String>,
    /// Delivery address
    pub shipping_address: String,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Lines keyed by product, plus the checkout choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    /// Fulfilling warehouse chosen at checkout
    pub warehouse_id: Option<WarehouseId>,
    /// Payment method chosen at checkout
    pub payment_method: PaymentMethod,
}

impl Cart {
    /// An empty cart paying cash.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// True when nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] when `quantity` is zero.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), FormErrors> {
        if quantity == 0 {
            return Err(FormErrors::single("quantity", "Quantity must be greater than 0"));
        }
        match self.lines.iter_mut().find(|line| line.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                sku: product.sku.clone(),
                price: product.price,
                quantity,
            }),
        }
        Ok(())
    }

    /// Set the quantity of a line, never below 1. Returns `false` if the
    /// product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        let Some(line) = self.line_mut(product_id) else {
            return false;
        };
        line.quantity = quantity.max(1);
        true
    }

    /// Step a line's quantity up or down, never below 1.
    pub fn adjust(&mut self, product_id: ProductId, delta: i64) -> bool {
        let Some(line) = self.line_mut(product_id) else {
            return false;
        };
        let next = (i64::from(line.quantity) + delta).clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        true
    }

    /// Drop a line. Returns `false` if the product is not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    /// Empty the cart, keeping the checkout choices.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal plus [`SHIPPING_FEE`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal() + SHIPPING_FEE
    }

    /// Build the order the checkout form submits.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] for an empty cart, a missing warehouse, or any
    /// field the order form rejects, in that order.
    pub fn to_order_draft(&self, customer: CustomerDetails) -> Result<OrderDraft, FormErrors> {
        if self.lines.is_empty() {
            return Err(FormErrors::single("items", "Please add at least one product"));
        }
        if self.warehouse_id.is_none() {
            return Err(FormErrors::single("warehouseId", "Please select a warehouse"));
        }

        let draft = OrderDraft {
            customer_name: customer.name,
            customer_email: customer.email,
            customer_phone: customer.phone,
            shipping_address: customer.shipping_address,
            warehouse_id: self.warehouse_id,
            payment_method: self.payment_method,
            notes: customer.notes,
            items: self
                .lines
                .iter()
                .map(|line| OrderLineDraft {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect(),
            total_amount: self.total(),
        };
        draft.check()?;
        Ok(draft)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product_id == product_id)
    }
}
