use super::ProductId;
use crate::validation::non_negative;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    /// Electronics
    Electronics,
    /// Clothing
    Clothing,
    /// Food
    Food,
    /// Furniture
    Furniture,
    /// Toys
    Toys,
    /// Books
    Books,
    /// Anything else
    #[default]
    Other,
}

wire_enum!(ProductCategory, "product category", {
    Electronics => "ELECTRONICS",
    Clothing => "CLOTHING",
    Food => "FOOD",
    Furniture => "FURNITURE",
    Toys => "TOYS",
    Books => "BOOKS",
    Other => "OTHER",
});

/// Product lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Sellable
    #[default]
    Active,
    /// Hidden from the storefront
    Inactive,
    /// Listed, nothing in stock
    OutOfStock,
    /// No longer sold
    Discontinued,
}

wire_enum!(ProductStatus, "product status", {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    OutOfStock => "OUT_OF_STOCK",
    Discontinued => "DISCONTINUED",
});

/// Unit of measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    /// Pieces
    #[default]
    Pcs,
    /// Kilograms
    Kg,
    /// Litres
    L,
    /// Metres
    M,
    /// Boxes
    Box,
    /// Cartons
    Carton,
}

wire_enum!(Unit, "unit", {
    Pcs => "PCS",
    Kg => "KG",
    L => "L",
    M => "M",
    Box => "BOX",
    Carton => "CARTON",
});

/// A product as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned id
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Stock keeping unit; unique and fixed after creation
    pub sku: String,
    /// Free-form description
    pub description: Option<String>,
    /// Category
    #[serde(default)]
    pub category: ProductCategory,
    /// Brand
    pub brand: Option<String>,
    /// Selling price
    pub price: Decimal,
    /// Purchase price
    pub cost_price: Option<Decimal>,
    /// Units on hand across warehouses
    #[serde(default, alias = "totalStock")]
    pub stock_quantity: u32,
    /// Stock level that triggers a reorder
    pub reorder_level: Option<u32>,
    /// Unit of measure
    #[serde(default)]
    pub unit: Unit,
    /// Weight in kilograms
    pub weight: Option<f64>,
    /// Free-form dimensions (e.g. `30x20x10 cm`)
    pub dimensions: Option<String>,
    /// Barcode
    pub barcode: Option<String>,
    /// Image location
    pub image_url: Option<String>,
    /// Lifecycle status
    #[serde(default)]
    pub status: ProductStatus,
    /// Supplier display name
    pub supplier_name: Option<String>,
    /// Creation timestamp
    pub created_at: Option<NaiveDateTime>,
}

impl Product {
    /// The writable fields of this product, as an edit form starts out.
    #[must_use]
    pub fn draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            sku: self.sku.clone(),
            description: self.description.clone(),
            category: self.category,
            brand: self.brand.clone(),
            price: self.price,
            cost_price: self.cost_price,
            stock_quantity: self.stock_quantity,
            reorder_level: self.reorder_level,
            unit: self.unit,
            weight: self.weight,
            dimensions: self.dimensions.clone(),
            barcode: self.barcode.clone(),
            image_url: self.image_url.clone(),
            status: self.status,
        }
    }

    /// True when stock is at or below the reorder level.
    #[must_use]
    pub fn needs_reorder(&self) -> bool {
        self.reorder_level
            .is_some_and(|level| self.stock_quantity <= level)
    }
}

/// Writable product fields submitted on create and update.
///
/// A new form starts in category `OTHER`, unit `PCS`, status `ACTIVE`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Display name
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    /// Stock keeping unit
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    /// Free-form description
    pub description: Option<String>,
    /// Category
    pub category: ProductCategory,
    /// Brand
    pub brand: Option<String>,
    /// Selling price
    #[validate(custom = "non_negative")]
    pub price: Decimal,
    /// Purchase price
    #[validate(custom = "non_negative")]
    pub cost_price: Option<Decimal>,
    /// Units on hand
    pub stock_quantity: u32,
    /// Reorder threshold
    pub reorder_level: Option<u32>,
    /// Unit of measure
    pub unit: Unit,
    /// Weight in kilograms
    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight: Option<f64>,
    /// Free-form dimensions
    pub dimensions: Option<String>,
    /// Barcode
    pub barcode: Option<String>,
    /// Image location
    #[validate(url(message = "Image URL is not a valid URL"))]
    pub image_url: Option<String>,
    /// Lifecycle status
    pub status: ProductStatus,
}

impl ProductDraft {
    /// Start a draft with the required fields filled in.
    #[must_use]
    pub fn new(name: impl Into<String>, sku: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            price,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::validation::check;
    use rust_decimal_macros::dec;

    #[test]
    fn new_draft_uses_form_defaults() {
        let draft = ProductDraft::new("Mouse", "MS-01", dec!(150000));
        assert_eq!(draft.category, ProductCategory::Other);
        assert_eq!(draft.unit, Unit::Pcs);
        assert_eq!(draft.status, ProductStatus::Active);
        assert!(check(&draft).is_ok());
    }

    #[test]
    fn draft_requires_name_and_sku() {
        let draft = ProductDraft::new("", "", dec!(-1));
        let errors = check(&draft).unwrap_err();

        assert_eq!(errors.message_for("name"), Some("Product name is required"));
        assert_eq!(errors.message_for("sku"), Some("SKU is required"));
        assert!(errors.message_for("price").is_some());
    }

    #[test]
    fn decodes_backend_product() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Laptop",
                "sku": "LP-15",
                "category": "ELECTRONICS",
                "price": 15990000,
                "costPrice": 12000000.5,
                "unit": "PCS",
                "weight": 1.8,
                "status": "ACTIVE",
                "supplierName": "Acme",
                "totalStock": 12,
                "createdAt": "2024-03-01T09:30:00"
            }"#,
        )
        .unwrap();

        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.price, dec!(15990000));
        assert_eq!(product.cost_price, Some(dec!(12000000.5)));
        assert_eq!(product.stock_quantity, 12);
        assert_eq!(product.category, ProductCategory::Electronics);
        assert!(product.created_at.is_some());
    }

    #[test]
    fn draft_copies_writable_fields() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"name":"Desk","sku":"DK-1","price":2500000,"stockQuantity":4,"reorderLevel":5,"unit":"BOX"}"#,
        )
        .unwrap();
        let draft = product.draft();

        assert_eq!(draft.name, "Desk");
        assert_eq!(draft.unit, Unit::Box);
        assert_eq!(draft.category, ProductCategory::Other);
        assert!(product.needs_reorder());
    }
}
