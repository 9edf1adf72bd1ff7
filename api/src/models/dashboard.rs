use serde::{Deserialize, Serialize};

/// Headline counters for the dashboard. Missing keys read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    /// Orders ever placed
    pub total_orders: u64,
    /// Orders awaiting confirmation
    pub pending_orders: u64,
    /// Inventory rows at or below their reorder level
    pub low_stock_items: u64,
    /// Shipments not yet finished
    pub active_shipments: u64,
    /// Products in the catalogue
    pub total_products: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_counters_default_to_zero() {
        let stats: DashboardStats =
            serde_json::from_str(r#"{"totalOrders":12,"activeShipments":3}"#).unwrap();
        assert_eq!(stats.total_orders, 12);
        assert_eq!(stats.active_shipments, 3);
        assert_eq!(stats.pending_orders, 0);
        assert_eq!(stats.total_products, 0);
    }
}
