//! Plain-text rendering of container state.
//!
//! Every function returns the text instead of printing it so the shell can
//! decide where it goes.

use depot_access::{NavEntry, UserProfile};
use depot_api::format_vnd;
use depot_api::models::{DashboardStats, Order, Product, Shipment, Warehouse};
use depot_state::{Entity, LoadStatus, Notice, NoticeLevel, ResourceState, Slot};
use std::fmt::Write;

/// Menu entries, one per line.
#[must_use]
pub fn menu(entries: &[NavEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "  {:<18} {}", entry.label, entry.path);
    }
    out
}

/// Notices prefixed by their level.
#[must_use]
pub fn notices(notices: &[Notice]) -> String {
    let mut out = String::new();
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        let _ = writeln!(out, "[{tag}] {}", notice.message);
    }
    out
}

/// Status line for a list: loading, the error, or the page position.
fn list_status<T: Entity>(resource: &ResourceState<T>) -> Option<String> {
    match resource.status() {
        LoadStatus::Idle => Some("Not loaded".to_string()),
        LoadStatus::Loading => Some("Loading...".to_string()),
        LoadStatus::Error => Some(
            resource
                .error()
                .map_or_else(|| "Failed to load".to_string(), |e| e.user_message()),
        ),
        LoadStatus::Ready if resource.items().is_empty() => Some("No records".to_string()),
        LoadStatus::Ready => None,
    }
}

fn footer<T: Entity>(out: &mut String, resource: &ResourceState<T>) {
    let _ = writeln!(
        out,
        "Page {} of {} ({} total)",
        resource.current_page() + 1,
        resource.total_pages().max(1),
        resource.total_items()
    );
}

/// Product table with price in dong and stock.
#[must_use]
pub fn products(resource: &ResourceState<Product>) -> String {
    if let Some(status) = list_status(resource) {
        return format!("{status}\n");
    }

    let mut out = format!(
        "{:>5}  {:<28} {:<12} {:>16} {:>7}  {}\n",
        "ID", "Name", "SKU", "Price", "Stock", "Status"
    );
    for product in resource.items() {
        let reorder = if product.needs_reorder() { " (reorder)" } else { "" };
        let _ = writeln!(
            out,
            "{:>5}  {:<28} {:<12} {:>16} {:>7}  {}{reorder}",
            product.id,
            truncate(&product.name, 28),
            product.sku,
            format_vnd(product.price),
            product.stock_quantity,
            product.status
        );
    }
    footer(&mut out, resource);
    out
}

/// Order table.
#[must_use]
pub fn orders(resource: &ResourceState<Order>) -> String {
    if let Some(status) = list_status(resource) {
        return format!("{status}\n");
    }

    let mut out = format!(
        "{:>5}  {:<16} {:<22} {:<11} {:>16}\n",
        "ID", "Number", "Customer", "Status", "Total"
    );
    for order in resource.items() {
        let _ = writeln!(
            out,
            "{:>5}  {:<16} {:<22} {:<11} {:>16}",
            order.id,
            order.order_number,
            truncate(order.customer_name.as_deref().unwrap_or("-"), 22),
            order.status,
            format_vnd(order.total_amount)
        );
    }
    footer(&mut out, resource);
    out
}

/// Warehouse table with capacity usage.
#[must_use]
pub fn warehouses(resource: &ResourceState<Warehouse>) -> String {
    if let Some(status) = list_status(resource) {
        return format!("{status}\n");
    }

    let mut out = format!(
        "{:>5}  {:<24} {:<14} {:>15}  {}\n",
        "ID", "Name", "City", "Usage", "Status"
    );
    for warehouse in resource.items() {
        let usage = format!(
            "{}/{} ({:.0}%)",
            warehouse.current_usage,
            warehouse.capacity,
            warehouse.usage()
        );
        let _ = writeln!(
            out,
            "{:>5}  {:<24} {:<14} {:>15}  {}",
            warehouse.id,
            truncate(&warehouse.name, 24),
            warehouse.city.as_deref().unwrap_or("-"),
            usage,
            warehouse.status
        );
    }
    footer(&mut out, resource);
    out
}

/// Active shipments.
#[must_use]
pub fn shipments(resource: &ResourceState<Shipment>) -> String {
    if let Some(status) = list_status(resource) {
        return format!("{status}\n");
    }

    let mut out = format!(
        "{:>5}  {:<16} {:<18} {:<20}\n",
        "ID", "Tracking", "Status", "Driver"
    );
    for shipment in resource.items() {
        let delayed = if shipment.is_delayed { " (delayed)" } else { "" };
        let _ = writeln!(
            out,
            "{:>5}  {:<16} {:<18} {:<20}{delayed}",
            shipment.id,
            shipment.tracking_number,
            shipment.status,
            shipment.driver_name.as_deref().unwrap_or("-")
        );
    }
    out
}

/// One tracked shipment in detail.
#[must_use]
pub fn tracked(slot: &Slot<Shipment>) -> String {
    let Some(shipment) = slot.value() else {
        return match slot.status() {
            LoadStatus::Loading => "Looking up shipment...\n".to_string(),
            _ => "No shipment to show\n".to_string(),
        };
    };

    let mut out = String::new();
    let _ = writeln!(out, "Tracking number: {}", shipment.tracking_number);
    if let Some(order) = &shipment.order_number {
        let _ = writeln!(out, "Order:           {order}");
    }
    let _ = writeln!(out, "Status:          {}", shipment.status);
    if let Some(driver) = &shipment.driver_name {
        let _ = writeln!(out, "Driver:          {driver}");
    }
    if let Some(progress) = shipment.progress() {
        let _ = writeln!(out, "Progress:        {progress:.0}%");
    }
    if let Some(eta) = shipment.estimated_delivery_time {
        let _ = writeln!(out, "Estimated:       {}", eta.format("%d/%m/%Y %H:%M"));
    }
    if shipment.is_delayed {
        let minutes = shipment.delay_minutes.unwrap_or(0);
        let _ = writeln!(out, "Delayed by {minutes} min");
    }
    out
}

/// Dashboard counters.
#[must_use]
pub fn stats(slot: &Slot<DashboardStats>) -> String {
    let Some(stats) = slot.value() else {
        return slot
            .error()
            .map_or_else(|| "Statistics unavailable\n".to_string(), |e| {
                format!("{}\n", e.user_message())
            });
    };

    format!(
        "Orders:           {}\nPending orders:   {}\nProducts:         {}\nLow stock items:  {}\nActive shipments: {}\n",
        stats.total_orders,
        stats.pending_orders,
        stats.total_products,
        stats.low_stock_items,
        stats.active_shipments
    )
}

/// Best sellers, ranked.
#[must_use]
pub fn top_products(slot: &Slot<Vec<Product>>) -> String {
    let Some(products) = slot.value() else {
        return String::new();
    };

    let mut out = String::from("Top products:\n");
    for (rank, product) in products.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<28} {:>16}",
            rank + 1,
            truncate(&product.name, 28),
            format_vnd(product.price)
        );
    }
    out
}

/// Latest orders, one line each.
#[must_use]
pub fn recent_orders(slot: &Slot<Vec<Order>>) -> String {
    let Some(orders) = slot.value() else {
        return String::new();
    };

    let mut out = String::from("Recent orders:\n");
    for order in orders {
        let _ = writeln!(
            out,
            "  {:<16} {:<11} {:>16}",
            order.order_number,
            order.status,
            format_vnd(order.total_amount)
        );
    }
    out
}

/// Profile card.
#[must_use]
pub fn profile(user: &UserProfile) -> String {
    let role = user.role.map_or("unknown", |role| role.label());
    let mut out = format!("{} ({})\nRole: {role}\n", user.display_name(), user.username);
    if let Some(email) = &user.email {
        let _ = writeln!(out, "Email: {email}");
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use depot_access::{Role, menu_for};
    use depot_api::PageResult;
    use depot_api::models::ProductDraft;
    use depot_testing::InMemoryBackend;
    use depot_testing::fixtures::stocked_product;
    use rust_decimal_macros::dec;

    fn loaded(products: Vec<Product>) -> ResourceState<Product> {
        let mut resource = ResourceState::new();
        let token = resource.begin_page_fetch(10);
        resource.complete(token, Ok(PageResult::single(products)));
        resource
    }

    #[test]
    fn product_rows_show_dong_prices() {
        let backend = InMemoryBackend::new();
        let product = backend.seed_product(ProductDraft {
            stock_quantity: 3,
            ..ProductDraft::new("Keyboard", "KB-1", dec!(1250000))
        });

        let text = products(&loaded(vec![product]));
        assert!(text.contains("Keyboard"));
        assert!(text.contains("1.250.000 ₫"));
        assert!(text.contains("Page 1 of 1 (1 total)"));
    }

    #[test]
    fn list_status_replaces_the_table() {
        let mut resource = ResourceState::<Product>::new();
        assert_eq!(products(&resource), "Not loaded\n");
        resource.begin_fetch();
        assert_eq!(products(&resource), "Loading...\n");
        assert_eq!(products(&loaded(Vec::new())), "No records\n");
    }

    #[test]
    fn long_names_are_cut() {
        let backend = InMemoryBackend::new();
        let product = backend.seed_product(stocked_product(
            "An extremely long product name that will not fit",
            "LONG-1",
            1,
        ));
        let text = products(&loaded(vec![product]));
        assert!(text.contains('…'));
    }

    #[test]
    fn menu_lists_paths() {
        let text = menu(menu_for(Role::Driver));
        assert!(text.contains("/driver/dashboard"));
        assert!(!text.contains("/admin"));
    }

    #[test]
    fn profile_falls_back_to_username() {
        let user = UserProfile::new(1, "mai", Role::Manager);
        let text = profile(&user);
        assert!(text.starts_with("mai (mai)"));
        assert!(text.contains("Role: MANAGER"));
    }
}
