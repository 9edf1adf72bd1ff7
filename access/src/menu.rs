//! Per-role navigation menus.

use crate::role::Role;

/// Icon shown next to a menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    /// Dashboard tiles
    Dashboard,
    /// People
    People,
    /// Warehouse building
    Warehouse,
    /// Stacked boxes
    Inventory,
    /// Shopping cart
    ShoppingCart,
    /// Delivery truck
    LocalShipping,
    /// Chart
    Assessment,
    /// Gear
    Settings,
    /// Inbox with arrow
    MoveToInbox,
    /// Archive box
    Archive,
    /// Receipt
    Receipt,
}

/// One navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavEntry {
    /// Text shown in the menu
    pub label: &'static str,
    /// Icon shown next to the label
    pub icon: Icon,
    /// Route the entry navigates to
    pub path: &'static str,
}

const fn entry(label: &'static str, icon: Icon, path: &'static str) -> NavEntry {
    NavEntry { label, icon, path }
}

const ADMIN_MENU: &[NavEntry] = &[
    entry("Dashboard", Icon::Dashboard, "/admin/dashboard"),
    entry("Users", Icon::People, "/admin/users"),
    entry("Warehouses", Icon::Warehouse, "/admin/warehouses"),
    entry("Products", Icon::Inventory, "/admin/products"),
    entry("Orders", Icon::ShoppingCart, "/admin/orders"),
    entry("Shipments", Icon::LocalShipping, "/admin/shipments"),
    entry("Reports", Icon::Assessment, "/admin/reports"),
    entry("Settings", Icon::Settings, "/admin/settings"),
];

const MANAGER_MENU: &[NavEntry] = &[
    entry("Dashboard", Icon::Dashboard, "/manager/dashboard"),
    entry("Warehouses", Icon::Warehouse, "/manager/warehouses"),
    entry("Products", Icon::Inventory, "/manager/products"),
    entry("Orders", Icon::ShoppingCart, "/manager/orders"),
    entry("Shipments", Icon::LocalShipping, "/manager/shipments"),
    entry("Reports", Icon::Assessment, "/manager/reports"),
];

const WAREHOUSE_STAFF_MENU: &[NavEntry] = &[
    entry("Dashboard", Icon::Dashboard, "/warehouse/dashboard"),
    entry("Inventory", Icon::Inventory, "/warehouse/inventory"),
    entry("Receive Goods", Icon::MoveToInbox, "/warehouse/receive"),
    entry("Dispatch Goods", Icon::Archive, "/warehouse/dispatch"),
    entry("Stock Report", Icon::Assessment, "/warehouse/report"),
];

const DRIVER_MENU: &[NavEntry] = &[
    entry("My Deliveries", Icon::LocalShipping, "/driver/dashboard"),
    entry("Route Map", Icon::Assessment, "/driver/routes"),
    entry("Delivery History", Icon::Receipt, "/driver/history"),
];

/// Navigation entries for `role`, in display order.
///
/// Customers browse through the storefront and get no dashboard menu.
#[must_use]
pub const fn menu_for(role: Role) -> &'static [NavEntry] {
    match role {
        Role::Admin => ADMIN_MENU,
        Role::Manager => MANAGER_MENU,
        Role::WarehouseStaff => WAREHOUSE_STAFF_MENU,
        Role::Driver => DRIVER_MENU,
        Role::Customer => &[],
    }
}

/// Navigation entries for a possibly absent role; no role means no menu.
#[must_use]
pub const fn menu_for_session(role: Option<Role>) -> &'static [NavEntry] {
    match role {
        Some(role) => menu_for(role),
        None => &[],
    }
}

/// Navigation entries for a raw role string; unrecognized means no menu.
#[must_use]
pub fn menu_for_name(role: Option<&str>) -> &'static [NavEntry] {
    menu_for_session(Role::parse_lenient(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes() {
        assert_eq!(menu_for(Role::Admin).len(), 8);
        assert_eq!(menu_for(Role::Manager).len(), 6);
        assert_eq!(menu_for(Role::WarehouseStaff).len(), 5);
        assert_eq!(menu_for(Role::Driver).len(), 3);
        assert!(menu_for(Role::Customer).is_empty());
    }

    #[test]
    fn entries_keep_display_order() {
        let labels: Vec<_> = menu_for(Role::Driver).iter().map(|e| e.label).collect();
        assert_eq!(labels, ["My Deliveries", "Route Map", "Delivery History"]);
        assert_eq!(menu_for(Role::WarehouseStaff)[2].path, "/warehouse/receive");
    }

    #[test]
    fn every_entry_stays_in_its_section() {
        for role in Role::ALL {
            let section = role.landing_route().trim_end_matches("dashboard");
            for entry in menu_for(role) {
                assert!(entry.path.starts_with(section), "{} outside {section}", entry.path);
            }
        }
    }

    #[test]
    fn unknown_or_absent_role_has_no_menu() {
        assert!(menu_for_session(None).is_empty());
        assert!(menu_for_name(Some("SUPERVISOR")).is_empty());
        assert!(menu_for_name(None).is_empty());
        assert_eq!(menu_for_name(Some("MANAGER")).len(), 6);
    }
}
