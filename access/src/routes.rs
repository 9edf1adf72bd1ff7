//! Route table: path to page, redirect, or denial.

use crate::gate::{AccessDenied, GateDecision, LOGIN_PATH, authorize};
use crate::role::Role;
use crate::session::Session;

/// A screen the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Storefront landing
    Home,
    /// Product catalogue
    Shop,
    /// Shipment tracking by number
    TrackOrder,
    /// The signed-in user's orders
    MyOrders,
    /// Shopping cart
    Cart,
    /// Profile of the signed-in user
    Profile,
    /// Sign-in form
    Login,
    /// Sign-up form
    Register,
    /// Admin overview
    AdminDashboard,
    /// Manager overview
    ManagerDashboard,
    /// Warehouse staff overview
    WarehouseDashboard,
    /// Driver's deliveries
    DriverDashboard,
    /// User administration
    Users,
    /// Warehouse list
    Warehouses,
    /// Product list
    Products,
    /// Order list
    Orders,
    /// Shipment list
    Shipments,
    /// Reports
    Reports,
    /// System settings
    Settings,
    /// Stock on hand
    Inventory,
    /// Inbound goods
    ReceiveGoods,
    /// Outbound goods
    DispatchGoods,
    /// Driver route map
    DriverRoutes,
    /// Completed deliveries
    DeliveryHistory,
}

impl Page {
    /// Heading shown above the page.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Shop => "Shop",
            Self::TrackOrder => "Track Order",
            Self::MyOrders => "My Orders",
            Self::Cart => "Cart",
            Self::Profile => "Profile",
            Self::Login => "Sign In",
            Self::Register => "Register",
            Self::AdminDashboard
            | Self::ManagerDashboard
            | Self::WarehouseDashboard => "Dashboard",
            Self::DriverDashboard => "My Deliveries",
            Self::Users => "Users",
            Self::Warehouses => "Warehouses",
            Self::Products => "Products",
            Self::Orders => "Orders",
            Self::Shipments => "Shipments",
            Self::Reports => "Reports",
            Self::Settings => "Settings",
            Self::Inventory => "Inventory",
            Self::ReceiveGoods => "Receive Goods",
            Self::DispatchGoods => "Dispatch Goods",
            Self::DriverRoutes => "Route Map",
            Self::DeliveryHistory => "Delivery History",
        }
    }
}

/// Result of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Render this page
    Show(Page),
    /// Go elsewhere
    Redirect(&'static str),
    /// Signed in but not allowed
    Denied(AccessDenied),
}

impl Navigation {
    /// The page to render, if any.
    #[must_use]
    pub const fn page(&self) -> Option<Page> {
        match self {
            Self::Show(page) => Some(*page),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Access {
    Public,
    /// Signed-in users are bounced to their landing route.
    GuestOnly,
    /// Runs the gate; an empty list admits any signed-in user.
    Guarded(&'static [Role]),
}

struct Route {
    path: &'static str,
    page: Page,
    access: Access,
}

const fn route(path: &'static str, page: Page, access: Access) -> Route {
    Route { path, page, access }
}

/// A dashboard section whose bare path redirects to its dashboard.
struct Section {
    path: &'static str,
    allowed: &'static [Role],
    index: &'static str,
}

const ADMIN: &[Role] = &[Role::Admin];
const MANAGER: &[Role] = &[Role::Manager];
const STAFF: &[Role] = &[Role::WarehouseStaff];
const DRIVER: &[Role] = &[Role::Driver];

const SECTIONS: &[Section] = &[
    Section { path: "/admin", allowed: ADMIN, index: "/admin/dashboard" },
    Section { path: "/manager", allowed: MANAGER, index: "/manager/dashboard" },
    Section { path: "/warehouse", allowed: STAFF, index: "/warehouse/dashboard" },
    Section { path: "/driver", allowed: DRIVER, index: "/driver/dashboard" },
];

const ROUTES: &[Route] = &[
    route(LOGIN_PATH, Page::Login, Access::GuestOnly),
    route("/register", Page::Register, Access::GuestOnly),
    route("/", Page::Home, Access::Public),
    route("/shop", Page::Shop, Access::Public),
    route("/track", Page::TrackOrder, Access::Public),
    route("/my-orders", Page::MyOrders, Access::Guarded(&[Role::Customer, Role::Driver])),
    route("/cart", Page::Cart, Access::Guarded(&[Role::Customer])),
    route("/profile", Page::Profile, Access::Guarded(&[])),
    route("/admin/dashboard", Page::AdminDashboard, Access::Guarded(ADMIN)),
    route("/admin/users", Page::Users, Access::Guarded(ADMIN)),
    route("/admin/warehouses", Page::Warehouses, Access::Guarded(ADMIN)),
    route("/admin/products", Page::Products, Access::Guarded(ADMIN)),
    route("/admin/orders", Page::Orders, Access::Guarded(ADMIN)),
    route("/admin/shipments", Page::Shipments, Access::Guarded(ADMIN)),
    route("/admin/reports", Page::Reports, Access::Guarded(ADMIN)),
    route("/admin/settings", Page::Settings, Access::Guarded(ADMIN)),
    route("/manager/dashboard", Page::ManagerDashboard, Access::Guarded(MANAGER)),
    route("/manager/warehouses", Page::Warehouses, Access::Guarded(MANAGER)),
    route("/manager/products", Page::Products, Access::Guarded(MANAGER)),
    route("/manager/orders", Page::Orders, Access::Guarded(MANAGER)),
    route("/manager/shipments", Page::Shipments, Access::Guarded(MANAGER)),
    route("/manager/reports", Page::Reports, Access::Guarded(MANAGER)),
    route("/warehouse/dashboard", Page::WarehouseDashboard, Access::Guarded(STAFF)),
    route("/warehouse/inventory", Page::Inventory, Access::Guarded(STAFF)),
    route("/warehouse/receive", Page::ReceiveGoods, Access::Guarded(STAFF)),
    route("/warehouse/dispatch", Page::DispatchGoods, Access::Guarded(STAFF)),
    route("/warehouse/report", Page::Reports, Access::Guarded(STAFF)),
    route("/driver/dashboard", Page::DriverDashboard, Access::Guarded(DRIVER)),
    route("/driver/routes", Page::DriverRoutes, Access::Guarded(DRIVER)),
    route("/driver/history", Page::DeliveryHistory, Access::Guarded(DRIVER)),
];

/// Where `session` lands after sign-in or on an unknown path.
///
/// No user goes to the login page; a user whose role is not recognized
/// goes to the storefront.
#[must_use]
pub fn landing_route(session: &Session) -> &'static str {
    match session.user() {
        None => LOGIN_PATH,
        Some(user) => user.role.map_or("/", Role::landing_route),
    }
}

/// Resolve `path` for `session`.
///
/// Query strings and trailing slashes are ignored. Unknown paths redirect to
/// the session's landing route.
#[must_use]
pub fn resolve(path: &str, session: &Session) -> Navigation {
    let path = normalize(path);

    if let Some(section) = SECTIONS.iter().find(|section| section.path == path) {
        return match gate(session, section.allowed) {
            GateDecision::Render => Navigation::Redirect(section.index),
            decision => refused(decision),
        };
    }

    let Some(route) = ROUTES.iter().find(|route| route.path == path) else {
        tracing::debug!(path, "no route, redirecting to landing route");
        return Navigation::Redirect(landing_route(session));
    };

    match route.access {
        Access::Public => Navigation::Show(route.page),
        Access::GuestOnly if session.is_authenticated() => {
            Navigation::Redirect(landing_route(session))
        }
        Access::GuestOnly => Navigation::Show(route.page),
        Access::Guarded(allowed) => match gate(session, allowed) {
            GateDecision::Render => Navigation::Show(route.page),
            decision => refused(decision),
        },
    }
}

fn gate(session: &Session, allowed: &[Role]) -> GateDecision {
    authorize(session.is_authenticated(), session.role(), allowed)
}

fn refused(decision: GateDecision) -> Navigation {
    match decision {
        GateDecision::AccessDenied(denied) => Navigation::Denied(denied),
        GateDecision::RedirectToLogin { path } => Navigation::Redirect(path),
        GateDecision::Render => Navigation::Redirect(LOGIN_PATH),
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserProfile;

    fn signed_in(role: Role) -> Session {
        Session::signed_in("token", UserProfile::new(7, "user", role))
    }

    #[test]
    fn public_pages_need_no_session() {
        let guest = Session::anonymous();
        assert_eq!(resolve("/", &guest), Navigation::Show(Page::Home));
        assert_eq!(resolve("/shop", &guest), Navigation::Show(Page::Shop));
        assert_eq!(resolve("/track?code=TRK-1", &guest), Navigation::Show(Page::TrackOrder));
    }

    #[test]
    fn guarded_page_sends_guest_to_login() {
        let guest = Session::anonymous();
        assert_eq!(resolve("/cart", &guest), Navigation::Redirect("/login"));
        assert_eq!(resolve("/admin/users", &guest), Navigation::Redirect("/login"));
        assert_eq!(resolve("/admin", &guest), Navigation::Redirect("/login"));
    }

    #[test]
    fn my_orders_admits_customers_and_drivers() {
        assert_eq!(
            resolve("/my-orders", &signed_in(Role::Customer)),
            Navigation::Show(Page::MyOrders)
        );
        assert_eq!(
            resolve("/my-orders", &signed_in(Role::Driver)),
            Navigation::Show(Page::MyOrders)
        );
        assert!(matches!(
            resolve("/my-orders", &signed_in(Role::Manager)),
            Navigation::Denied(_)
        ));
    }

    #[test]
    fn profile_admits_any_signed_in_user() {
        for role in Role::ALL {
            assert_eq!(resolve("/profile", &signed_in(role)), Navigation::Show(Page::Profile));
        }
    }

    #[test]
    fn wrong_section_is_denied_with_roles_named() {
        let nav = resolve("/admin/settings", &signed_in(Role::Driver));
        let Navigation::Denied(denied) = nav else {
            unreachable!("drivers cannot open admin settings");
        };
        assert_eq!(denied.required, vec![Role::Admin]);
        assert_eq!(denied.actual, Some(Role::Driver));
    }

    #[test]
    fn bare_section_redirects_after_gate() {
        assert_eq!(
            resolve("/warehouse/", &signed_in(Role::WarehouseStaff)),
            Navigation::Redirect("/warehouse/dashboard")
        );
        assert!(matches!(
            resolve("/warehouse", &signed_in(Role::Customer)),
            Navigation::Denied(_)
        ));
    }

    #[test]
    fn login_bounces_signed_in_users_home() {
        assert_eq!(
            resolve("/login", &signed_in(Role::Admin)),
            Navigation::Redirect("/admin/dashboard")
        );
        assert_eq!(resolve("/register", &signed_in(Role::Customer)), Navigation::Redirect("/"));
        assert_eq!(resolve("/login", &Session::anonymous()), Navigation::Show(Page::Login));
    }

    #[test]
    fn unknown_path_goes_to_landing_route() {
        assert_eq!(resolve("/nowhere", &Session::anonymous()), Navigation::Redirect("/login"));
        assert_eq!(
            resolve("/nowhere", &signed_in(Role::Driver)),
            Navigation::Redirect("/driver/dashboard")
        );
    }

    #[test]
    fn unrecognized_role_lands_on_storefront() {
        let mut user = UserProfile::new(9, "x", Role::Customer);
        user.role = None;
        let session = Session::signed_in("token", user);

        assert_eq!(landing_route(&session), "/");
        assert!(matches!(resolve("/cart", &session), Navigation::Denied(_)));
    }

    #[test]
    fn shared_pages_resolve_per_section() {
        assert_eq!(resolve("/warehouse/report", &signed_in(Role::WarehouseStaff)).page(), Some(Page::Reports));
        assert_eq!(resolve("/driver/history", &signed_in(Role::Driver)).page(), Some(Page::DeliveryHistory));
        assert_eq!(Page::DriverDashboard.title(), "My Deliveries");
    }

    #[test]
    fn every_menu_entry_resolves_to_a_page() {
        for role in Role::ALL {
            let session = signed_in(role);
            for entry in crate::menu::menu_for(role) {
                assert!(
                    resolve(entry.path, &session).page().is_some(),
                    "{} does not render for {role}",
                    entry.path
                );
            }
        }
    }
}
