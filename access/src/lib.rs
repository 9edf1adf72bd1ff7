//! # Depot Access
//!
//! Who may see what. Everything here is a lookup over the closed [`Role`]
//! set: the per-role navigation menu, the route authorization gate, and the
//! route table that turns a path into a page, a redirect, or a denial.
//!
//! None of it talks to the backend. Token validation happens server-side;
//! the client only checks that a token is present and reads the role from
//! the signed-in user's profile.
//!
//! ## Example
//!
//! ```
//! use depot_access::{Navigation, Page, Role, Session, UserProfile, resolve};
//!
//! let session = Session::signed_in("token", UserProfile::new(1, "mai", Role::Manager));
//! assert_eq!(resolve("/manager/products", &session), Navigation::Show(Page::Products));
//! assert_eq!(resolve("/manager", &session), Navigation::Redirect("/manager/dashboard"));
//! ```

pub mod gate;
pub mod menu;
pub mod role;
pub mod routes;
pub mod session;

pub use gate::{AccessDenied, GateDecision, LOGIN_PATH, authorize};
pub use menu::{Icon, NavEntry, menu_for, menu_for_name, menu_for_session};
pub use role::{Role, Tone, UnknownRole};
pub use routes::{Navigation, Page, landing_route, resolve};
pub use session::{AuthToken, Session, UserProfile};
