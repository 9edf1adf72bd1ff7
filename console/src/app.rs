//! The console shell: one store per container, route resolution, and page
//! rendering.

use crate::config::ConsoleConfig;
use crate::render;
use depot_access::{Navigation, Page, UserProfile, menu_for_session, resolve};
use depot_api::{
    ApiError, DashboardService, HttpClient, OrderService, ProductService, ShipmentService,
    TokenSlot, WarehouseService,
};
use depot_core::environment::{Clock, SystemClock};
use depot_runtime::{Store, StoreError};
use depot_state::{
    ContainerEnvironment, DashboardAction, DashboardReducer, DashboardState, Notice, Notices,
    OrderAction, OrderReducer, OrderState, ProductAction, ProductReducer, ProductState,
    SessionAction, SessionEnvironment, SessionReducer, SessionState, ShipmentAction,
    ShipmentReducer, ShipmentState, WarehouseAction, WarehouseReducer, WarehouseState,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Redirects followed before giving up on a path.
const MAX_REDIRECTS: usize = 4;

/// How long a page waits for its fetches.
const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that stop the console from rendering a page.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] ApiError),

    /// A store refused an action or a fetch never finished
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Routes kept redirecting
    #[error("too many redirects starting at {0}")]
    RedirectLoop(String),
}

type Env<A> = ContainerEnvironment<A>;

type SessionStore = Store<SessionState, SessionAction, SessionEnvironment, SessionReducer>;
type ProductStore =
    Store<ProductState, ProductAction, Env<ProductService>, ProductReducer<ProductService>>;
type OrderStore = Store<OrderState, OrderAction, Env<OrderService>, OrderReducer<OrderService>>;
type WarehouseStore =
    Store<WarehouseState, WarehouseAction, Env<WarehouseService>, WarehouseReducer<WarehouseService>>;
type ShipmentStore =
    Store<ShipmentState, ShipmentAction, Env<ShipmentService>, ShipmentReducer<ShipmentService>>;
type DashboardStore =
    Store<DashboardState, DashboardAction, Env<DashboardService>, DashboardReducer<DashboardService>>;

/// Stores for every container, wired to one HTTP client.
pub struct Console {
    session: SessionStore,
    products: ProductStore,
    orders: OrderStore,
    warehouses: WarehouseStore,
    shipments: ShipmentStore,
    dashboard: DashboardStore,
    page_size: u32,
}

impl Console {
    /// Build the stores and adopt the configured session.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] if the HTTP client cannot be built or the
    /// session store rejects the sign-in.
    pub async fn new(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let tokens = TokenSlot::new();
        let http = HttpClient::with_token(&config.api, tokens.clone())?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let console = Self {
            session: Store::new(
                SessionState::default(),
                SessionReducer::new(),
                SessionEnvironment::new(tokens, Arc::clone(&clock)),
            ),
            products: Store::new(
                ProductState::default(),
                ProductReducer::new(),
                Env::new(ProductService::new(http.clone()), Arc::clone(&clock)),
            ),
            orders: Store::new(
                OrderState::default(),
                OrderReducer::new(),
                Env::new(OrderService::new(http.clone()), Arc::clone(&clock)),
            ),
            warehouses: Store::new(
                WarehouseState::default(),
                WarehouseReducer::new(),
                Env::new(WarehouseService::new(http.clone()), Arc::clone(&clock)),
            ),
            shipments: Store::new(
                ShipmentState::default(),
                ShipmentReducer::new(),
                Env::new(ShipmentService::new(http.clone()), Arc::clone(&clock)),
            ),
            dashboard: Store::new(
                DashboardState::default(),
                DashboardReducer::new(),
                Env::new(DashboardService::new(http), clock),
            ),
            page_size: config.api.page_size,
        };

        if let (Some(token), Some(user)) = (&config.token, &config.user) {
            dispatch(
                &console.session,
                SessionAction::SignIn {
                    token: token.clone(),
                    user: user.clone(),
                },
            )
            .await?;
        }

        Ok(console)
    }

    /// The signed-in user, if any.
    pub async fn user(&self) -> Option<UserProfile> {
        self.session.state(|s| s.session.user().cloned()).await
    }

    /// Resolve `path`, load what the page shows, and render it.
    ///
    /// `arg` is the search keyword on the shop and the tracking number on
    /// the tracking page.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] if routing loops or a store fails.
    /// Backend failures are rendered, not returned.
    pub async fn visit(&self, path: &str, arg: Option<&str>) -> Result<String, ConsoleError> {
        let session = self.session.state(|s| s.session.clone()).await;

        let mut current = path.to_string();
        let page = 'route: {
            for _ in 0..MAX_REDIRECTS {
                match resolve(&current, &session) {
                    Navigation::Show(page) => break 'route page,
                    Navigation::Redirect(next) => {
                        tracing::debug!(from = %current, to = next, "redirect");
                        current = next.to_string();
                    },
                    Navigation::Denied(denied) => return Ok(format!("{denied}\n")),
                }
            }
            return Err(ConsoleError::RedirectLoop(path.to_string()));
        };

        tracing::info!(path = %current, page = page.title(), "rendering page");
        let mut out = format!("== {} ({current}) ==\n", page.title());
        let menu = render::menu(menu_for_session(session.role()));
        if !menu.is_empty() {
            out.push_str(&menu);
            out.push('\n');
        }

        let view = self.load(page, arg).await?;
        out.push_str(&view.body);
        out.push_str(&render::notices(&view.notices));

        if view.unauthorized {
            self.expire().await?;
            out.push_str(&render::notices(&self.drain_session_notices().await?));
        }
        Ok(out)
    }

    /// Forget the session and clear the client's token.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] if the session store is gone.
    pub async fn sign_out(&self) -> Result<Vec<Notice>, ConsoleError> {
        dispatch(&self.session, SessionAction::SignOut).await?;
        self.drain_session_notices().await
    }

    async fn expire(&self) -> Result<(), ConsoleError> {
        tracing::warn!("backend rejected the token, signing out");
        dispatch(&self.session, SessionAction::Expired).await
    }

    async fn drain_session_notices(&self) -> Result<Vec<Notice>, ConsoleError> {
        let notices = self.session.state(|s| s.notices.as_slice().to_vec()).await;
        dispatch(&self.session, SessionAction::ClearNotices).await?;
        Ok(notices)
    }

    /// Fetch and render the body of `page`.
    async fn load(&self, page: Page, arg: Option<&str>) -> Result<View, ConsoleError> {
        let size = self.page_size;
        match page {
            Page::Home | Page::Shop | Page::Products | Page::Inventory => {
                let action = match arg {
                    Some(keyword) if page == Page::Shop => ProductAction::Search {
                        keyword: keyword.to_string(),
                    },
                    _ => ProductAction::FetchPage { page: 0, size },
                };
                dispatch(&self.products, action).await?;
                let view = self
                    .products
                    .state(|s| View::of(render::products(&s.resource), &s.notices, s.resource.error()))
                    .await;
                dispatch(&self.products, ProductAction::ClearNotices).await?;
                Ok(view)
            },

            Page::Orders | Page::MyOrders => {
                dispatch(&self.orders, OrderAction::FetchPage { page: 0, size }).await?;
                let view = self
                    .orders
                    .state(|s| View::of(render::orders(&s.resource), &s.notices, s.resource.error()))
                    .await;
                dispatch(&self.orders, OrderAction::ClearNotices).await?;
                Ok(view)
            },

            Page::Warehouses => {
                dispatch(&self.warehouses, WarehouseAction::FetchPage { page: 0, size }).await?;
                let view = self
                    .warehouses
                    .state(|s| {
                        View::of(render::warehouses(&s.resource), &s.notices, s.resource.error())
                    })
                    .await;
                dispatch(&self.warehouses, WarehouseAction::ClearNotices).await?;
                Ok(view)
            },

            Page::Shipments | Page::DriverDashboard | Page::DriverRoutes | Page::DeliveryHistory => {
                dispatch(&self.shipments, ShipmentAction::FetchActive).await?;
                let view = self
                    .shipments
                    .state(|s| View::of(render::shipments(&s.active), &s.notices, s.active.error()))
                    .await;
                dispatch(&self.shipments, ShipmentAction::ClearNotices).await?;
                Ok(view)
            },

            Page::TrackOrder => {
                let Some(tracking_number) = arg else {
                    return Ok(View::text("Pass a tracking number to look up a shipment\n"));
                };
                dispatch(
                    &self.shipments,
                    ShipmentAction::Track {
                        tracking_number: tracking_number.to_string(),
                    },
                )
                .await?;
                let view = self
                    .shipments
                    .state(|s| View::of(render::tracked(&s.tracked), &s.notices, s.tracked.error()))
                    .await;
                dispatch(&self.shipments, ShipmentAction::ClearNotices).await?;
                Ok(view)
            },

            Page::AdminDashboard
            | Page::ManagerDashboard
            | Page::WarehouseDashboard
            | Page::Reports => {
                dispatch(&self.dashboard, DashboardAction::Refresh).await?;
                Ok(self
                    .dashboard
                    .state(|s| {
                        let body = format!(
                            "{}\n{}{}",
                            render::stats(&s.stats),
                            render::recent_orders(&s.recent_orders),
                            render::top_products(&s.top_products)
                        );
                        View {
                            body,
                            notices: Vec::new(),
                            unauthorized: is_unauthorized(s.stats.error()),
                        }
                    })
                    .await)
            },

            Page::Profile => {
                let body = self
                    .user()
                    .await
                    .map_or_else(String::new, |user| render::profile(&user));
                Ok(View::text(body))
            },

            Page::Login
            | Page::Register
            | Page::Cart
            | Page::Users
            | Page::Settings
            | Page::ReceiveGoods
            | Page::DispatchGoods => Ok(View::text(String::new())),
        }
    }
}

/// What one page load produced.
struct View {
    body: String,
    notices: Vec<Notice>,
    /// The backend rejected the token
    unauthorized: bool,
}

impl View {
    fn of(body: String, notices: &Notices, error: Option<&ApiError>) -> Self {
        Self {
            body,
            notices: notices.as_slice().to_vec(),
            unauthorized: is_unauthorized(error),
        }
    }

    fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            notices: Vec::new(),
            unauthorized: false,
        }
    }
}

/// Send `action` and wait for every effect it started.
async fn dispatch<S, A, E, R>(store: &Store<S, A, E, R>, action: A) -> Result<(), ConsoleError>
where
    R: depot_core::reducer::Reducer<State = S, Action = A, Environment = E>
        + Clone
        + Send
        + Sync
        + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let mut handle = store.send(action).await?;
    handle.wait_with_timeout(PAGE_TIMEOUT).await?;
    Ok(())
}

fn is_unauthorized(error: Option<&ApiError>) -> bool {
    matches!(error, Some(ApiError::Unauthorized))
}
