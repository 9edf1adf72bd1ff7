//! Request-fenced containers for server-owned data.
//!
//! Every fetch mints a [`RequestToken`]. Only a response carrying the latest
//! token is applied; anything older is logged, counted and dropped. This is
//! what keeps a slow page-0 response from overwriting the page-1 fetch the
//! user asked for afterwards.

use depot_api::config::DEFAULT_PAGE_SIZE;
use depot_api::models::{Order, OrderId, Product, ProductId, Shipment, ShipmentId, Warehouse, WarehouseId};
use depot_api::{ApiError, PageResult};
use std::fmt;

/// Name of the counter incremented for every discarded response.
pub const DISCARDED_RESPONSES: &str = "state.responses.discarded";

/// Where a container is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The latest fetch succeeded
    Ready,
    /// The latest fetch failed
    Error,
}

/// Identifier of one issued fetch. Later fetches carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(u64);

impl RequestToken {
    /// The raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mints tokens and recognises the latest one.
#[derive(Debug, Clone, Default)]
struct Fence {
    latest: RequestToken,
}

impl Fence {
    fn issue(&mut self) -> RequestToken {
        self.latest = RequestToken(self.latest.0 + 1);
        self.latest
    }

    fn admits(&self, token: RequestToken, kind: &'static str) -> bool {
        if token == self.latest {
            return true;
        }
        tracing::debug!(
            resource = kind,
            %token,
            latest = %self.latest,
            "discarding stale response"
        );
        metrics::counter!(DISCARDED_RESPONSES, "resource" => kind).increment(1);
        false
    }
}

/// A server-owned record kept in a list container.
pub trait Entity: Clone {
    /// Identifier type
    type Id: Copy + Eq + fmt::Debug;

    /// Resource name used in logs and metrics
    const KIND: &'static str;

    /// Identifier of this record
    fn id(&self) -> Self::Id;
}

impl Entity for Product {
    type Id = ProductId;
    const KIND: &'static str = "products";

    fn id(&self) -> ProductId {
        self.id
    }
}

impl Entity for Order {
    type Id = OrderId;
    const KIND: &'static str = "orders";

    fn id(&self) -> OrderId {
        self.id
    }
}

impl Entity for Warehouse {
    type Id = WarehouseId;
    const KIND: &'static str = "warehouses";

    fn id(&self) -> WarehouseId {
        self.id
    }
}

impl Entity for Shipment {
    type Id = ShipmentId;
    const KIND: &'static str = "shipments";

    fn id(&self) -> ShipmentId {
        self.id
    }
}

/// One page of a resource plus its fetch status.
///
/// A failed fetch keeps the items of the last successful one. Local patches
/// (append, prepend, replace, remove) mark the list unreconciled: it no
/// longer matches any page the backend served, until an accepted fetch
/// issued after the last patch replaces it. A fetch already in flight when
/// the patch landed may predate it, so its page leaves the flag set.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    items: Vec<T>,
    total_items: u64,
    total_pages: u32,
    current_page: u32,
    page_size: u32,
    status: LoadStatus,
    error: Option<ApiError>,
    unreconciled: bool,
    patched_at: RequestToken,
    fence: Fence,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_pages: 0,
            current_page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            status: LoadStatus::Idle,
            error: None,
            unreconciled: false,
            patched_at: RequestToken::default(),
            fence: Fence::default(),
        }
    }
}

impl<T: Entity> ResourceState<T> {
    /// An idle, empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of the current page, including local patches.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Rows across all pages as last reported, adjusted by local patches.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Page count as last reported.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Zero-based index of the page shown.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Page size of the most recent paged fetch.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch status.
    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// Failure of the latest fetch, if it failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// True while a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// True once a local patch has diverged the list from the backend.
    #[must_use]
    pub const fn is_unreconciled(&self) -> bool {
        self.unreconciled
    }

    /// Token of the most recently issued fetch.
    #[must_use]
    pub const fn latest_token(&self) -> RequestToken {
        self.fence.latest
    }

    /// The row with `id`, if it is on the current page.
    #[must_use]
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Start a fetch: status `Loading`, error cleared, new token issued.
    pub fn begin_fetch(&mut self) -> RequestToken {
        self.status = LoadStatus::Loading;
        self.error = None;
        self.fence.issue()
    }

    /// Start a paged fetch and remember its page size.
    pub fn begin_page_fetch(&mut self, size: u32) -> RequestToken {
        self.page_size = size.max(1);
        self.begin_fetch()
    }

    /// Apply the outcome of fetch `token`.
    ///
    /// Returns `false`, leaving the state untouched, when `token` is not the
    /// latest issued.
    pub fn complete(&mut self, token: RequestToken, result: Result<PageResult<T>, ApiError>) -> bool {
        if !self.fence.admits(token, T::KIND) {
            return false;
        }

        match result {
            Ok(page) => {
                self.items = page.items;
                self.total_items = page.total_items;
                self.total_pages = page.total_pages;
                self.current_page = page.current_page;
                self.status = LoadStatus::Ready;
                if token > self.patched_at {
                    self.unreconciled = false;
                }
            },
            Err(error) => {
                tracing::warn!(resource = T::KIND, %error, "fetch failed");
                self.status = LoadStatus::Error;
                self.error = Some(error);
            },
        }
        true
    }

    /// Add a created row at the end of the list.
    pub fn append(&mut self, item: T) {
        self.items.push(item);
        self.total_items += 1;
        self.mark_patched();
    }

    /// Add a created row at the front of the list.
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
        self.total_items += 1;
        self.mark_patched();
    }

    /// Replace the row with the same id. Returns `false` if it is not listed.
    pub fn replace(&mut self, item: T) -> bool {
        let Some(slot) = self.items.iter_mut().find(|row| row.id() == item.id()) else {
            return false;
        };
        *slot = item;
        self.mark_patched();
        true
    }

    /// Drop the row with `id`. Returns `false` if it is not listed.
    pub fn remove(&mut self, id: T::Id) -> bool {
        let before = self.items.len();
        self.items.retain(|row| row.id() != id);
        if self.items.len() == before {
            return false;
        }
        self.total_items = self.total_items.saturating_sub(1);
        self.mark_patched();
        true
    }

    fn mark_patched(&mut self) {
        self.unreconciled = true;
        self.patched_at = self.fence.latest;
    }

    /// Forget the last fetch failure.
    pub fn clear_error(&mut self) {
        self.error = None;
        if self.status == LoadStatus::Error {
            self.status = if self.items.is_empty() { LoadStatus::Idle } else { LoadStatus::Ready };
        }
    }
}

/// A single fenced value, such as dashboard counters or a tracked shipment.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    kind: &'static str,
    value: Option<T>,
    status: LoadStatus,
    error: Option<ApiError>,
    fence: Fence,
}

impl<T> Slot<T> {
    /// An empty slot named `kind` in logs and metrics.
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            value: None,
            status: LoadStatus::Idle,
            error: None,
            fence: Fence::default(),
        }
    }

    /// The value of the latest successful fetch.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Fetch status.
    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// Failure of the latest fetch, if it failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// True while a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Start a fetch.
    pub fn begin_fetch(&mut self) -> RequestToken {
        self.status = LoadStatus::Loading;
        self.error = None;
        self.fence.issue()
    }

    /// Apply the outcome of fetch `token`; stale tokens are ignored.
    ///
    /// A failure clears the value: a slot shows one answer or none.
    pub fn complete(&mut self, token: RequestToken, result: Result<T, ApiError>) -> bool {
        if !self.fence.admits(token, self.kind) {
            return false;
        }

        match result {
            Ok(value) => {
                self.value = Some(value);
                self.status = LoadStatus::Ready;
            },
            Err(error) => {
                tracing::warn!(resource = self.kind, %error, "fetch failed");
                self.value = None;
                self.status = LoadStatus::Error;
                self.error = Some(error);
            },
        }
        true
    }

    /// Mutable access to the held value for local patches.
    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }
}
