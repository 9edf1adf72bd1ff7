//! Product catalogue container.

use crate::ContainerEnvironment;
use crate::notice::Notices;
use crate::resource::{RequestToken, ResourceState};
use depot_api::models::{Product, ProductCategory, ProductDraft, ProductId};
use depot_api::validation::check;
use depot_api::{ApiError, FormErrors, PageResult, ProductApi};
use depot_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<ProductAction>; 4]>;

/// What the loaded list currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Plain pagination over every product
    #[default]
    Paged,
    /// Results of a keyword search, presented as one page
    Search(String),
    /// One category, paginated
    Category(ProductCategory),
}

/// Product list, form state and notices.
#[derive(Debug, Clone, Default)]
pub struct ProductState {
    /// Loaded rows and fetch status
    pub resource: ResourceState<Product>,
    /// What the loaded list shows
    pub mode: ListMode,
    /// Problems found in the last submitted form
    pub form_errors: Option<FormErrors>,
    /// A create or update is in flight
    pub submitting: bool,
    /// Messages for the shell
    pub notices: Notices,
}

/// Product container actions.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Load one page of every product
    FetchPage {
        /// Zero-based page
        page: u32,
        /// Rows per page
        size: u32,
    },
    /// Search by keyword; a blank keyword reloads the first page
    Search {
        /// Name or SKU fragment
        keyword: String,
    },
    /// Load one page of a category
    FetchCategory {
        /// Category to browse
        category: ProductCategory,
        /// Zero-based page
        page: u32,
        /// Rows per page
        size: u32,
    },
    /// Outcome of any list fetch
    Loaded {
        /// Token the fetch was issued with
        token: RequestToken,
        /// Page or failure
        result: Result<PageResult<Product>, ApiError>,
    },
    /// Validate and submit a new product
    Create {
        /// Form contents
        draft: ProductDraft,
    },
    /// Outcome of a create
    Created {
        /// Stored product or failure
        result: Result<Product, ApiError>,
    },
    /// Validate and submit changes to a product
    Update {
        /// Product to change
        id: ProductId,
        /// Form contents
        draft: ProductDraft,
    },
    /// Outcome of an update
    Updated {
        /// Stored product or failure
        result: Result<Product, ApiError>,
    },
    /// Delete a product
    Delete {
        /// Product to delete
        id: ProductId,
    },
    /// Outcome of a delete
    Deleted {
        /// Product that was targeted
        id: ProductId,
        /// Backend confirmation or failure
        result: Result<String, ApiError>,
    },
    /// Forget the last fetch failure
    ClearError,
    /// Drop shown notices
    ClearNotices,
}

crate::service_reducer!(
    /// Reducer for [`ProductState`], generic over the product service.
    ProductReducer
);

impl<A: ProductApi + 'static> ProductReducer<A> {
    fn fetch_page(state: &mut ProductState, env: &ContainerEnvironment<A>, page: u32, size: u32) -> Effects {
        state.mode = ListMode::Paged;
        let token = state.resource.begin_page_fetch(size);
        let api = Arc::clone(&env.api);
        smallvec![Effect::future(async move {
            let result = api.list(page, size).await;
            Some(ProductAction::Loaded { token, result })
        })]
    }

    fn validate(state: &mut ProductState, draft: &ProductDraft) -> bool {
        match check(draft) {
            Ok(()) => {
                state.form_errors = None;
                true
            },
            Err(errors) => {
                tracing::debug!(%errors, "product form rejected");
                state.form_errors = Some(errors);
                false
            },
        }
    }
}

impl<A: ProductApi + 'static> Reducer for ProductReducer<A> {
    type State = ProductState;
    type Action = ProductAction;
    type Environment = ContainerEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            ProductAction::FetchPage { page, size } => Self::fetch_page(state, env, page, size),

            ProductAction::Search { keyword } => {
                let keyword = keyword.trim().to_string();
                if keyword.is_empty() {
                    let size = state.resource.page_size();
                    return Self::fetch_page(state, env, 0, size);
                }

                state.mode = ListMode::Search(keyword.clone());
                let token = state.resource.begin_fetch();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.search(&keyword).await.map(PageResult::single);
                    Some(ProductAction::Loaded { token, result })
                })]
            },

            ProductAction::FetchCategory {
                category,
                page,
                size,
            } => {
                state.mode = ListMode::Category(category);
                let token = state.resource.begin_page_fetch(size);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.by_category(category, page, size).await;
                    Some(ProductAction::Loaded { token, result })
                })]
            },

            ProductAction::Loaded { token, result } => {
                state.resource.complete(token, result);
                SmallVec::new()
            },

            ProductAction::Create { draft } => {
                if !Self::validate(state, &draft) {
                    return SmallVec::new();
                }
                state.submitting = true;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.create(&draft).await;
                    Some(ProductAction::Created { result })
                })]
            },

            ProductAction::Created { result } => {
                state.submitting = false;
                match result {
                    Ok(product) => {
                        state.resource.append(product);
                        state.notices.success("Product created successfully", &*env.clock);
                    },
                    Err(error) => state.notices.error(error.user_message(), &*env.clock),
                }
                SmallVec::new()
            },

            ProductAction::Update { id, draft } => {
                if let Some(current) = state.resource.get(id) {
                    if current.sku != draft.sku {
                        state.form_errors = Some(FormErrors::single("sku", "SKU cannot be changed"));
                        return SmallVec::new();
                    }
                }
                if !Self::validate(state, &draft) {
                    return SmallVec::new();
                }
                state.submitting = true;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.update(id, &draft).await;
                    Some(ProductAction::Updated { result })
                })]
            },

            ProductAction::Updated { result } => {
                state.submitting = false;
                match result {
                    Ok(product) => {
                        state.resource.replace(product);
                        state.notices.success("Product updated successfully", &*env.clock);
                    },
                    Err(error) => state.notices.error(error.user_message(), &*env.clock),
                }
                SmallVec::new()
            },

            ProductAction::Delete { id } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.delete(id).await;
                    Some(ProductAction::Deleted { id, result })
                })]
            },

            ProductAction::Deleted { id, result } => {
                match result {
                    Ok(_) => {
                        state.resource.remove(id);
                        state.notices.success("Product deleted successfully", &*env.clock);
                    },
                    Err(error) => {
                        tracing::warn!(%id, %error, "product delete failed");
                        state.notices.error("Failed to delete product", &*env.clock);
                    },
                }
                SmallVec::new()
            },

            ProductAction::ClearError => {
                state.resource.clear_error();
                SmallVec::new()
            },

            ProductAction::ClearNotices => {
                state.notices.drain();
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use crate::resource::LoadStatus;
    use depot_testing::{InMemoryBackend, ReducerTest, assertions, collect_actions, test_clock};
    use rust_decimal_macros::dec;

    fn env(backend: &InMemoryBackend) -> ContainerEnvironment<InMemoryBackend> {
        ContainerEnvironment::new(backend.clone(), Arc::new(test_clock()))
    }

    /// Reduce `action`, run its effects and reduce what they produce.
    async fn drive(
        state: &mut ProductState,
        env: &ContainerEnvironment<InMemoryBackend>,
        action: ProductAction,
    ) {
        let reducer = ProductReducer::new();
        let effects = reducer.reduce(state, action, env);
        for follow_up in collect_actions(effects).await {
            let more = reducer.reduce(state, follow_up, env);
            assertions::assert_no_effects(&more);
        }
    }

    #[test]
    fn fetch_marks_loading_and_issues_request() {
        let backend = InMemoryBackend::new();
        ReducerTest::new(ProductReducer::new())
            .with_env(env(&backend))
            .given_state(ProductState::default())
            .when_action(ProductAction::FetchPage { page: 2, size: 5 })
            .then_state(|state| {
                assert_eq!(state.resource.status(), LoadStatus::Loading);
                assert_eq!(state.resource.page_size(), 5);
                assert_eq!(state.mode, ListMode::Paged);
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn invalid_draft_never_reaches_the_backend() {
        let backend = InMemoryBackend::new();
        ReducerTest::new(ProductReducer::new())
            .with_env(env(&backend))
            .given_state(ProductState::default())
            .when_action(ProductAction::Create {
                draft: ProductDraft::new("", "SKU-1", dec!(10)),
            })
            .then_state(|state| {
                let errors = state.form_errors.as_ref().expect("form errors");
                assert_eq!(errors.message_for("name"), Some("Product name is required"));
                assert!(!state.submitting);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn search_presents_results_as_one_page() {
        let backend = InMemoryBackend::new();
        backend.seed_product(ProductDraft::new("Wireless Mouse", "MS-1", dec!(10)));
        backend.seed_product(ProductDraft::new("Keyboard", "KB-1", dec!(10)));
        backend.seed_product(ProductDraft::new("Mouse Pad", "MP-1", dec!(10)));
        let env = env(&backend);

        let mut state = ProductState::default();
        drive(&mut state, &env, ProductAction::FetchPage { page: 3, size: 1 }).await;
        drive(&mut state, &env, ProductAction::Search { keyword: " mouse ".to_string() }).await;

        assert_eq!(state.mode, ListMode::Search("mouse".to_string()));
        assert_eq!(state.resource.items().len(), 2);
        assert_eq!(state.resource.current_page(), 0);
        assert_eq!(state.resource.total_pages(), 1);
        assert!(backend.calls().contains(&"GET /products/search?keyword=mouse".to_string()));
    }

    #[tokio::test]
    async fn blank_search_reloads_first_page() {
        let backend = InMemoryBackend::new();
        let env = env(&backend);

        let mut state = ProductState::default();
        drive(&mut state, &env, ProductAction::Search { keyword: "   ".to_string() }).await;

        assert_eq!(state.mode, ListMode::Paged);
        assert_eq!(backend.calls(), vec!["GET /products?page=0&size=10".to_string()]);
    }

    #[tokio::test]
    async fn category_browse() {
        let backend = InMemoryBackend::new();
        backend.seed_product(ProductDraft {
            category: ProductCategory::Books,
            ..ProductDraft::new("Rust Book", "BK-1", dec!(300000))
        });
        backend.seed_product(ProductDraft::new("Misc", "OT-1", dec!(1)));
        let env = env(&backend);

        let mut state = ProductState::default();
        drive(
            &mut state,
            &env,
            ProductAction::FetchCategory {
                category: ProductCategory::Books,
                page: 0,
                size: 10,
            },
        )
        .await;

        assert_eq!(state.mode, ListMode::Category(ProductCategory::Books));
        assert_eq!(state.resource.items().len(), 1);
        assert_eq!(state.resource.items()[0].name, "Rust Book");
    }

    #[tokio::test]
    async fn sku_cannot_change_on_update() {
        let backend = InMemoryBackend::new();
        let product = backend.seed_product(ProductDraft::new("Desk", "DK-1", dec!(5)));
        let env = env(&backend);

        let mut state = ProductState::default();
        drive(&mut state, &env, ProductAction::FetchPage { page: 0, size: 10 }).await;

        let mut draft = product.draft();
        draft.sku = "DK-2".to_string();
        drive(&mut state, &env, ProductAction::Update { id: product.id, draft }).await;

        assert_eq!(
            state.form_errors.as_ref().and_then(|e| e.message_for("sku")),
            Some("SKU cannot be changed")
        );
        assert_eq!(backend.call_count("PUT"), 0);
    }

    #[tokio::test]
    async fn failed_delete_keeps_row_and_reports() {
        let backend = InMemoryBackend::new();
        let product = backend.seed_product(ProductDraft::new("Desk", "DK-1", dec!(5)));
        let env = env(&backend);

        let mut state = ProductState::default();
        drive(&mut state, &env, ProductAction::FetchPage { page: 0, size: 10 }).await;

        backend.fail_next(ApiError::Forbidden);
        drive(&mut state, &env, ProductAction::Delete { id: product.id }).await;

        assert_eq!(state.resource.items().len(), 1);
        let notice = state.notices.last().expect("notice");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Failed to delete product");
        assert!(!state.resource.is_unreconciled());

        drive(&mut state, &env, ProductAction::Delete { id: product.id }).await;
        assert!(state.resource.items().is_empty());
        assert!(state.resource.is_unreconciled());
        assert_eq!(state.notices.last().unwrap().message, "Product deleted successfully");
    }

    #[tokio::test]
    async fn create_failure_surfaces_backend_message() {
        let backend = InMemoryBackend::new();
        backend.seed_product(ProductDraft::new("Desk", "DK-1", dec!(5)));
        let env = env(&backend);

        let mut state = ProductState::default();
        drive(
            &mut state,
            &env,
            ProductAction::Create {
                draft: ProductDraft::new("Desk 2", "DK-1", dec!(5)),
            },
        )
        .await;

        assert!(!state.submitting);
        assert_eq!(
            state.notices.last().unwrap().message,
            "Product with SKU DK-1 already exists"
        );
        assert!(state.resource.items().is_empty());
    }

    #[test]
    fn clear_notices() {
        let backend = InMemoryBackend::new();
        let clock = test_clock();
        let mut state = ProductState::default();
        state.notices.info("hello", &clock);

        ReducerTest::new(ProductReducer::new())
            .with_env(env(&backend))
            .given_state(state)
            .when_action(ProductAction::ClearNotices)
            .then_state(|state| assert!(state.notices.is_empty()))
            .run();
    }
}
