use super::{ProductApi, paging};
use crate::client::HttpClient;
use crate::error::Result;
use crate::models::{Product, ProductCategory, ProductDraft, ProductId};
use crate::page::{Page, PageResult};

/// [`ProductApi`] over HTTP (`/products`).
#[derive(Debug, Clone)]
pub struct ProductService {
    http: HttpClient,
}

impl ProductService {
    /// Create the service on top of a shared client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl ProductApi for ProductService {
    async fn list(&self, page: u32, size: u32) -> Result<PageResult<Product>> {
        let page: Page<Product> = self.http.get("/products", &paging(page, size)).await?;
        Ok(page.into())
    }

    async fn get(&self, id: ProductId) -> Result<Product> {
        self.http.get(&format!("/products/{id}"), &[]).await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Product>> {
        self.http
            .get("/products/search", &[("keyword", keyword.to_string())])
            .await
    }

    async fn by_category(
        &self,
        category: ProductCategory,
        page: u32,
        size: u32,
    ) -> Result<PageResult<Product>> {
        let page: Page<Product> = self
            .http
            .get(&format!("/products/category/{category}"), &paging(page, size))
            .await?;
        Ok(page.into())
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        self.http.post("/products", draft).await
    }

    async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product> {
        self.http.put(&format!("/products/{id}"), draft).await
    }

    async fn delete(&self, id: ProductId) -> Result<String> {
        self.http.delete(&format!("/products/{id}")).await
    }
}
