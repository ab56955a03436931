//! Definition-list services — request types and products.
//!
//! The plain name+position lookups (applications, activities, findings) are
//! edited through their repositories directly; request types add the
//! bootstrap/name lookup and products add the selectable predicate.
//! Deleting a definition that is still referenced (a request type in use, a
//! product on a historical record) is blocked by the storage layer's
//! restrict rules and surfaces as a referential-integrity error.

use sanitrack_domain::error::{NotFoundError, SanitrackError};
use sanitrack_domain::id::{ProductDefId, RequestTypeId};
use sanitrack_domain::lookup::{ProductDef, RequestType};

use crate::ports::{ProductDefRepository, RequestTypeRepository};

/// Application service for request types.
pub struct RequestTypeService<R> {
    repo: R,
}

impl<R: RequestTypeRepository> RequestTypeService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new request type.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn create(&self, request_type: RequestType) -> Result<RequestType, SanitrackError> {
        self.repo.create(request_type).await
    }

    /// Look up a request type by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no type with `id` exists.
    pub async fn get(&self, id: RequestTypeId) -> Result<RequestType, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "RequestType",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all request types in display order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<RequestType>, SanitrackError> {
        self.repo.get_all().await
    }

    /// Update an existing request type.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn update(&self, request_type: RequestType) -> Result<RequestType, SanitrackError> {
        self.repo.update(request_type).await
    }

    /// Delete a request type. Blocked while requests reference it.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::ReferentialIntegrity`] when still in use.
    pub async fn delete(&self, id: RequestTypeId) -> Result<(), SanitrackError> {
        self.repo.delete(id).await
    }
}

/// Application service for product definitions.
pub struct ProductDefService<R> {
    repo: R,
}

impl<R: ProductDefRepository> ProductDefService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new product definition.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn create(&self, product: ProductDef) -> Result<ProductDef, SanitrackError> {
        self.repo.create(product).await
    }

    /// Look up a product by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no product with `id`
    /// exists.
    pub async fn get(&self, id: ProductDefId) -> Result<ProductDef, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "ProductDef",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List every product, active or not.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<ProductDef>, SanitrackError> {
        self.repo.get_all().await
    }

    /// List the products selectable for a record that already uses
    /// `already_used`: every active product, plus the inactive ones the
    /// record references so historical rows stay editable.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_selectable(
        &self,
        already_used: &[ProductDefId],
    ) -> Result<Vec<ProductDef>, SanitrackError> {
        let all = self.repo.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|p| p.is_selectable() || already_used.contains(&p.id))
            .collect())
    }

    /// Update an existing product.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn update(&self, product: ProductDef) -> Result<ProductDef, SanitrackError> {
        self.repo.update(product).await
    }

    /// Delete a product definition. Blocked while usage rows reference it.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::ReferentialIntegrity`] when still in use.
    pub async fn delete(&self, id: ProductDefId) -> Result<(), SanitrackError> {
        self.repo.delete(id).await
    }
}
