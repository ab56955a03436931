//! Customer service — use-cases for managing customers.

use sanitrack_domain::customer::Customer;
use sanitrack_domain::error::{NotFoundError, SanitrackError};
use sanitrack_domain::id::CustomerId;

use crate::ports::CustomerRepository;

/// Application service for customer CRUD operations.
pub struct CustomerService<R> {
    repo: R,
}

impl<R: CustomerRepository> CustomerService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new customer after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail,
    /// [`SanitrackError::Uniqueness`] when the code is taken, or a storage
    /// error from the repository.
    pub async fn create_customer(&self, customer: Customer) -> Result<Customer, SanitrackError> {
        customer.validate()?;
        self.repo.create(customer).await
    }

    /// Look up a customer by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no customer with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Customer",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all customers ordered by code.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, SanitrackError> {
        self.repo.get_all().await
    }

    /// Update an existing customer. Renaming the code later propagates into
    /// derived station codes on each station's next save.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail, or a
    /// storage error from the repository.
    pub async fn update_customer(&self, customer: Customer) -> Result<Customer, SanitrackError> {
        customer.validate()?;
        self.repo.update(customer).await
    }

    /// Delete a customer, cascading to its facilities, zones, and stations.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), SanitrackError> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanitrack_domain::error::{UniquenessViolation, ValidationError};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    struct InMemoryCustomerRepo {
        store: Mutex<HashMap<CustomerId, Customer>>,
    }

    impl Default for InMemoryCustomerRepo {
        fn default() -> Self {
            Self {
                store: Mutex::new(HashMap::new()),
            }
        }
    }

    impl CustomerRepository for InMemoryCustomerRepo {
        fn create(
            &self,
            customer: Customer,
        ) -> impl Future<Output = Result<Customer, SanitrackError>> + Send {
            let mut store = self.store.lock().unwrap();
            let result = if store.values().any(|c| c.code == customer.code) {
                Err(UniquenessViolation {
                    entity: "Customer",
                    key: customer.code.clone(),
                }
                .into())
            } else {
                store.insert(customer.id, customer.clone());
                Ok(customer)
            };
            async { result }
        }

        fn get_by_id(
            &self,
            id: CustomerId,
        ) -> impl Future<Output = Result<Option<Customer>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(&id).cloned();
            async { Ok(result) }
        }

        fn get_by_code(
            &self,
            code: &str,
        ) -> impl Future<Output = Result<Option<Customer>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.values().find(|c| c.code == code).cloned();
            async { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<Customer>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<Customer> = store.values().cloned().collect();
            async { Ok(result) }
        }

        fn update(
            &self,
            customer: Customer,
        ) -> impl Future<Output = Result<Customer, SanitrackError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(customer.id, customer.clone());
            async { Ok(customer) }
        }

        fn delete(
            &self,
            id: CustomerId,
        ) -> impl Future<Output = Result<(), SanitrackError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.remove(&id);
            async { Ok(()) }
        }
    }

    fn make_service() -> CustomerService<InMemoryCustomerRepo> {
        CustomerService::new(InMemoryCustomerRepo::default())
    }

    fn valid_customer() -> Customer {
        Customer::builder().code("C1").name("Acme Foods").build().unwrap()
    }

    #[tokio::test]
    async fn should_create_customer_when_valid() {
        let svc = make_service();
        let customer = valid_customer();
        let id = customer.id;

        svc.create_customer(customer).await.unwrap();

        let fetched = svc.get_customer(id).await.unwrap();
        assert_eq!(fetched.code, "C1");
    }

    #[tokio::test]
    async fn should_reject_create_when_code_is_empty() {
        let svc = make_service();
        let mut customer = valid_customer();
        customer.code = String::new();

        let result = svc.create_customer(customer).await;
        assert!(matches!(
            result,
            Err(SanitrackError::Validation(ValidationError::EmptyCode))
        ));
    }

    #[tokio::test]
    async fn should_surface_conflict_when_code_is_taken() {
        let svc = make_service();
        svc.create_customer(valid_customer()).await.unwrap();

        let result = svc
            .create_customer(Customer::builder().code("C1").name("Other").build().unwrap())
            .await;
        assert!(matches!(result, Err(SanitrackError::Uniqueness(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_customer_missing() {
        let svc = make_service();
        let result = svc.get_customer(CustomerId::new()).await;
        assert!(matches!(result, Err(SanitrackError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_customer() {
        let svc = make_service();
        let customer = valid_customer();
        let id = customer.id;
        svc.create_customer(customer).await.unwrap();

        svc.delete_customer(id).await.unwrap();

        let result = svc.get_customer(id).await;
        assert!(matches!(result, Err(SanitrackError::NotFound(_))));
    }
}
