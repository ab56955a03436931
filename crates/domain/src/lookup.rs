//! Definition lists — the lookup tables line items and requests select from.
//!
//! Request types, applications, activities, and findings are all plain
//! name + ordering rows. Products additionally carry supplier data and an
//! `active` flag gating selection in new records.

use serde::{Deserialize, Serialize};

use crate::id::{ActivityDefId, ApplicationDefId, FindingDefId, ProductDefId, RequestTypeId};

/// Service-request category ("Complaint", "Planned visit", …). Requests
/// reference it; deletion is blocked while referenced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestType {
    pub id: RequestTypeId,
    pub name: String,
    pub position: u16,
}

impl RequestType {
    #[must_use]
    pub fn new(name: impl Into<String>, position: u16) -> Self {
        Self {
            id: RequestTypeId::new(),
            name: name.into(),
            position,
        }
    }
}

/// A treatment that can be performed during a visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDef {
    pub id: ApplicationDefId,
    pub name: String,
    pub position: u16,
}

impl ApplicationDef {
    #[must_use]
    pub fn new(name: impl Into<String>, position: u16) -> Self {
        Self {
            id: ApplicationDefId::new(),
            name: name.into(),
            position,
        }
    }
}

/// A corrective/preventive activity that can be recorded during a visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDef {
    pub id: ActivityDefId,
    pub name: String,
    pub position: u16,
}

impl ActivityDef {
    #[must_use]
    pub fn new(name: impl Into<String>, position: u16) -> Self {
        Self {
            id: ActivityDefId::new(),
            name: name.into(),
            position,
        }
    }
}

/// A pest sign that can be observed during a visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingDef {
    pub id: FindingDefId,
    pub name: String,
    pub position: u16,
}

impl FindingDef {
    #[must_use]
    pub fn new(name: impl Into<String>, position: u16) -> Self {
        Self {
            id: FindingDefId::new(),
            name: name.into(),
            position,
        }
    }
}

/// A chemical or bait product. Inactive products stay visible on historical
/// records but cannot be selected for new usage rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDef {
    pub id: ProductDefId,
    pub supplier: String,
    pub trade_name: String,
    pub active_ingredient: String,
    pub packaging: String,
    pub antidote: String,
    pub active: bool,
}

impl ProductDef {
    /// Create a builder for constructing a [`ProductDef`].
    #[must_use]
    pub fn builder() -> ProductDefBuilder {
        ProductDefBuilder::default()
    }

    /// Whether this product may be chosen for a *new* usage row. Historical
    /// rows keep referencing inactive products.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.active
    }
}

/// Step-by-step builder for [`ProductDef`].
#[derive(Debug, Default)]
pub struct ProductDefBuilder {
    id: Option<ProductDefId>,
    supplier: Option<String>,
    trade_name: Option<String>,
    active_ingredient: Option<String>,
    packaging: Option<String>,
    antidote: Option<String>,
    active: Option<bool>,
}

impl ProductDefBuilder {
    #[must_use]
    pub fn id(mut self, id: ProductDefId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    #[must_use]
    pub fn trade_name(mut self, trade_name: impl Into<String>) -> Self {
        self.trade_name = Some(trade_name.into());
        self
    }

    #[must_use]
    pub fn active_ingredient(mut self, active_ingredient: impl Into<String>) -> Self {
        self.active_ingredient = Some(active_ingredient.into());
        self
    }

    #[must_use]
    pub fn packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = Some(packaging.into());
        self
    }

    #[must_use]
    pub fn antidote(mut self, antidote: impl Into<String>) -> Self {
        self.antidote = Some(antidote.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Consume the builder and return a [`ProductDef`].
    #[must_use]
    pub fn build(self) -> ProductDef {
        ProductDef {
            id: self.id.unwrap_or_default(),
            supplier: self.supplier.unwrap_or_default(),
            trade_name: self.trade_name.unwrap_or_default(),
            active_ingredient: self.active_ingredient.unwrap_or_default(),
            packaging: self.packaging.unwrap_or_default(),
            antidote: self.antidote.unwrap_or_default(),
            active: self.active.unwrap_or(true),
        }
    }
}
