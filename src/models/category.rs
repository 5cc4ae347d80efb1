//! Category and Subcategory models
//!
//! Categories belong to a user and classify either expenses or income.
//! Transactions are tagged with a subcategory; its owning category is found
//! through the category repository.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::ids::{CategoryId, SubcategoryId, UserId};
use crate::error::{WalletError, WalletResult};

/// Which kind of transaction a category classifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    /// Parse a category kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// A leaf of the category tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
}

impl Subcategory {
    pub fn new(id: impl Into<SubcategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A user's expense or income category with its subcategories
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    id: CategoryId,
    user_id: UserId,
    name: String,
    kind: CategoryKind,
    subcategories: Vec<Subcategory>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category without subcategories
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        kind: CategoryKind,
    ) -> WalletResult<Self> {
        let user_id = UserId::new(user_id);
        if user_id.is_empty() {
            return Err(WalletError::InvalidUserId);
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WalletError::InvalidName);
        }

        let now = Utc::now();
        Ok(Self {
            id: CategoryId::new(),
            user_id,
            name,
            kind,
            subcategories: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a category from persisted state
    pub(crate) fn restore(
        id: CategoryId,
        user_id: UserId,
        name: String,
        kind: CategoryKind,
        subcategories: Vec<Subcategory>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            kind,
            subcategories,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub fn subcategories(&self) -> &[Subcategory] {
        &self.subcategories
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Add a subcategory with a generated ID
    pub fn add_subcategory(&mut self, name: impl Into<String>) -> WalletResult<Subcategory> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WalletError::InvalidName);
        }
        let subcategory = Subcategory::new(SubcategoryId::generate(), name);
        self.subcategories.push(subcategory.clone());
        self.updated_at = Utc::now();
        Ok(subcategory)
    }

    /// Look up one of this category's subcategories
    pub fn find_subcategory(&self, id: &SubcategoryId) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| &s.id == id)
    }

    /// Remove a subcategory, returning whether it existed
    pub fn remove_subcategory(&mut self, id: &SubcategoryId) -> bool {
        let before = self.subcategories.len();
        self.subcategories.retain(|s| &s.id != id);
        let removed = self.subcategories.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
