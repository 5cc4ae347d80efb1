//! Category service
//!
//! Creating categories and their subcategories for a user. Wallet mutations
//! only ever look categories up; this is where they come from.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{WalletError, WalletResult};
use crate::models::{Category, CategoryId, CategoryKind, Subcategory, SubcategoryId, UserId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create_category(
        &self,
        user_id: &str,
        name: &str,
        kind: CategoryKind,
    ) -> WalletResult<Category> {
        let category = Category::new(user_id, name.trim(), kind)?;
        self.storage.categories.save(&category)?;

        self.storage.log_create(
            EntityType::Category,
            category.id().key(),
            Some(category.name().to_string()),
            &category,
        );
        info!(category = %category.id(), kind = %kind, "created category");
        Ok(category)
    }

    pub fn get_category(&self, id: CategoryId) -> WalletResult<Category> {
        self.storage
            .categories
            .find_by_id(id)?
            .ok_or_else(|| WalletError::category_not_found(id.key()))
    }

    /// The user's categories, optionally restricted to one kind
    pub fn list_categories(
        &self,
        user_id: &UserId,
        kind: Option<CategoryKind>,
    ) -> WalletResult<Vec<Category>> {
        let mut categories = self.storage.categories.find_by_user_id(user_id)?;
        if let Some(kind) = kind {
            categories.retain(|c| c.kind() == kind);
        }
        Ok(categories)
    }

    /// Find one of the user's categories by name (case-insensitive) or ID
    pub fn find_category(
        &self,
        user_id: &UserId,
        identifier: &str,
    ) -> WalletResult<Option<Category>> {
        let identifier = identifier.trim();
        let categories = self.list_categories(user_id, None)?;

        if let Some(category) = categories
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(category.clone()));
        }

        Ok(categories.into_iter().find(|c| {
            c.id().to_string() == identifier
                || identifier
                    .parse::<CategoryId>()
                    .map(|id| id == c.id())
                    .unwrap_or(false)
        }))
    }

    /// Add a subcategory under an existing category
    pub fn add_subcategory(
        &self,
        category_id: CategoryId,
        name: &str,
    ) -> WalletResult<Subcategory> {
        let before = self.get_category(category_id)?;
        let mut category = before.clone();
        let subcategory = category.add_subcategory(name.trim())?;
        self.storage.categories.save(&category)?;

        self.storage.log_update(
            EntityType::Category,
            category_id.key(),
            Some(category.name().to_string()),
            &before,
            &category,
            Some(format!("added subcategory {}", subcategory.name)),
        );
        info!(category = %category_id, subcategory = %subcategory.id, "added subcategory");
        Ok(subcategory)
    }

    /// Remove a subcategory; records already filed under it keep its ID
    pub fn remove_subcategory(
        &self,
        category_id: CategoryId,
        subcategory_id: &SubcategoryId,
    ) -> WalletResult<Category> {
        let before = self.get_category(category_id)?;
        let mut category = before.clone();
        if !category.remove_subcategory(subcategory_id) {
            return Err(WalletError::subcategory_not_found(subcategory_id.as_str()));
        }
        self.storage.categories.save(&category)?;

        self.storage.log_update(
            EntityType::Category,
            category_id.key(),
            Some(category.name().to_string()),
            &before,
            &category,
            Some(format!("removed subcategory {}", subcategory_id)),
        );
        Ok(category)
    }

    pub fn delete_category(&self, category_id: CategoryId) -> WalletResult<Category> {
        let category = self.get_category(category_id)?;
        self.storage.categories.delete(category_id)?;
        self.storage.log_delete(
            EntityType::Category,
            category_id.key(),
            Some(category.name().to_string()),
            &category,
        );
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_add_subcategories() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);

        let food = service
            .create_category("user-1", "Food", CategoryKind::Expense)
            .unwrap();
        let coffee = service.add_subcategory(food.id(), "Coffee").unwrap();

        let loaded = service.get_category(food.id()).unwrap();
        assert_eq!(loaded.subcategories(), &[coffee.clone()]);

        let (owner, found) = storage
            .categories
            .resolve_subcategory(&UserId::from("user-1"), &coffee.id, CategoryKind::Expense)
            .unwrap();
        assert_eq!(owner.id(), food.id());
        assert_eq!(found.name, "Coffee");
    }

    #[test]
    fn test_list_by_kind_and_find() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        let user = UserId::from("user-1");
        service
            .create_category("user-1", "Food", CategoryKind::Expense)
            .unwrap();
        let salary = service
            .create_category("user-1", "Salary", CategoryKind::Income)
            .unwrap();

        assert_eq!(service.list_categories(&user, None).unwrap().len(), 2);
        let income = service
            .list_categories(&user, Some(CategoryKind::Income))
            .unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name(), "Salary");

        let found = service.find_category(&user, "SALARY").unwrap().unwrap();
        assert_eq!(found.id(), salary.id());
        let found = service
            .find_category(&user, &salary.id().to_string())
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), salary.id());
    }

    #[test]
    fn test_remove_and_delete() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        let food = service
            .create_category("user-1", "Food", CategoryKind::Expense)
            .unwrap();
        let coffee = service.add_subcategory(food.id(), "Coffee").unwrap();

        service.remove_subcategory(food.id(), &coffee.id).unwrap();
        assert!(service
            .remove_subcategory(food.id(), &coffee.id)
            .unwrap_err()
            .is_not_found_for("Subcategory"));

        service.delete_category(food.id()).unwrap();
        assert!(service
            .get_category(food.id())
            .unwrap_err()
            .is_not_found_for("Category"));
    }

    #[test]
    fn test_add_subcategory_to_missing_category() {
        let storage = Storage::in_memory();
        let service = CategoryService::new(&storage);
        let err = service.add_subcategory(CategoryId::new(), "Coffee").unwrap_err();
        assert!(err.is_not_found_for("Category"));
    }
}
