//! Store-backed category repository

use std::sync::Arc;

use tracing::debug;

use crate::error::{WalletError, WalletResult};
use crate::mapper::{AggregateMapper, CategoryData, CategoryMapper};
use crate::models::{Category, CategoryId, CategoryKind, Subcategory, SubcategoryId, UserId};
use crate::storage::{AggregateStore, Criteria, InMemoryStore, QueryAggregateStore, RecordStore};

use super::CategoryRepository;

pub struct StoreCategoryRepository {
    categories: Arc<dyn RecordStore<CategoryData>>,
}

impl StoreCategoryRepository {
    pub fn new(categories: Arc<dyn RecordStore<CategoryData>>) -> Self {
        Self { categories }
    }

    /// Repository over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::<CategoryData>::new("categories")))
    }

    fn find_by(&self, criteria: &Criteria) -> WalletResult<Vec<Category>> {
        let mut categories = self
            .categories
            .find_by(criteria)?
            .into_iter()
            .map(|d| CategoryMapper.to_domain(d))
            .collect::<WalletResult<Vec<_>>>()?;
        categories.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(categories)
    }
}

impl CategoryRepository for StoreCategoryRepository {
    fn save(&self, category: &Category) -> WalletResult<()> {
        self.categories.save(&CategoryMapper.to_data(category))?;
        debug!(category = %category.id(), "saved category");
        Ok(())
    }

    fn find_by_id(&self, id: CategoryId) -> WalletResult<Option<Category>> {
        self.categories
            .find_by_id(&id.key())?
            .map(|d| CategoryMapper.to_domain(d))
            .transpose()
    }

    fn find_by_user_id(&self, user_id: &UserId) -> WalletResult<Vec<Category>> {
        self.find_by(&Criteria::new().eq("user_id", user_id.as_str()))
    }

    fn delete(&self, id: CategoryId) -> WalletResult<()> {
        self.categories.delete(&id.key())
    }

    fn resolve_subcategory(
        &self,
        user_id: &UserId,
        subcategory_id: &SubcategoryId,
        kind: CategoryKind,
    ) -> WalletResult<(Category, Subcategory)> {
        let candidates = self.find_by(
            &Criteria::new()
                .eq("user_id", user_id.as_str())
                .eq("kind", kind.as_str()),
        )?;

        for category in candidates {
            if let Some(subcategory) = category.find_subcategory(subcategory_id).cloned() {
                return Ok((category, subcategory));
            }
        }
        Err(WalletError::subcategory_not_found(subcategory_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (StoreCategoryRepository, Category, Subcategory) {
        let repo = StoreCategoryRepository::in_memory();
        let mut food = Category::new("user-1", "Food", CategoryKind::Expense).unwrap();
        let coffee = food.add_subcategory("Coffee").unwrap();
        repo.save(&food).unwrap();

        let mut salary = Category::new("user-1", "Salary", CategoryKind::Income).unwrap();
        salary.add_subcategory("Base").unwrap();
        repo.save(&salary).unwrap();

        (repo, food, coffee)
    }

    #[test]
    fn test_resolve_subcategory() {
        let (repo, food, coffee) = seeded();
        let (category, subcategory) = repo
            .resolve_subcategory(&UserId::from("user-1"), &coffee.id, CategoryKind::Expense)
            .unwrap();
        assert_eq!(category.id(), food.id());
        assert_eq!(subcategory, coffee);
    }

    #[test]
    fn test_resolve_wrong_kind_or_user() {
        let (repo, _food, coffee) = seeded();

        let err = repo
            .resolve_subcategory(&UserId::from("user-1"), &coffee.id, CategoryKind::Income)
            .unwrap_err();
        assert!(err.is_not_found_for("Subcategory"));

        let err = repo
            .resolve_subcategory(&UserId::from("user-2"), &coffee.id, CategoryKind::Expense)
            .unwrap_err();
        assert!(err.is_not_found_for("Subcategory"));
    }

    #[test]
    fn test_find_and_delete() {
        let (repo, food, _coffee) = seeded();
        let names: Vec<_> = repo
            .find_by_user_id(&UserId::from("user-1"))
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["Food", "Salary"]);

        repo.delete(food.id()).unwrap();
        repo.delete(food.id()).unwrap();
        assert!(repo.find_by_id(food.id()).unwrap().is_none());
    }
}
