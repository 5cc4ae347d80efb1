//! Category record and mapper

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{parse_id, AggregateMapper};
use crate::error::{WalletError, WalletResult};
use crate::models::{Category, CategoryId, CategoryKind, Subcategory, UserId};
use crate::storage::AggregateData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryData {
    pub id: String,
    pub name: String,
}

/// Stored form of a category; subcategories are nested, not separate records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryData {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AggregateData for CategoryData {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryMapper;

impl AggregateMapper for CategoryMapper {
    type Domain = Category;
    type Data = CategoryData;

    fn to_data(&self, category: &Category) -> CategoryData {
        CategoryData {
            id: category.id().key(),
            user_id: category.user_id().to_string(),
            name: category.name().to_string(),
            kind: category.kind().as_str().to_string(),
            subcategories: category
                .subcategories()
                .iter()
                .map(|s| SubcategoryData {
                    id: s.id.to_string(),
                    name: s.name.clone(),
                })
                .collect(),
            created_at: category.created_at(),
            updated_at: category.updated_at(),
        }
    }

    fn to_domain(&self, data: CategoryData) -> WalletResult<Category> {
        let id: CategoryId = parse_id("category id", &data.id)?;
        let kind = CategoryKind::parse(&data.kind)
            .ok_or_else(|| WalletError::Mapping(format!("unknown category kind '{}'", data.kind)))?;
        let subcategories = data
            .subcategories
            .into_iter()
            .map(|s| {
                if s.id.trim().is_empty() {
                    Err(WalletError::Mapping(format!(
                        "category {} has a subcategory without an id",
                        data.id
                    )))
                } else {
                    Ok(Subcategory::new(s.id, s.name))
                }
            })
            .collect::<WalletResult<Vec<_>>>()?;

        Ok(Category::restore(
            id,
            UserId::new(data.user_id),
            data.name,
            kind,
            subcategories,
            data.created_at,
            data.updated_at,
        ))
    }
}
