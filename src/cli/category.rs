//! Category CLI commands

use clap::Subcommand;

use super::parse_category_kind;
use crate::display::format_category_tree;
use crate::error::{WalletError, WalletResult};
use crate::models::{Category, CategoryKind, SubcategoryId, UserId};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a category
    Create {
        /// Category name
        name: String,
        /// Kind of records filed under it (expense, income)
        #[arg(short, long, default_value = "expense", value_parser = parse_category_kind)]
        kind: CategoryKind,
    },
    /// Add a subcategory to a category
    AddSub {
        /// Category name or ID
        category: String,
        /// Subcategory name
        name: String,
    },
    /// Remove a subcategory from a category
    RemoveSub {
        /// Category name or ID
        category: String,
        /// Subcategory ID
        subcategory: String,
    },
    /// List categories with their subcategories
    List {
        /// Only show one kind (expense, income)
        #[arg(short, long, value_parser = parse_category_kind)]
        kind: Option<CategoryKind>,
    },
    /// Delete a category
    Delete {
        /// Category name or ID
        category: String,
    },
}

fn resolve(
    service: &CategoryService<'_>,
    user: &UserId,
    identifier: &str,
) -> WalletResult<Category> {
    service
        .find_category(user, identifier)?
        .ok_or_else(|| WalletError::category_not_found(identifier))
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    user: &UserId,
    cmd: CategoryCommands,
) -> WalletResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Create { name, kind } => {
            let category = service.create_category(user.as_str(), &name, kind)?;
            println!("Created {} category: {}", kind, category.name());
            println!("  ID: {}", category.id());
        }

        CategoryCommands::AddSub { category, name } => {
            let category = resolve(&service, user, &category)?;
            let subcategory = service.add_subcategory(category.id(), &name)?;
            println!("Added subcategory {} to {}", subcategory.name, category.name());
            println!("  ID: {}", subcategory.id);
        }

        CategoryCommands::RemoveSub {
            category,
            subcategory,
        } => {
            let category = resolve(&service, user, &category)?;
            service.remove_subcategory(category.id(), &SubcategoryId::new(subcategory.as_str()))?;
            println!("Removed subcategory {} from {}", subcategory, category.name());
        }

        CategoryCommands::List { kind } => {
            let categories = service.list_categories(user, kind)?;
            print!("{}", format_category_tree(&categories));
        }

        CategoryCommands::Delete { category } => {
            let category = resolve(&service, user, &category)?;
            let deleted = service.delete_category(category.id())?;
            println!("Deleted category: {}", deleted.name());
        }
    }

    Ok(())
}
