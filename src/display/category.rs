//! Category display formatting

use crate::models::Category;

/// Format categories as a tree, one subcategory per branch
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nCreate one with 'wallet category create'.\n".to_string();
    }

    let mut output = String::new();
    for (i, category) in categories.iter().enumerate() {
        output.push_str(&format!(
            "{} [{}] ({})\n",
            category.name(),
            category.kind(),
            category.id()
        ));

        let subcategories = category.subcategories();
        if subcategories.is_empty() {
            output.push_str("  (no subcategories)\n");
        }
        for (j, sub) in subcategories.iter().enumerate() {
            let prefix = if j + 1 == subcategories.len() {
                "└── "
            } else {
                "├── "
            };
            output.push_str(&format!("  {}{}  {}\n", prefix, sub.name, sub.id));
        }

        if i + 1 < categories.len() {
            output.push('\n');
        }
    }
    output
}
