//! Client-side product checks, run before any network call.

use crate::types::ProductDraft;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Problems with a product about to be created. Empty means valid.
pub fn validate_product(draft: &ProductDraft) -> Vec<String> {
    let mut problems = Vec::new();
    if draft.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        problems.push("Title is required".to_string());
    }
    check_fields(draft, &mut problems);
    problems
}

/// Problems with a partial update. Absent fields are not checked, but a
/// title that is present must not be blank.
pub fn validate_product_changes(draft: &ProductDraft) -> Vec<String> {
    let mut problems = Vec::new();
    if draft.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        problems.push("Title is required".to_string());
    }
    check_fields(draft, &mut problems);
    problems
}

fn check_fields(draft: &ProductDraft, problems: &mut Vec<String>) {
    if let Some(price) = draft.price {
        if !price.is_finite() || price <= 0.0 {
            problems.push("Price must be a positive number".to_string());
        }
    }
    if let Some(title) = &draft.title {
        if title.chars().count() > TITLE_MAX_CHARS {
            problems.push("Title must be less than 100 characters".to_string());
        }
    }
    if let Some(description) = &draft.description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            problems.push("Description must be less than 1000 characters".to_string());
        }
    }
}
