use std::collections::HashSet;

use super::types::Catalog;

/// Validate a catalog at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(catalog: &Catalog) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if catalog.categories.is_empty() {
        errors.push("catalog.categories: at least one category is required".to_string());
    }

    let mut keys = HashSet::new();
    for (i, category) in catalog.categories.iter().enumerate() {
        if category.key.trim().is_empty() {
            errors.push(format!("catalog.categories[{}].key: must not be empty", i));
        } else if !keys.insert(category.key.as_str()) {
            errors.push(format!(
                "catalog.categories[{}].key: duplicate key '{}'",
                i, category.key
            ));
        }
    }

    if !keys.contains(catalog.fallback.as_str()) {
        errors.push(format!(
            "catalog.fallback: '{}' is not a known category",
            catalog.fallback
        ));
    }

    if catalog.questions.is_empty() {
        errors.push("catalog.questions: at least one question is required".to_string());
    }

    let mut question_ids = HashSet::new();
    for (i, question) in catalog.questions.iter().enumerate() {
        if !question_ids.insert(question.id) {
            errors.push(format!(
                "catalog.questions[{}].id: duplicate id {}",
                i, question.id
            ));
        }

        if question.options.is_empty() {
            errors.push(format!(
                "catalog.questions[{}].options: question {} has no options",
                i, question.id
            ));
        }

        let mut option_ids = HashSet::new();
        for (j, option) in question.options.iter().enumerate() {
            if !option_ids.insert(option.id.as_str()) {
                errors.push(format!(
                    "catalog.questions[{}].options[{}].id: duplicate id '{}'",
                    i, j, option.id
                ));
            }

            for key in option.weights.keys() {
                if !keys.contains(key.as_str()) {
                    errors.push(format!(
                        "catalog.questions[{}].options[{}].weights: unknown category '{}'",
                        i, j, key
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
