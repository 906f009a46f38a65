use crate::models::{Category, CategoryId, SortConfig, SortKey};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Derive the top-level rows to display from the loaded collection.
///
/// Algorithm:
/// 1. Keep a top-level category when it, or one of its direct children,
///    matches the search term (case-insensitive, name or description)
/// 2. Stable sort of the survivors by `config`; children keep collection order
///
/// The result borrows from `categories`; nothing is cloned or reordered in place.
pub fn project<'a>(categories: &'a [Category], search_term: &str, config: &SortConfig) -> Vec<&'a Category> {
    let mut rows = filter_categories(categories, search_term);
    sort_categories(&mut rows, config);
    rows
}

/// Search filter over top-level categories. An empty term keeps everything.
///
/// Grandchildren are not looked at: a match two levels down does not keep
/// its top-level ancestor.
pub fn filter_categories<'a>(categories: &'a [Category], search_term: &str) -> Vec<&'a Category> {
    if search_term.is_empty() {
        return categories.iter().collect();
    }

    let needle = search_term.to_lowercase();
    categories
        .iter()
        .filter(|category| category.matches_lowercase(&needle) || has_matching_child(category, &needle))
        .collect()
}

/// Identifiers of top-level categories with at least one direct child
/// matching `search_term`. These are the rows a search opens automatically.
pub fn matching_parents(categories: &[Category], search_term: &str) -> HashSet<CategoryId> {
    if search_term.is_empty() {
        return HashSet::new();
    }

    let needle = search_term.to_lowercase();
    categories
        .iter()
        .filter(|category| has_matching_child(category, &needle))
        .map(|category| category.id.clone())
        .collect()
}

fn has_matching_child(category: &Category, needle: &str) -> bool {
    category.children.iter().any(|child| child.matches_lowercase(needle))
}

pub fn sort_categories(rows: &mut [&Category], config: &SortConfig) {
    rows.sort_by(|a, b| compare_categories(a, b, config));
}

/// Comparable projection of one sort column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Text(String),
    Flag(bool),
}

fn sort_value(category: &Category, key: SortKey) -> Option<SortValue> {
    match key {
        SortKey::Name => category.name.as_deref().map(|name| SortValue::Text(name.to_lowercase())),
        SortKey::Description => category
            .description
            .as_deref()
            .map(|description| SortValue::Text(description.to_lowercase())),
        SortKey::Status => category
            .status
            .map(|status| SortValue::Text(status.as_str().to_string())),
        SortKey::StockAvailability => category.stock_availability.map(SortValue::Flag),
    }
}

/// Three-way comparison for one sort config.
///
/// Missing values go last in both directions. Two missing values tie.
pub fn compare_categories(a: &Category, b: &Category, config: &SortConfig) -> Ordering {
    match (sort_value(a, config.key), sort_value(b, config.key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => config.direction.apply(left.cmp(&right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryStatus, SortDirection};

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: Some(name.to_string()),
            description: Some(String::new()),
            status: Some(CategoryStatus::Active),
            stock_availability: Some(true),
            parent_id: None,
            children: vec![],
        }
    }

    fn with_children(mut parent: Category, children: Vec<Category>) -> Category {
        parent.children = children;
        parent
    }

    fn ids(rows: &[&Category]) -> Vec<String> {
        rows.iter().map(|c| c.id.clone()).collect()
    }

    fn fruits_and_tools() -> Vec<Category> {
        vec![
            with_children(category("1", "Fruits"), vec![category("2", "Apples")]),
            category("3", "Tools"),
        ]
    }

    #[test]
    fn test_search_keeps_parent_of_matching_child() {
        let categories = fruits_and_tools();
        let rows = project(&categories, "appl", &SortConfig::default());
        assert_eq!(ids(&rows), vec!["1"]);

        let parents = matching_parents(&categories, "appl");
        assert!(parents.contains("1"));
        assert_eq!(parents.len(), 1);
    }

    #[test]
    fn test_search_matches_description_case_insensitive() {
        let mut tools = category("3", "Tools");
        tools.description = Some("Hammers and WRENCHES".to_string());
        let categories = vec![category("1", "Fruits"), tools];

        let rows = filter_categories(&categories, "wrench");
        assert_eq!(ids(&rows), vec!["3"]);
    }

    #[test]
    fn test_search_ignores_grandchildren() {
        let categories = vec![with_children(
            category("1", "Food"),
            vec![with_children(category("2", "Fruit"), vec![category("3", "Kiwi")])],
        )];

        assert!(filter_categories(&categories, "kiwi").is_empty());
        assert!(matching_parents(&categories, "kiwi").is_empty());
    }

    #[test]
    fn test_empty_search_is_sort_only() {
        let categories = vec![category("a", "Zeta"), category("b", "alpha"), category("c", "Mid")];
        let config = SortConfig::new(SortKey::Name, SortDirection::Ascending);

        let projected = project(&categories, "", &config);
        let mut sorted: Vec<&Category> = categories.iter().collect();
        sort_categories(&mut sorted, &config);

        assert_eq!(ids(&projected), ids(&sorted));
        assert_eq!(ids(&projected), vec!["b", "c", "a"]);
        assert!(matching_parents(&categories, "").is_empty());
    }

    #[test]
    fn test_projection_never_invents_or_duplicates() {
        let categories = vec![
            with_children(category("1", "Fruits"), vec![category("2", "Apples"), category("4", "Pears")]),
            category("3", "Apple tools"),
            category("5", "Garden"),
        ];

        for term in ["", "a", "apple", "pear", "zzz", "GARDEN"] {
            let rows = project(&categories, term, &SortConfig::default());
            let top_level: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
            let mut seen = HashSet::new();
            for row in &rows {
                assert!(top_level.contains(&row.id.as_str()), "unexpected row {} for {:?}", row.id, term);
                assert!(seen.insert(row.id.clone()), "duplicate row {} for {:?}", row.id, term);
            }
        }
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let categories = vec![category("1", "Banana"), category("2", "apple")];
        let rows = project(&categories, "", &SortConfig::new(SortKey::Name, SortDirection::Ascending));
        let names: Vec<&str> = rows.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["apple", "Banana"]);
    }

    #[test]
    fn test_stock_descending_puts_true_first_and_null_last() {
        let mut out = category("out", "Out");
        out.stock_availability = Some(false);
        let mut unknown = category("unknown", "Unknown");
        unknown.stock_availability = None;
        let in_stock = category("in", "In");

        let categories = vec![unknown, out, in_stock];
        let rows = project(&categories, "", &SortConfig::default());
        assert_eq!(ids(&rows), vec!["in", "out", "unknown"]);

        // Nulls stay last when ascending too
        let rows = project(
            &categories,
            "",
            &SortConfig::new(SortKey::StockAvailability, SortDirection::Ascending),
        );
        assert_eq!(ids(&rows), vec!["out", "in", "unknown"]);
    }

    #[test]
    fn test_null_name_sorts_last_both_directions() {
        let mut unnamed = category("nullname", "");
        unnamed.name = None;
        let categories = vec![unnamed, category("b", "Banana"), category("a", "apple")];

        let rows = project(&categories, "", &SortConfig::new(SortKey::Name, SortDirection::Ascending));
        assert_eq!(ids(&rows), vec!["a", "b", "nullname"]);

        let rows = project(&categories, "", &SortConfig::new(SortKey::Name, SortDirection::Descending));
        assert_eq!(ids(&rows), vec!["b", "a", "nullname"]);
    }

    #[test]
    fn test_null_description_sorts_after_empty_description() {
        let mut missing = category("missing", "Missing");
        missing.description = None;
        let mut blank = category("blank", "Blank");
        blank.description = Some(String::new());
        let mut hammers = category("hammers", "Hammers");
        hammers.description = Some("Hammers".to_string());
        let categories = vec![missing, hammers, blank];

        let rows = project(&categories, "", &SortConfig::new(SortKey::Description, SortDirection::Ascending));
        assert_eq!(ids(&rows), vec!["blank", "hammers", "missing"]);

        let rows = project(&categories, "", &SortConfig::new(SortKey::Description, SortDirection::Descending));
        assert_eq!(ids(&rows), vec!["hammers", "blank", "missing"]);

        // Null fields still take part in search without matching
        assert_eq!(ids(&filter_categories(&categories, "hamm")), vec!["hammers"]);
    }

    #[test]
    fn test_status_sort_and_ties_keep_order() {
        let mut inactive = category("i", "Inactive");
        inactive.status = Some(CategoryStatus::Inactive);
        let categories = vec![category("a1", "A"), inactive, category("a2", "B")];

        let rows = project(&categories, "", &SortConfig::new(SortKey::Status, SortDirection::Descending));
        assert_eq!(ids(&rows), vec!["i", "a1", "a2"]);

        let rows = project(&categories, "", &SortConfig::new(SortKey::Status, SortDirection::Ascending));
        assert_eq!(ids(&rows), vec!["a1", "a2", "i"]);
    }

    #[test]
    fn test_children_keep_collection_order() {
        let categories = vec![with_children(
            category("1", "Fruits"),
            vec![category("z", "Zucchini"), category("a", "Apricot")],
        )];

        let rows = project(&categories, "", &SortConfig::new(SortKey::Name, SortDirection::Ascending));
        let children: Vec<&str> = rows[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(children, vec!["z", "a"]);
    }
}
