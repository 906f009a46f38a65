use crate::models::CategoryId;
use std::fmt;

/// Screens of the admin client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    AddCategory,
    EditCategory(CategoryId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::AddCategory => "/add-category".to_string(),
            Route::EditCategory(id) => format!("/edit-category/{}", id),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Some(Route::List),
            "/add-category" => Some(Route::AddCategory),
            _ => {
                let id = trimmed.strip_prefix("/edit-category/")?;
                if id.is_empty() || id.contains('/') {
                    None
                } else {
                    Some(Route::EditCategory(id.to_string()))
                }
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Some(Route::List));
        assert_eq!(Route::parse("/add-category"), Some(Route::AddCategory));
        assert_eq!(
            Route::parse("/edit-category/65a1f"),
            Some(Route::EditCategory("65a1f".to_string()))
        );
        assert_eq!(Route::parse("/edit-category/"), None);
        assert_eq!(Route::parse("/edit-category/a/b"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn test_path_round_trips_through_parse() {
        for route in [
            Route::List,
            Route::AddCategory,
            Route::EditCategory("abc".to_string()),
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }
}
