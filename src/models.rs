use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub type CategoryId = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    #[default]
    Active,
    Inactive,
}

impl CategoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryStatus::Active => "active",
            CategoryStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(CategoryStatus::Active),
            "inactive" => Ok(CategoryStatus::Inactive),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// A node of the catalog as returned by the category API.
///
/// Children are full records nested in place; only the levels the backend
/// materializes are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: CategoryId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<CategoryStatus>,
    #[serde(default)]
    pub stock_availability: Option<bool>,
    #[serde(rename = "parentId", alias = "parent", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Category>,
}

impl Category {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Case-insensitive substring match on name or description.
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name().to_lowercase().contains(needle) || self.description().to_lowercase().contains(needle)
    }

    pub fn stock_label(&self) -> &'static str {
        if self.stock_availability.unwrap_or(false) {
            "In Stock"
        } else {
            "Out of Stock"
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Description,
    Status,
    StockAvailability,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Name,
        SortKey::Description,
        SortKey::Status,
        SortKey::StockAvailability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Description => "description",
            SortKey::Status => "status",
            SortKey::StockAvailability => "stock_availability",
        }
    }

    /// Column heading used by the table renderer.
    pub fn heading(&self) -> &'static str {
        match self {
            SortKey::Name => "NAME",
            SortKey::Description => "DESCRIPTION",
            SortKey::Status => "STATUS",
            SortKey::StockAvailability => "STOCK",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "description" => Ok(SortKey::Description),
            "status" => Ok(SortKey::Status),
            "stock" | "stock_availability" => Ok(SortKey::StockAvailability),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Orient an ascending three-way comparison.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::StockAvailability,
            direction: SortDirection::Descending,
        }
    }
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Config after the user clicks the `key` column.
    ///
    /// Only an ascending sort on the same key flips to descending; anything
    /// else starts over at ascending.
    pub fn clicked(&self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }

    pub fn indicator(&self, key: SortKey) -> &'static str {
        if self.key != key {
            return "↕";
        }
        match self.direction {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Standard `{ data: ... }` response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
}

/// Error body some endpoints send alongside a failure status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of create and update requests.
///
/// `parent_id` is left out of the JSON entirely when unset, so the backend
/// cannot tell "no parent" from "parent unchanged".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub description: String,
    pub status: CategoryStatus,
    pub stock_availability: bool,
    #[serde(rename = "parentId", skip_serializing_if = "Option::is_none", default)]
    pub parent_id: Option<CategoryId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteManyRequest {
    #[serde(rename = "categoryIds")]
    pub category_ids: Vec<CategoryId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_api_json() {
        let json = r#"{
            "_id": "65a1",
            "name": "Fruits",
            "description": null,
            "status": "active",
            "stock_availability": true,
            "children": [
                {"_id": "65a2", "name": "Apples", "description": "Red", "parentId": "65a1"}
            ]
        }"#;

        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.id, "65a1");
        assert_eq!(category.name(), "Fruits");
        assert_eq!(category.description, None);
        assert_eq!(category.description(), "");
        assert_eq!(category.status, Some(CategoryStatus::Active));
        assert_eq!(category.stock_availability, Some(true));
        assert!(category.has_children());

        let child = &category.children[0];
        assert_eq!(child.parent_id.as_deref(), Some("65a1"));
        assert_eq!(child.stock_availability, None);
        assert!(!child.has_children());
    }

    #[test]
    fn test_matches_lowercase() {
        let category: Category =
            serde_json::from_str(r#"{"_id": "1", "name": "Garden Tools", "description": "Shovels"}"#).unwrap();

        assert!(category.matches_lowercase("tools"));
        assert!(category.matches_lowercase("shov"));
        assert!(!category.matches_lowercase("fruit"));
    }

    #[test]
    fn test_null_fields_never_match() {
        let category: Category =
            serde_json::from_str(r#"{"_id": "1", "name": null, "description": null}"#).unwrap();

        assert_eq!(category.name, None);
        assert!(category.matches_lowercase(""));
        assert!(!category.matches_lowercase("null"));
    }

    #[test]
    fn test_payload_omits_unset_parent() {
        let payload = CategoryPayload {
            name: "Tools".to_string(),
            description: "Hand tools".to_string(),
            status: CategoryStatus::Inactive,
            stock_availability: false,
            parent_id: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("parentId").is_none());
        assert_eq!(value["status"], "inactive");

        let with_parent = CategoryPayload {
            parent_id: Some("p1".to_string()),
            ..payload
        };
        let value = serde_json::to_value(&with_parent).unwrap();
        assert_eq!(value["parentId"], "p1");
    }

    #[test]
    fn test_delete_many_body_shape() {
        let body = DeleteManyRequest {
            category_ids: vec!["a".to_string(), "b".to_string()],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({"categoryIds": ["a", "b"]}));
    }

    #[test]
    fn test_sort_click_cycle() {
        let config = SortConfig::default();
        assert_eq!(config.key, SortKey::StockAvailability);
        assert_eq!(config.direction, SortDirection::Descending);

        // Descending on the same key goes back to ascending
        let config = config.clicked(SortKey::StockAvailability);
        assert_eq!(config.direction, SortDirection::Ascending);

        let config = config.clicked(SortKey::StockAvailability);
        assert_eq!(config.direction, SortDirection::Descending);

        let config = config.clicked(SortKey::Name);
        assert_eq!(config, SortConfig::new(SortKey::Name, SortDirection::Ascending));
    }

    #[test]
    fn test_sort_indicator() {
        let config = SortConfig::new(SortKey::Name, SortDirection::Ascending);
        assert_eq!(config.indicator(SortKey::Name), "↑");
        assert_eq!(config.indicator(SortKey::Status), "↕");
        assert_eq!(config.clicked(SortKey::Name).indicator(SortKey::Name), "↓");
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("stock".parse::<SortKey>().unwrap(), SortKey::StockAvailability);
        assert_eq!("Name".parse::<SortKey>().unwrap(), SortKey::Name);
        assert!("price".parse::<SortKey>().is_err());
    }
}
