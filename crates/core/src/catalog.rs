//! Menu display list: text filtering and category grouping.
//!
//! The display list is rebuilt from scratch whenever the menu or the search
//! query changes; there is no incremental update.

use serde::{Deserialize, Serialize};

use crate::types::MenuItem;

/// One row of the grouped menu display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuEntry {
    /// Category header preceding its items.
    Header { category: String },
    /// A menu item belonging to the most recent header.
    Item { item: MenuItem },
}

/// A category and its matching items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuGroup {
    /// Category name.
    pub category: String,
    /// Items in storage order.
    pub items: Vec<MenuItem>,
}

/// Whether `item` matches a case-insensitive name query.
///
/// An empty query matches everything.
#[must_use]
pub fn matches_query(item: &MenuItem, query: &str) -> bool {
    query.is_empty() || item.name.to_lowercase().contains(&query.to_lowercase())
}

/// Filter `items` by `query` and group them by category.
///
/// Categories appear in the order they are first seen in `items`; within a
/// category, items keep their order from `items`.
#[must_use]
pub fn group_by_category(items: &[MenuItem], query: &str) -> Vec<MenuGroup> {
    let mut groups: Vec<MenuGroup> = Vec::new();
    for item in items.iter().filter(|item| matches_query(item, query)) {
        match groups.iter_mut().find(|g| g.category == item.category) {
            Some(group) => group.items.push(item.clone()),
            None => groups.push(MenuGroup {
                category: item.category.clone(),
                items: vec![item.clone()],
            }),
        }
    }
    groups
}

/// Build the flat display list: each category header followed by its items.
#[must_use]
pub fn group_menu(items: &[MenuItem], query: &str) -> Vec<MenuEntry> {
    group_by_category(items, query)
        .into_iter()
        .flat_map(|group| {
            std::iter::once(MenuEntry::Header {
                category: group.category,
            })
            .chain(group.items.into_iter().map(|item| MenuEntry::Item { item }))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{MenuItemId, Price};

    fn item(id: i32, name: &str, category: &str) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: name.to_owned(),
            price: Price::parse("10").unwrap(),
            category: category.to_owned(),
        }
    }

    fn sample() -> Vec<MenuItem> {
        vec![
            item(1, "Tea", "Drinks"),
            item(2, "Coffee", "Drinks"),
            item(3, "Cake", "Bakery"),
        ]
    }

    fn names(group: &MenuGroup) -> Vec<&str> {
        group.items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_keeps_every_group() {
        let groups = group_by_category(&sample(), "");
        assert_eq!(groups.len(), 2);

        let drinks = groups.iter().find(|g| g.category == "Drinks").unwrap();
        let bakery = groups.iter().find(|g| g.category == "Bakery").unwrap();
        assert_eq!(names(drinks), ["Tea", "Coffee"]);
        assert_eq!(names(bakery), ["Cake"]);
    }

    #[test]
    fn test_query_filters_case_insensitively() {
        let groups = group_by_category(&sample(), "cof");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, "Drinks");
        assert_eq!(names(&groups[0]), ["Coffee"]);

        let upper = group_by_category(&sample(), "COF");
        assert_eq!(upper, groups);
    }

    #[test]
    fn test_query_without_matches_is_empty() {
        assert!(group_menu(&sample(), "pizza").is_empty());
    }

    #[test]
    fn test_flat_list_puts_header_before_items() {
        let entries = group_menu(&sample(), "");
        assert_eq!(entries.len(), 5);
        assert_eq!(
            entries[0],
            MenuEntry::Header {
                category: "Drinks".to_owned()
            }
        );
        assert!(matches!(&entries[1], MenuEntry::Item { item } if item.name == "Tea"));
        assert!(matches!(&entries[2], MenuEntry::Item { item } if item.name == "Coffee"));
        assert_eq!(
            entries[3],
            MenuEntry::Header {
                category: "Bakery".to_owned()
            }
        );
        assert!(matches!(&entries[4], MenuEntry::Item { item } if item.name == "Cake"));
    }

    #[test]
    fn test_interleaved_categories_are_merged() {
        let items = vec![
            item(1, "Brownie", "Bakery"),
            item(2, "Chai", "Drinks"),
            item(3, "Croissant", "Bakery"),
        ];
        let groups = group_by_category(&items, "");
        assert_eq!(groups.len(), 2);
        assert_eq!(names(&groups[0]), ["Brownie", "Croissant"]);
        assert_eq!(names(&groups[1]), ["Chai"]);
    }

    #[test]
    fn test_empty_menu() {
        assert!(group_menu(&[], "").is_empty());
    }
}
