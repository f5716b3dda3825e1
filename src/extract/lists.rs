use crate::extract::{element_text, selector};
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

/// Extracts unordered and ordered lists
///
/// Each `<ul>` / `<ol>` that has at least one direct `<li>` child is returned
/// under `list_ul_{i}` / `list_ol_{i}`, where `i` is the element's position
/// among all elements of the same tag in document order.
pub fn extract_lists(document: &Html) -> BTreeMap<String, Vec<String>> {
    let mut lists = BTreeMap::new();

    for tag in ["ul", "ol"] {
        let Some(sel) = selector(tag) else {
            continue;
        };

        for (index, list) in document.select(&sel).enumerate() {
            let items = direct_items(list);
            if !items.is_empty() {
                lists.insert(format!("list_{}_{}", tag, index), items);
            }
        }
    }

    lists
}

fn direct_items(list: ElementRef<'_>) -> Vec<String> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .map(|li| element_text(li, " "))
        .collect()
}
