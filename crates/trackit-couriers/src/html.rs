//! Small DOM helpers shared by the HTML couriers.
//!
//! Selectors are compiled once into `LazyLock` statics, next to the courier
//! that uses them.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::normalize::clean_text;

pub(crate) static TD: LazyLock<Selector> = LazyLock::new(|| selector("td"));
pub(crate) static TR: LazyLock<Selector> = LazyLock::new(|| selector("tr"));

/// Compiles a selector literal. Only called from static initializers.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Cleaned text content of an element and all its descendants.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// First element matching `selector` anywhere in the document.
pub(crate) fn find<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

/// First descendant of `element` matching `selector`.
pub(crate) fn find_in<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Direct child elements of `element`, in document order.
pub(crate) fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Cleaned text of every `td` cell in a row.
pub(crate) fn cell_texts(row: ElementRef<'_>) -> Vec<String> {
    row.select(&TD).map(text_of).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    static BOLD: LazyLock<Selector> = LazyLock::new(|| selector("b"));

    #[test]
    fn static_selectors_are_reused_across_documents() {
        let first = Html::parse_fragment("<table><tr><td> a </td><td>b</td></tr></table>");
        let second = Html::parse_fragment("<table><tr><td>c</td></tr></table>");

        let rows: Vec<Vec<String>> = [&first, &second]
            .into_iter()
            .flat_map(|doc| doc.select(&TR).map(cell_texts).collect::<Vec<_>>())
            .collect();
        assert_eq!(rows, vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
    }

    #[test]
    fn find_in_looks_only_below_the_element() {
        let doc = Html::parse_fragment("<p><b>outer</b></p><div><b>inner</b></div>");
        let div = find(&doc, &selector("div")).unwrap();
        assert_eq!(find_in(div, &BOLD).map(text_of).as_deref(), Some("inner"));
    }
}
