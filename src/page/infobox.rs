//! Label-driven lookups over an info box table.
//!
//! Every lookup fails soft: a missing row, cell or link gives an empty result.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::names::page_id_from_href;

static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Tags whose text never counts as a value (inline CSS, footnote markers).
const HIDDEN_TAGS: &[&str] = &["style", "script", "sup"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    Exact,
    Contains,
}

#[derive(Clone, Copy)]
pub struct Infobox<'a> {
    table: ElementRef<'a>,
}

impl<'a> Infobox<'a> {
    pub fn new(table: ElementRef<'a>) -> Self {
        Infobox { table }
    }

    pub fn element(&self) -> ElementRef<'a> {
        self.table
    }

    /// Text fragments of the value cell that start with a letter.
    pub fn values(&self, label: &str) -> Vec<String> {
        self.value_cell(label)
            .map(text_fragments)
            .unwrap_or_default()
            .into_iter()
            .filter(|t| t.chars().next().is_some_and(char::is_alphabetic))
            .collect()
    }

    pub fn first_value(&self, label: &str) -> Option<String> {
        self.values(label).into_iter().next()
    }

    /// Page identifier of the first article link in the value cell.
    pub fn link(&self, label: &str) -> Option<String> {
        self.links(label).into_iter().next()
    }

    /// Page identifiers of every article link in the value cell.
    pub fn links(&self, label: &str) -> Vec<String> {
        let Some(cell) = self.value_cell(label) else {
            return Vec::new();
        };
        cell.select(&LINK_SEL)
            .filter(|a| !is_hidden(*a, cell))
            .filter_map(|a| a.value().attr("href").and_then(page_id_from_href))
            .collect()
    }

    /// Value text of the row after the header row carrying `label`.
    ///
    /// Population and area are laid out as a header row ("Population")
    /// followed by a data row ("• 2023 estimate | 68,042,591").
    pub fn merged(&self, label: &str, how: LabelMatch) -> Vec<String> {
        let mut rows = self.rows();
        if !rows.any(|row| key_matches(row, label, how)) {
            return Vec::new();
        }
        rows.next()
            .and_then(|next| child(next, "td"))
            .map(text_fragments)
            .unwrap_or_default()
    }

    /// Readable text nodes of the value cell, in document order. Lines
    /// split by `<br>` or markup stay apart.
    pub fn fragments(&self, label: &str) -> Vec<String> {
        self.value_cell(label)
            .map(text_fragments)
            .unwrap_or_default()
    }

    /// All readable text of the value cell, space-joined.
    pub fn text(&self, label: &str) -> Option<String> {
        let fragments = self.fragments(label);
        (!fragments.is_empty()).then(|| fragments.join(" "))
    }

    pub fn value_cell(&self, label: &str) -> Option<ElementRef<'a>> {
        self.rows()
            .filter(|row| key_matches(*row, label, LabelMatch::Exact))
            .find_map(|row| child(row, "td"))
    }

    /// Direct rows of the table, looking through `tbody`.
    fn rows(&self) -> impl Iterator<Item = ElementRef<'a>> {
        self.table
            .children()
            .filter_map(ElementRef::wrap)
            .flat_map(|el| {
                let nested: Vec<ElementRef<'a>> = if el.value().name() == "tbody" {
                    el.children().filter_map(ElementRef::wrap).collect()
                } else {
                    vec![el]
                };
                nested
            })
            .filter(|el| el.value().name() == "tr")
    }
}

fn child<'a>(row: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)
}

fn key_matches(row: ElementRef<'_>, label: &str, how: LabelMatch) -> bool {
    let Some(th) = child(row, "th") else {
        return false;
    };
    let fragments = text_fragments(th);
    let nodes = fragments.iter().map(|f| clean_key(f));
    let joined = clean_key(&fragments.join(" "));
    match how {
        LabelMatch::Exact => joined == label || nodes.into_iter().any(|n| n == label),
        LabelMatch::Contains => joined.contains(label),
    }
}

/// "•\u{a0}President" → "President".
fn clean_key(text: &str) -> String {
    text.trim_start_matches(|c: char| c == '•' || c == '·' || c.is_whitespace())
        .trim()
        .to_string()
}

/// Trimmed, non-blank text nodes under `cell`, skipping hidden tags.
fn text_fragments(cell: ElementRef<'_>) -> Vec<String> {
    cell.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .take_while(|a| a.id() != cell.id())
                .any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
                });
            let trimmed = text.trim();
            (!hidden && !trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

fn is_hidden(el: ElementRef<'_>, cell: ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|a| a.id() != cell.id())
        .any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
        })
}
