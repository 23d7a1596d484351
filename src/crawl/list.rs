use scraper::ElementRef;

use super::{CountryMeta, CrawlState, PageKind};
use crate::error::HandlerError;
use crate::names::{page_id_from_href, resolve_href, wiki_page_url};
use crate::page::Page;

/// Seed page: one country task per row of the first data table, taken from
/// the first article link in the row's first cell. Returns how many were queued.
pub fn handle(page: &Page, url: &str, state: &mut CrawlState) -> Result<usize, HandlerError> {
    let table = page.wikitable().ok_or_else(|| HandlerError::NoCountryTable {
        url: url.to_string(),
    })?;

    let mut queued = 0;
    for row in table.descendants().filter_map(ElementRef::wrap) {
        if row.value().name() != "tr" {
            continue;
        }
        let Some((name, href)) = first_cell_link(row) else {
            continue;
        };
        let target = match &href {
            Some(h) => resolve_href(&state.wiki_base, h),
            None => wiki_page_url(&state.wiki_base, &name),
        };
        let meta = CountryMeta {
            name,
            source_link: href,
        };
        if state.frontier.enqueue(target, PageKind::Country(meta)) {
            queued += 1;
        }
    }
    Ok(queued)
}

/// (display name, article href) from the first `td` of a row.
fn first_cell_link(row: ElementRef<'_>) -> Option<(String, Option<String>)> {
    let cell = row
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "td")?;
    let link = cell
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value().name() == "a"
                && el
                    .value()
                    .attr("href")
                    .and_then(page_id_from_href)
                    .is_some()
        })?;

    let name = link
        .value()
        .attr("title")
        .map(str::to_string)
        .unwrap_or_else(|| link.text().collect::<String>())
        .trim()
        .to_string();
    if name.is_empty() {
        return None;
    }
    Some((name, link.value().attr("href").map(str::to_string)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queues_each_country_once() {
        let html = std::fs::read_to_string("tests/fixtures/country_list.html").unwrap();
        let page = Page::parse(&html);
        let mut state = CrawlState::new("https://en.wikipedia.org");

        let queued = handle(&page, "seed", &mut state).unwrap();
        assert_eq!(queued, 3);

        let first = state.frontier.pop().unwrap();
        assert_eq!(first.url, "https://en.wikipedia.org/wiki/Wonderland");
        match first.kind {
            PageKind::Country(meta) => {
                assert_eq!(meta.name, "Wonderland");
                assert_eq!(meta.source_link.as_deref(), Some("/wiki/Wonderland"));
            }
            other => panic!("unexpected task {:?}", other),
        }
    }

    #[test]
    fn missing_table_is_an_error() {
        let page = Page::parse("<html><body></body></html>");
        let mut state = CrawlState::new("https://en.wikipedia.org");
        assert!(matches!(
            handle(&page, "seed", &mut state),
            Err(HandlerError::NoCountryTable { .. })
        ));
    }
}
