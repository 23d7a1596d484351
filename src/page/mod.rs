pub mod infobox;

use std::sync::LazyLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

pub use infobox::{Infobox, LabelMatch};

static INFOBOX_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.infobox").unwrap());
static WIKITABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.wikitable").unwrap());
static BDAY_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.bday").unwrap());

/// A fetched article, parsed into a DOM.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(body: &str) -> Self {
        Page {
            html: Html::parse_document(body),
        }
    }

    /// First info box on the page.
    pub fn infobox(&self) -> Option<Infobox<'_>> {
        self.html.select(&INFOBOX_SEL).next().map(Infobox::new)
    }

    /// First sortable data table (the country list on the seed page).
    pub fn wikitable(&self) -> Option<ElementRef<'_>> {
        self.html.select(&WIKITABLE_SEL).next()
    }

    /// First `span.bday` holding an ISO date, preferring the info box.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let in_box = self
            .infobox()
            .and_then(|b| first_date(b.element().select(&BDAY_SEL)));
        in_box.or_else(|| first_date(self.html.select(&BDAY_SEL)))
    }
}

fn first_date<'a>(spans: impl Iterator<Item = ElementRef<'a>>) -> Option<NaiveDate> {
    spans
        .filter_map(|span| {
            let text = span.text().collect::<String>();
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
        })
        .next()
}
