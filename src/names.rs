/// Canonical graph identifier for a free-text name: "united  states" → "United_States".
///
/// Whitespace and underscores both separate words, so feeding an identifier back
/// in returns it unchanged. Empty or blank input yields an empty identifier.
pub fn to_canonical(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '_')
        .filter(|w| !w.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join("_")
}

/// Display form of an identifier or IRI: strips any path prefix, underscores → spaces.
pub fn from_canonical(identifier: &str) -> String {
    identifier
        .rsplit('/')
        .next()
        .unwrap_or(identifier)
        .replace('_', " ")
}

/// Uppercase the first letter of every alphanumeric run, lowercase the rest.
/// Apostrophes don't start a new run ("people's" → "People's").
fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_start = true;
    for c in word.chars() {
        if c.is_alphanumeric() {
            if at_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_start = false;
        } else {
            out.push(c);
            at_start = c != '\'' && c != '’';
        }
    }
    out
}

/// Article URL for a free-text page name.
pub fn wiki_page_url(base: &str, name: &str) -> String {
    format!(
        "{}/wiki/{}",
        base.trim_end_matches('/'),
        name.trim().replace(' ', "_")
    )
}

/// Absolute URL for an href found on a page of `base`.
pub fn resolve_href(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        format!("{}/{}", base.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}

/// Page identifier of an internal article link, e.g. "/wiki/C%C3%B4te_d%27Ivoire#x"
/// → "Côte_d'Ivoire". Namespaced pages ("File:", "Help:") and anchors-only links
/// are not articles.
pub fn page_id_from_href(href: &str) -> Option<String> {
    let rest = href.strip_prefix("/wiki/")?;
    let rest = rest.split(['#', '?']).next().unwrap_or_default();
    if rest.is_empty() {
        return None;
    }
    let id = percent_decode(rest);
    if id.contains(':') {
        return None;
    }
    Some(id)
}

/// Decode `%XX` escapes; malformed escapes are kept verbatim.
pub fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_examples() {
        assert_eq!(to_canonical("united states"), "United_States");
        assert_eq!(to_canonical("  UNITED   STATES "), "United_States");
        assert_eq!(to_canonical("Looking Glass City"), "Looking_Glass_City");
        assert_eq!(to_canonical("Guinea-bissau"), "Guinea-Bissau");
        assert_eq!(to_canonical("people's republic"), "People's_Republic");
    }

    #[test]
    fn canonical_is_idempotent() {
        for name in [
            "Emmanuel Macron",
            "  the gambia ",
            "Côte d'Ivoire",
            "São Tomé and Príncipe",
            "Looking_Glass_City",
            "McDonald",
            "bosnia-and herzegovina",
        ] {
            let once = to_canonical(name);
            assert_eq!(to_canonical(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn blank_name_is_no_value() {
        assert_eq!(to_canonical(""), "");
        assert_eq!(to_canonical(" \t\n"), "");
    }

    #[test]
    fn display_form() {
        assert_eq!(from_canonical("Looking_Glass_City"), "Looking Glass City");
        assert_eq!(
            from_canonical("https://dbpedia.org/page/Emmanuel_Macron"),
            "Emmanuel Macron"
        );
        // lossy for irregular casing
        assert_eq!(from_canonical(&to_canonical("McDonald")), "Mcdonald");
    }

    #[test]
    fn page_ids() {
        assert_eq!(page_id_from_href("/wiki/Paris").as_deref(), Some("Paris"));
        assert_eq!(
            page_id_from_href("/wiki/C%C3%B4te_d%27Ivoire#History").as_deref(),
            Some("Côte_d'Ivoire")
        );
        assert_eq!(page_id_from_href("/wiki/File:Flag.svg"), None);
        assert_eq!(page_id_from_href("#cite_note-3"), None);
        assert_eq!(page_id_from_href("https://example.com/wiki/Paris"), None);
    }

    #[test]
    fn urls() {
        assert_eq!(
            wiki_page_url("https://en.wikipedia.org/", "Emmanuel Macron"),
            "https://en.wikipedia.org/wiki/Emmanuel_Macron"
        );
        assert_eq!(
            resolve_href("https://en.wikipedia.org", "/wiki/France"),
            "https://en.wikipedia.org/wiki/France"
        );
        assert_eq!(
            resolve_href("https://en.wikipedia.org", "https://fr.wikipedia.org/wiki/France"),
            "https://fr.wikipedia.org/wiki/France"
        );
    }

    #[test]
    fn percent_decoding_keeps_malformed_escapes() {
        assert_eq!(percent_decode("100%25"), "100%");
        assert_eq!(percent_decode("50%"), "50%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}
