use tracing::debug;

use super::registry::CountryRegistry;
use super::{CrawlState, PersonMeta};
use crate::error::HandlerError;
use crate::graph::{Datatype, Predicate, Term};
use crate::page::{Infobox, Page};

/// Country of birth from the "Born" row, confirmed against the registry.
///
/// Tries, in order: article links in the row, text tokens (each line or
/// text node split on commas and brackets), then `context_country` if its
/// name literally occurs in the row.
/// A row naming several countries (birth and death place, say) resolves to
/// whichever is found first.
pub fn resolve_birth_country(
    infobox: &Infobox<'_>,
    registry: &CountryRegistry,
    context_country: &str,
) -> Option<String> {
    let fragments = infobox.fragments("Born");
    if fragments.is_empty() {
        return None;
    }

    if let Some(id) = infobox
        .links("Born")
        .iter()
        .find_map(|page_id| registry.resolve(page_id))
    {
        return Some(id);
    }

    if let Some(id) = fragments
        .iter()
        .flat_map(|fragment| fragment.split([',', '(', ')', ';']))
        .map(|token| token.trim().trim_end_matches('.').trim())
        .filter(|token| !token.is_empty())
        .find_map(|token| registry.resolve(token))
    {
        return Some(id);
    }

    if !context_country.is_empty() && fragments.join(" ").contains(context_country) {
        return registry.resolve(context_country);
    }
    None
}

/// Person page: role, birth date, and birth place when it is a known country.
pub fn handle(
    page: &Page,
    url: &str,
    meta: &PersonMeta,
    state: &mut CrawlState,
) -> Result<(), HandlerError> {
    let infobox = page.infobox().ok_or_else(|| HandlerError::NoInfobox {
        url: url.to_string(),
    })?;
    let Some(person) = Term::entity(&meta.name) else {
        return Ok(());
    };

    let birth_date = page.birth_date();
    let birth_country = resolve_birth_country(&infobox, &state.countries, &meta.country);
    if birth_country.is_none() {
        debug!(
            "No known birth country for {} in {:?}",
            meta.name,
            infobox.text("Born")
        );
    }

    let store = &mut state.store;
    store.add(
        person.clone(),
        Predicate::RoleOf,
        Term::Relation(meta.role.relation()),
    );
    if let Some(date) = birth_date {
        store.add(
            person.clone(),
            Predicate::BirthDateOf,
            Term::literal(date.format("%Y-%m-%d").to_string(), Datatype::Date),
        );
    }
    if let Some(country) = birth_country {
        store.add(person, Predicate::BirthPlaceOf, Term::Entity(country));
    }
    Ok(())
}
