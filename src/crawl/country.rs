use tracing::debug;

use super::{CountryMeta, CrawlState, PageKind, PersonMeta, Role};
use crate::error::HandlerError;
use crate::graph::{Datatype, Predicate, Term};
use crate::names::wiki_page_url;
use crate::numeric::{parse_leading_number, Number};
use crate::page::{Infobox, LabelMatch, Page};

/// What a country page yields before it becomes triples.
#[derive(Debug, Default, PartialEq)]
pub struct CountryRecord {
    pub capital: Option<Term>,
    pub government: Vec<String>,
    pub area: Option<Number>,
    pub population: Option<i64>,
    pub president: Option<Leader>,
    pub vice_president: Option<String>,
    pub prime_minister: Option<Leader>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leader {
    pub name: String,
    /// Article link from the info box, when there is one.
    pub page_id: Option<String>,
}

pub fn extract(infobox: &Infobox<'_>) -> CountryRecord {
    let capital = infobox
        .link("Capital")
        .or_else(|| infobox.first_value("Capital"))
        .and_then(|c| Term::entity(&c));

    let area = infobox
        .merged("Area", LabelMatch::Contains)
        .first()
        .and_then(|t| parse_leading_number(t));
    let population = infobox
        .merged("Population", LabelMatch::Exact)
        .first()
        .and_then(|t| parse_leading_number(t))
        .map(Number::truncate);

    // Some countries title their head of government "Premier"
    let prime_minister = leader(infobox, "Prime Minister").or_else(|| leader(infobox, "Premier"));

    CountryRecord {
        capital,
        government: infobox.links("Government"),
        area,
        population,
        president: leader(infobox, "President"),
        vice_president: infobox.first_value("Vice President"),
        prime_minister,
    }
}

fn leader(infobox: &Infobox<'_>, label: &str) -> Option<Leader> {
    let name = infobox.first_value(label)?;
    Some(Leader {
        name,
        page_id: infobox.link(label),
    })
}

/// Country page: register the country, queue its leaders, assert its facts.
pub fn handle(
    page: &Page,
    url: &str,
    meta: &CountryMeta,
    state: &mut CrawlState,
) -> Result<(), HandlerError> {
    let infobox = page.infobox().ok_or_else(|| HandlerError::NoInfobox {
        url: url.to_string(),
    })?;
    let record = extract(&infobox);
    debug!("Parsed country {}: {:?}", meta.name, record);

    let Some(country_id) = state.countries.register(&meta.name) else {
        return Ok(());
    };
    let country = Term::Entity(country_id);

    for (role, leader) in [
        (Role::President, &record.president),
        (Role::PrimeMinister, &record.prime_minister),
    ] {
        let Some(leader) = leader else { continue };
        let Some(person) = Term::entity(&leader.name) else {
            continue;
        };
        let target = wiki_page_url(
            &state.wiki_base,
            leader.page_id.as_deref().unwrap_or(&leader.name),
        );
        state.frontier.enqueue(
            target,
            PageKind::Person(PersonMeta {
                role,
                name: leader.name.clone(),
                country: meta.name.clone(),
            }),
        );
        state.store.add(person, role.relation(), country.clone());
    }

    let store = &mut state.store;
    if let Some(population) = record.population {
        store.add(
            country.clone(),
            Predicate::PopulationOf,
            Term::literal(population.to_string(), Datatype::Integer),
        );
    }
    if let Some(area) = record.area {
        let datatype = match area {
            Number::Integer(_) => Datatype::Integer,
            Number::Decimal(_) => Datatype::Decimal,
        };
        store.add(
            country.clone(),
            Predicate::AreaOf,
            Term::literal(area.to_string(), datatype),
        );
    }
    if let Some(vp) = record.vice_president.as_deref().and_then(Term::entity) {
        store.add(country.clone(), Predicate::VicePresidentOf, vp);
    }
    if let Some(capital) = record.capital {
        store.add(country.clone(), Predicate::CapitalOf, capital);
    }
    for government in &record.government {
        if let Some(form) = Term::entity(government) {
            store.add(country.clone(), Predicate::GovernmentTypeOf, form);
        }
    }
    Ok(())
}
