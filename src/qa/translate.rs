use super::router::{QuestionKind, Routed};
use crate::graph::ntriples::entity_iri;
use crate::graph::sparql::Row;
use crate::graph::{Predicate, Term};

/// A SPARQL SELECT plus the row filter that SPARQL cannot express on
/// display names.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sparql: String,
    pub select: Vec<&'static str>,
    /// Keep rows whose `column` display name contains `needle`, ignoring case.
    pub display_contains: Option<(usize, String)>,
}

impl Query {
    fn new(select: &[&'static str], body: &str) -> Self {
        let vars = select
            .iter()
            .map(|v| format!("?{v}"))
            .collect::<Vec<_>>()
            .join(" ");
        Query {
            sparql: format!("SELECT DISTINCT {vars} WHERE {{ {body} }} ORDER BY {vars}"),
            select: select.to_vec(),
            display_contains: None,
        }
    }

    pub fn keeps(&self, row: &Row) -> bool {
        let Some((column, needle)) = &self.display_contains else {
            return true;
        };
        row.get(*column).is_some_and(|term| {
            term.display()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
    }
}

fn rel(p: Predicate) -> String {
    format!("<{}>", p.iri())
}

fn entity(routed: &Routed, param: &str) -> Option<String> {
    match Term::entity(routed.param(param)?)? {
        Term::Entity(id) => Some(format!("<{}>", entity_iri(&id))),
        _ => None,
    }
}

/// The country's own value for `relation`.
fn country_fact(relation: Predicate, country: String) -> Query {
    Query::new(&["y"], &format!("{country} {} ?y .", rel(relation)))
}

/// A fact about whoever holds `office` in the country.
fn office_holder_fact(office: Predicate, fact: Predicate, country: String) -> Query {
    Query::new(
        &["y"],
        &format!("?x {} {country} . ?x {} ?y .", rel(office), rel(fact)),
    )
}

/// The typed form plus its singular spellings, so "unitary states" also
/// finds `Unitary_state`. Rendered as the body of a VALUES block.
fn government_forms(routed: &Routed, param: &str) -> Option<String> {
    let typed = routed.param(param)?;
    let mut spellings = vec![typed.to_string()];
    if let Some(stem) = typed.strip_suffix("ies") {
        spellings.push(format!("{stem}y"));
    }
    if let Some(stem) = typed.strip_suffix('s') {
        spellings.push(stem.to_string());
    }

    let mut iris: Vec<String> = spellings
        .iter()
        .filter_map(|s| match Term::entity(s)? {
            Term::Entity(id) => Some(format!("<{}>", entity_iri(&id))),
            _ => None,
        })
        .collect();
    iris.dedup();
    (!iris.is_empty()).then(|| iris.join(" "))
}

/// Build the graph query for a routed question. `None` when a parameter
/// normalizes to nothing.
pub fn translate(routed: &Routed) -> Option<Query> {
    use QuestionKind::*;

    let query = match routed.kind {
        President => Query::new(
            &["x"],
            &format!("?x {} {} .", rel(Predicate::PresidentOf), entity(routed, "country")?),
        ),
        PrimeMinister => Query::new(
            &["x"],
            &format!(
                "?x {} {} .",
                rel(Predicate::PrimeMinisterOf),
                entity(routed, "country")?
            ),
        ),
        Population => country_fact(Predicate::PopulationOf, entity(routed, "country")?),
        Area => country_fact(Predicate::AreaOf, entity(routed, "country")?),
        Government => country_fact(Predicate::GovernmentTypeOf, entity(routed, "country")?),
        Capital => country_fact(Predicate::CapitalOf, entity(routed, "country")?),
        PresidentBirthDate => office_holder_fact(
            Predicate::PresidentOf,
            Predicate::BirthDateOf,
            entity(routed, "country")?,
        ),
        PresidentBirthPlace => office_holder_fact(
            Predicate::PresidentOf,
            Predicate::BirthPlaceOf,
            entity(routed, "country")?,
        ),
        PrimeMinisterBirthDate => office_holder_fact(
            Predicate::PrimeMinisterOf,
            Predicate::BirthDateOf,
            entity(routed, "country")?,
        ),
        PrimeMinisterBirthPlace => office_holder_fact(
            Predicate::PrimeMinisterOf,
            Predicate::BirthPlaceOf,
            entity(routed, "country")?,
        ),
        SharedGovernment => {
            let government = rel(Predicate::GovernmentTypeOf);
            Query::new(
                &["c"],
                &format!(
                    "VALUES ?f1 {{ {} }} VALUES ?f2 {{ {} }} ?c {government} ?f1 . ?c {government} ?f2 .",
                    government_forms(routed, "form1")?,
                    government_forms(routed, "form2")?,
                ),
            )
        }
        // all capitals, narrowed on display name afterwards
        CapitalContains => Query {
            display_contains: Some((1, routed.param("needle")?.to_string())),
            ..Query::new(&["c", "cap"], &format!("?c {} ?cap .", rel(Predicate::CapitalOf)))
        },
        PresidentsBornIn => Query::new(
            &["p"],
            &format!(
                "?p {} {} . ?p {} {} .",
                rel(Predicate::RoleOf),
                rel(Predicate::PresidentOf),
                rel(Predicate::BirthPlaceOf),
                entity(routed, "country")?
            ),
        ),
        // role, then whatever that role relates the entity to
        WhoIs => {
            let who = entity(routed, "entity")?;
            Query::new(
                &["role", "place"],
                &format!("{who} {} ?role . {who} ?role ?place .", rel(Predicate::RoleOf)),
            )
        }
    };
    Some(query)
}
