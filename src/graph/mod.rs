pub mod ntriples;
pub mod sparql;

use std::collections::BTreeSet;
use std::fmt;

use crate::names::{from_canonical, to_canonical};

/// IRI prefix of every entity node.
pub const ENTITY_BASE: &str = "https://dbpedia.org/page/";

const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// The closed set of relations the crawler asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Predicate {
    PresidentOf,
    PrimeMinisterOf,
    CapitalOf,
    GovernmentTypeOf,
    AreaOf,
    PopulationOf,
    VicePresidentOf,
    BirthDateOf,
    RoleOf,
    BirthPlaceOf,
}

impl Predicate {
    pub const ALL: [Predicate; 10] = [
        Predicate::PresidentOf,
        Predicate::PrimeMinisterOf,
        Predicate::CapitalOf,
        Predicate::GovernmentTypeOf,
        Predicate::AreaOf,
        Predicate::PopulationOf,
        Predicate::VicePresidentOf,
        Predicate::BirthDateOf,
        Predicate::RoleOf,
        Predicate::BirthPlaceOf,
    ];

    pub fn iri(self) -> &'static str {
        match self {
            Predicate::PresidentOf => "https://dbpedia.org/ontology/president",
            Predicate::PrimeMinisterOf => "https://dbpedia.org/ontology/PrimeMinister",
            Predicate::CapitalOf => "https://dbpedia.org/ontology/capital",
            Predicate::GovernmentTypeOf => "https://dbpedia.org/ontology/governmentType",
            Predicate::AreaOf => "https://dbpedia.org/ontology/PopulatedPlace/area",
            Predicate::PopulationOf => "https://dbpedia.org/property/populationCensus",
            Predicate::VicePresidentOf => "https://dbpedia.org/ontology/VicePresident",
            Predicate::BirthDateOf => "https://dbpedia.org/ontology/birthDate",
            Predicate::RoleOf => "https://dbpedia.org/ontology/role",
            Predicate::BirthPlaceOf => "https://dbpedia.org/ontology/birthPlace",
        }
    }

    pub fn from_iri(iri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.iri() == iri)
    }

    /// Human name used when a relation is itself an answer ("Who is X?").
    pub fn label(self) -> &'static str {
        match self {
            Predicate::PresidentOf => "President",
            Predicate::PrimeMinisterOf => "Prime Minister",
            Predicate::CapitalOf => "Capital",
            Predicate::GovernmentTypeOf => "Government type",
            Predicate::AreaOf => "Area",
            Predicate::PopulationOf => "Population",
            Predicate::VicePresidentOf => "Vice President",
            Predicate::BirthDateOf => "Birth date",
            Predicate::RoleOf => "Role",
            Predicate::BirthPlaceOf => "Birth place",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Datatype {
    String,
    Integer,
    Decimal,
    Date,
}

impl Datatype {
    /// XSD IRI; plain strings carry none in the file.
    pub fn iri(self) -> Option<String> {
        let local = match self {
            Datatype::String => return None,
            Datatype::Integer => "integer",
            Datatype::Decimal => "decimal",
            Datatype::Date => "date",
        };
        Some(format!("{XSD}{local}"))
    }

    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri.strip_prefix(XSD)? {
            "string" => Some(Datatype::String),
            "integer" => Some(Datatype::Integer),
            "decimal" => Some(Datatype::Decimal),
            "date" => Some(Datatype::Date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub value: String,
    pub datatype: Datatype,
}

/// A node or value in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// Canonical identifier, e.g. `Emmanuel_Macron`.
    Entity(String),
    /// A relation used as an object (`X roleOf presidentOf`).
    Relation(Predicate),
    Literal(Literal),
}

impl Term {
    /// Entity node for free text; `None` when the text normalizes to nothing.
    pub fn entity(name: &str) -> Option<Term> {
        let id = to_canonical(name);
        (!id.is_empty()).then_some(Term::Entity(id))
    }

    #[cfg(test)]
    pub fn string(value: impl Into<String>) -> Term {
        Term::literal(value, Datatype::String)
    }

    pub fn literal(value: impl Into<String>, datatype: Datatype) -> Term {
        Term::Literal(Literal {
            value: value.into(),
            datatype,
        })
    }

    /// Name shown to a human.
    pub fn display(&self) -> String {
        match self {
            Term::Entity(id) => from_canonical(id),
            Term::Relation(p) => p.label().to_string(),
            Term::Literal(l) => l.value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Predicate,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Predicate, object: Term) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.subject.display(),
            self.predicate.label(),
            self.object.display()
        )
    }
}

/// Append-only triple set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleStore {
    triples: BTreeSet<Triple>,
}

impl TripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the triple was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn add(&mut self, subject: Term, predicate: Predicate, object: Term) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    #[cfg(test)]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }
}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        TripleStore {
            triples: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_is_noop() {
        let mut store = TripleStore::new();
        let t = Triple::new(
            Term::entity("Alice").unwrap(),
            Predicate::PresidentOf,
            Term::entity("Wonderland").unwrap(),
        );
        assert!(store.insert(t.clone()));
        assert!(!store.insert(t.clone()));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&t));
    }

    #[test]
    fn blank_names_make_no_entity() {
        assert_eq!(Term::entity("   "), None);
        assert_eq!(
            Term::entity("looking glass city"),
            Some(Term::Entity("Looking_Glass_City".into()))
        );
    }

    #[test]
    fn predicate_iris_are_distinct_and_reversible() {
        for p in Predicate::ALL {
            assert_eq!(Predicate::from_iri(p.iri()), Some(p));
            assert!(!p.iri().starts_with(ENTITY_BASE));
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(Term::Entity("Looking_Glass_City".into()).display(), "Looking Glass City");
        assert_eq!(Term::Relation(Predicate::PrimeMinisterOf).display(), "Prime Minister");
        assert_eq!(Term::literal("1990-01-02", Datatype::Date).display(), "1990-01-02");
    }
}
