//! SPARQL evaluation over the crawled graph, backed by an in-memory oxigraph store.
//!
//! The crawl builds a [`TripleStore`]; questions are answered by loading it
//! into oxigraph and running SELECT queries against it.

use oxigraph::model::{GraphName, Literal as OxLiteral, NamedNode, Quad, Term as OxTerm};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use super::ntriples::entity_iri;
use super::{Datatype, Literal, Predicate, Term, Triple, TripleStore, ENTITY_BASE};
use crate::error::GraphError;
use crate::names::percent_decode;

/// Values of the selected variables, in select order.
pub type Row = Vec<Term>;

pub struct SparqlStore {
    store: Store,
}

impl SparqlStore {
    pub fn in_memory() -> Result<Self, GraphError> {
        let store = Store::new().map_err(|e| GraphError::Sparql {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(SparqlStore { store })
    }

    pub fn from_triples(triples: &TripleStore) -> Result<Self, GraphError> {
        let sparql = Self::in_memory()?;
        for triple in triples.iter() {
            sparql.insert(triple)?;
        }
        Ok(sparql)
    }

    pub fn insert(&self, triple: &Triple) -> Result<(), GraphError> {
        let quad = Quad::new(
            named_node(&triple.subject)?,
            iri_node(triple.predicate.iri())?,
            to_ox(&triple.object)?,
            GraphName::DefaultGraph,
        );
        self.store.insert(&quad).map_err(|e| GraphError::Sparql {
            message: format!("insert failed: {e}"),
        })?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize, GraphError> {
        self.store.len().map_err(|e| GraphError::Sparql {
            message: format!("count failed: {e}"),
        })
    }

    /// Run a SELECT query. Rows with an unbound or foreign-valued variable
    /// are skipped.
    pub fn select(&self, sparql: &str, vars: &[&str]) -> Result<Vec<Row>, GraphError> {
        let results = self.store.query(sparql).map_err(|e| GraphError::Sparql {
            message: format!("query failed: {e}"),
        })?;
        let QueryResults::Solutions(solutions) = results else {
            return Err(GraphError::Sparql {
                message: "expected SELECT solutions".into(),
            });
        };

        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| GraphError::Sparql {
                message: format!("solution error: {e}"),
            })?;
            let row: Option<Row> = vars
                .iter()
                .map(|var| solution.get(*var).and_then(from_ox))
                .collect();
            if let Some(row) = row {
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

impl std::fmt::Debug for SparqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlStore").finish()
    }
}

fn iri_node(iri: &str) -> Result<NamedNode, GraphError> {
    NamedNode::new(iri).map_err(|e| GraphError::Sparql {
        message: format!("invalid IRI <{iri}>: {e}"),
    })
}

fn named_node(term: &Term) -> Result<NamedNode, GraphError> {
    match term {
        Term::Entity(id) => iri_node(&entity_iri(id)),
        Term::Relation(p) => iri_node(p.iri()),
        Term::Literal(lit) => Err(GraphError::Sparql {
            message: format!("literal {:?} cannot be a subject", lit.value),
        }),
    }
}

fn to_ox(term: &Term) -> Result<OxTerm, GraphError> {
    match term {
        Term::Literal(lit) => Ok(match lit.datatype.iri() {
            Some(dt) => OxLiteral::new_typed_literal(lit.value.clone(), iri_node(&dt)?).into(),
            None => OxLiteral::new_simple_literal(lit.value.clone()).into(),
        }),
        _ => Ok(named_node(term)?.into()),
    }
}

fn from_ox(term: &OxTerm) -> Option<Term> {
    match term {
        OxTerm::NamedNode(node) => {
            let iri = node.as_str();
            match iri.strip_prefix(ENTITY_BASE) {
                Some(id) => Some(Term::Entity(percent_decode(id))),
                None => Predicate::from_iri(iri).map(Term::Relation),
            }
        }
        OxTerm::Literal(lit) => Some(Term::Literal(Literal {
            value: lit.value().to_string(),
            datatype: Datatype::from_iri(lit.datatype().as_str()).unwrap_or(Datatype::String),
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(name: &str) -> Term {
        Term::entity(name).unwrap()
    }

    fn store() -> SparqlStore {
        let triples: TripleStore = [
            Triple::new(e("Alice"), Predicate::PresidentOf, e("Wonderland")),
            Triple::new(e("Alice"), Predicate::RoleOf, Term::Relation(Predicate::PresidentOf)),
            Triple::new(
                e("Alice"),
                Predicate::BirthDateOf,
                Term::literal("1852-05-04", Datatype::Date),
            ),
            Triple::new(e("Wonderland"), Predicate::CapitalOf, e("Looking Glass City")),
            Triple::new(e("Oz"), Predicate::CapitalOf, e("Emerald [City]")),
        ]
        .into_iter()
        .collect();
        SparqlStore::from_triples(&triples).unwrap()
    }

    #[test]
    fn loads_every_triple() {
        assert_eq!(store().len().unwrap(), 5);
    }

    #[test]
    fn select_maps_terms_back() {
        let rows = store()
            .select(
                "SELECT ?x ?d WHERE { ?x <https://dbpedia.org/ontology/birthDate> ?d }",
                &["x", "d"],
            )
            .unwrap();
        assert_eq!(
            rows,
            vec![vec![e("Alice"), Term::literal("1852-05-04", Datatype::Date)]]
        );
    }

    #[test]
    fn relation_objects_and_variable_predicates() {
        let rows = store()
            .select(
                "SELECT ?role ?place WHERE { \
                 <https://dbpedia.org/page/Alice> <https://dbpedia.org/ontology/role> ?role . \
                 <https://dbpedia.org/page/Alice> ?role ?place . }",
                &["role", "place"],
            )
            .unwrap();
        assert_eq!(
            rows,
            vec![vec![Term::Relation(Predicate::PresidentOf), e("Wonderland")]]
        );
    }

    #[test]
    fn escaped_identifiers_survive() {
        let rows = store()
            .select(
                "SELECT ?cap WHERE { <https://dbpedia.org/page/Oz> <https://dbpedia.org/ontology/capital> ?cap }",
                &["cap"],
            )
            .unwrap();
        assert_eq!(rows, vec![vec![e("Emerald [City]")]]);
    }

    #[test]
    fn malformed_query_is_an_error() {
        assert!(matches!(
            store().select("SELECT WHERE {", &["x"]),
            Err(GraphError::Sparql { .. })
        ));
    }
}
