use super::router::QuestionKind;
use crate::graph::sparql::Row;
use crate::graph::Term;
use crate::numeric::group_thousands;

const AREA_UNIT: &str = " km²";

/// Render query rows as answer text; `None` means there is nothing to say.
pub fn format(kind: QuestionKind, rows: &[Row]) -> Option<String> {
    use QuestionKind::*;

    match kind {
        SharedGovernment | PresidentsBornIn => return Some(rows.len().to_string()),
        _ if rows.is_empty() => return None,
        _ => {}
    }

    let answer = match kind {
        Population => group_thousands(&first(rows)?.display()),
        Area => format!("{}{}", group_thousands(&first(rows)?.display()), AREA_UNIT),
        Government | CapitalContains => sorted_list(rows.iter().filter_map(|r| r.first())),
        WhoIs => sorted_list_of(rows.iter().filter_map(|row| match row.as_slice() {
            [role, place] => Some(format!("{} of {}", role.display(), place.display())),
            _ => None,
        })),
        _ => first(rows)?.display(),
    };
    Some(answer)
}

fn first(rows: &[Row]) -> Option<&Term> {
    rows.first()?.first()
}

fn sorted_list<'a>(terms: impl Iterator<Item = &'a Term>) -> String {
    sorted_list_of(terms.map(Term::display))
}

/// Deduplicated, sorted, comma-joined.
fn sorted_list_of(items: impl Iterator<Item = String>) -> String {
    let mut items: Vec<String> = items.collect();
    items.sort();
    items.dedup();
    items.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Datatype, Predicate};

    fn e(name: &str) -> Term {
        Term::entity(name).unwrap()
    }

    #[test]
    fn single_entity_takes_first_row() {
        let rows = vec![vec![e("Alice")], vec![e("Bob")]];
        assert_eq!(format(QuestionKind::President, &rows).as_deref(), Some("Alice"));
    }

    #[test]
    fn numbers_are_grouped() {
        let pop = vec![vec![Term::literal("1234567", Datatype::Integer)]];
        assert_eq!(
            format(QuestionKind::Population, &pop).as_deref(),
            Some("1,234,567")
        );
        let area = vec![vec![Term::literal("643801.5", Datatype::Decimal)]];
        assert_eq!(
            format(QuestionKind::Area, &area).as_deref(),
            Some("643,801.5 km²")
        );
    }

    #[test]
    fn lists_are_sorted_and_unique() {
        let rows = vec![
            vec![e("Unitary state")],
            vec![e("Presidential republic")],
            vec![e("Unitary state")],
        ];
        assert_eq!(
            format(QuestionKind::Government, &rows).as_deref(),
            Some("Presidential Republic, Unitary State")
        );
    }

    #[test]
    fn who_is_names_role_and_country() {
        let rows = vec![vec![Term::Relation(Predicate::PresidentOf), e("Wonderland")]];
        assert_eq!(
            format(QuestionKind::WhoIs, &rows).as_deref(),
            Some("President of Wonderland")
        );
    }

    #[test]
    fn empty_results() {
        assert_eq!(format(QuestionKind::PresidentsBornIn, &[]).as_deref(), Some("0"));
        assert_eq!(format(QuestionKind::SharedGovernment, &[]).as_deref(), Some("0"));
        assert_eq!(format(QuestionKind::Capital, &[]), None);
        assert_eq!(format(QuestionKind::CapitalContains, &[]), None);
    }
}
