use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    President,
    PrimeMinister,
    Population,
    Area,
    Government,
    Capital,
    PresidentBirthDate,
    PresidentBirthPlace,
    PrimeMinisterBirthDate,
    PrimeMinisterBirthPlace,
    SharedGovernment,
    CapitalContains,
    PresidentsBornIn,
    WhoIs,
}

/// Question patterns in precedence order: the first match wins, so the
/// catch-all "Who is X?" must stay last.
pub static QUESTIONS: LazyLock<Vec<(Regex, QuestionKind)>> = LazyLock::new(|| {
    [
        (r"^Who is the president of (?P<country>.+)\?$", QuestionKind::President),
        (r"^Who is the prime minister of (?P<country>.+)\?$", QuestionKind::PrimeMinister),
        (r"^What is the population of (?P<country>.+)\?$", QuestionKind::Population),
        (r"^What is the area of (?P<country>.+)\?$", QuestionKind::Area),
        (r"^What is the form of government in (?P<country>.+)\?$", QuestionKind::Government),
        (r"^What is the capital of (?P<country>.+)\?$", QuestionKind::Capital),
        (r"^When was the president of (?P<country>.+) born\?$", QuestionKind::PresidentBirthDate),
        (r"^Where was the president of (?P<country>.+) born\?$", QuestionKind::PresidentBirthPlace),
        (r"^When was the prime minister of (?P<country>.+) born\?$", QuestionKind::PrimeMinisterBirthDate),
        (r"^Where was the prime minister of (?P<country>.+) born\?$", QuestionKind::PrimeMinisterBirthPlace),
        (r"^How many (?P<form1>.+) are also (?P<form2>.+)\?$", QuestionKind::SharedGovernment),
        (r"^List all countries whose capital name contains the string (?P<needle>.+?)\??$", QuestionKind::CapitalContains),
        (r"^How many presidents were born in (?P<country>.+)\?$", QuestionKind::PresidentsBornIn),
        (r"^Who is (?P<entity>.+)\?$", QuestionKind::WhoIs),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(pattern).unwrap(), kind))
    .collect()
});

/// A matched question: its position in [`QUESTIONS`] and captured parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Routed {
    pub index: usize,
    pub kind: QuestionKind,
    pub params: BTreeMap<String, String>,
}

impl Routed {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Collapse whitespace, then try each pattern in order.
pub fn route(text: &str) -> Option<Routed> {
    let question = text.split_whitespace().collect::<Vec<_>>().join(" ");

    QUESTIONS.iter().enumerate().find_map(|(index, (re, kind))| {
        let caps = re.captures(&question)?;
        let params = re
            .capture_names()
            .flatten()
            .filter_map(|name| {
                let value = caps.name(name)?.as_str().trim();
                (!value.is_empty()).then(|| (name.to_string(), value.to_string()))
            })
            .collect();
        Some(Routed {
            index,
            kind: *kind,
            params,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(q: &str) -> Option<QuestionKind> {
        route(q).map(|r| r.kind)
    }

    #[test]
    fn specific_question_beats_who_is() {
        let r = route("Who is the president of Wonderland?").unwrap();
        assert_eq!(r.kind, QuestionKind::President);
        assert_eq!(r.index, 0);
        assert_eq!(r.param("country"), Some("Wonderland"));

        assert_eq!(
            kind("Who is the prime minister of Wonderland?"),
            Some(QuestionKind::PrimeMinister)
        );
        assert_eq!(kind("Who is Alice Liddell?"), Some(QuestionKind::WhoIs));
    }

    #[test]
    fn whitespace_is_collapsed() {
        let r = route("  What   is the capital of\tSouth  Korea? ").unwrap();
        assert_eq!(r.kind, QuestionKind::Capital);
        assert_eq!(r.param("country"), Some("South Korea"));
    }

    #[test]
    fn every_kind_routes() {
        let cases = [
            ("What is the population of Italy?", QuestionKind::Population),
            ("What is the area of Italy?", QuestionKind::Area),
            ("What is the form of government in Italy?", QuestionKind::Government),
            ("When was the president of Italy born?", QuestionKind::PresidentBirthDate),
            ("Where was the president of Italy born?", QuestionKind::PresidentBirthPlace),
            ("When was the prime minister of Italy born?", QuestionKind::PrimeMinisterBirthDate),
            ("Where was the prime minister of Italy born?", QuestionKind::PrimeMinisterBirthPlace),
            ("How many presidents were born in Iceland?", QuestionKind::PresidentsBornIn),
        ];
        for (q, expected) in cases {
            assert_eq!(kind(q), Some(expected), "{}", q);
        }
    }

    #[test]
    fn shared_government_params() {
        let r = route("How many absolute monarchies are also unitary states?").unwrap();
        assert_eq!(r.kind, QuestionKind::SharedGovernment);
        assert_eq!(r.param("form1"), Some("absolute monarchies"));
        assert_eq!(r.param("form2"), Some("unitary states"));
    }

    #[test]
    fn capital_search_question_mark_optional() {
        for q in [
            "List all countries whose capital name contains the string hi",
            "List all countries whose capital name contains the string hi?",
        ] {
            let r = route(q).unwrap();
            assert_eq!(r.kind, QuestionKind::CapitalContains);
            assert_eq!(r.param("needle"), Some("hi"));
        }
    }

    #[test]
    fn unknown_questions_do_not_route() {
        assert_eq!(route("What is the meaning of life"), None);
        assert_eq!(route(""), None);
    }
}
