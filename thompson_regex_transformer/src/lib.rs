use log::{debug, trace};
use crate::construction::to_nfa;
use crate::regex::parse_regex;

pub mod automata;
pub mod construction;
pub mod regex;

pub use crate::automata::{Label, Nfa, StateId, INITIAL_STATE};
pub use crate::regex::{Expression, Operator};

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The scanner reached a substring it could not split or read.
    Malformed { regex: String, reason: String },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Malformed { regex, reason } => {
                write!(f, "malformed regex ({regex}): {reason}")
            }
        }
    }
}

impl std::error::Error for CompileError {}

pub fn to_regex(regex: &str) -> CompileResult<Expression> {
    parse_regex(regex)
}

pub fn to_automata(expression: &Expression) -> Nfa {
    to_nfa(expression)
}

/// Builds the automaton for `regex` and resets it, ready for feeding.
pub fn compile(regex: &str) -> CompileResult<Nfa> {
    let mut nfa = to_automata(&to_regex(regex)?);
    nfa.reset();

    debug!(
        "compiled ({regex}) into {} states, accepting {:?}",
        nfa.states().len(),
        nfa.accepting()
    );
    trace!("{nfa:?}");

    Ok(nfa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn check(regex: &str, accepted: &[&str], rejected: &[&str]) {
        let mut nfa = compile(regex).unwrap();

        for input in accepted {
            nfa.feed_symbols(input.chars(), false);
            assert!(nfa.is_accepting(), "({regex}) should accept {input:?}");
            nfa.reset();
        }
        for input in rejected {
            nfa.feed_symbols(input.chars(), true);
            assert!(!nfa.is_accepting(), "({regex}) should reject {input:?}");
            nfa.reset();
        }
    }

    #[test]
    fn empty_regex_accepts_only_empty() {
        check("", &[""], &["a", " "]);
    }

    #[test]
    fn kleene_star() {
        let mut nfa = compile("a*").unwrap();
        assert!(nfa.is_accepting());

        for _ in 0..20 {
            nfa.feed_symbol('a');
            assert!(nfa.is_accepting());
        }

        nfa.feed_symbol('b');
        assert!(!nfa.is_accepting());
        assert!(nfa.is_dead());

        check("a*", &["", "a", "aaaaaaaaaaaaaaaaaaaa"], &["ab"]);
    }

    #[test]
    fn chained_kleene_stars() {
        let mut nfa = compile("a*b*c*").unwrap();
        assert!(nfa.is_accepting());
        nfa.feed_symbol('d');
        assert!(!nfa.is_accepting());

        for i in 0..10 {
            nfa.reset();
            for symbol in ['a', 'b', 'c'] {
                for _ in 0..=i {
                    nfa.feed_symbol(symbol);
                    assert!(nfa.is_accepting());
                }
            }
        }

        nfa.feed_symbol('d');
        assert!(!nfa.is_accepting());
    }

    #[test]
    fn one_or_more() {
        let mut nfa = compile("a+").unwrap();
        assert!(!nfa.is_accepting());

        for _ in 0..20 {
            nfa.feed_symbol('a');
            assert!(nfa.is_accepting());
        }

        nfa.feed_symbol('b');
        assert!(nfa.is_dead());

        check("a+", &["a", "aaa"], &[""]);
    }

    #[test]
    fn zero_or_one() {
        check("c?loud", &["cloud", "loud"], &["", "oud", "ccloud"]);
        check("a?bcd", &["bcd", "abcd"], &["", "aabcd", "aaaaaaaaabcd"]);
    }

    #[test]
    fn alternatives() {
        check("python|java|C#", &["python", "java", "C#"], &["", "perl", "C++", "Go"]);
    }

    #[test]
    fn explicit_and_implicit_concat() {
        for regex in ["python", "p.y.t.h.o.n"] {
            check(regex, &["python"], &["", "java", "pytho", "pythons"]);
        }
    }

    #[test]
    fn repetition_then_literal_tail() {
        for regex in ["o+k then", "o*ok then"] {
            check(
                regex,
                &["ok then", "ooook then", "ooooooook then"],
                &["", "k then", "okay", "oki-doki"],
            );
        }
    }

    #[test]
    fn laughter() {
        check(
            "H?A?h?a?*!*|H?E?h?e?*!*",
            &["Hah", "heh", "Haha", "AAAAAAAAAAHAHAHAHAHA!!", "eeeehehehehehe", "hhhaaaaaaaaaaaa", "HEHEEE!"],
            &["Heaha", "Haha!h!", "!haha", "I don't get it"],
        );
    }

    #[test]
    fn structural_equality() {
        assert_eq!(compile("a.b|c").unwrap(), compile("a.b|c").unwrap());
        assert_ne!(compile("a.b|c").unwrap(), compile("a.b.c.d").unwrap());
        assert_eq!(compile("a.b.c.d|c").unwrap(), compile("abcd|c").unwrap());
    }

    #[test]
    fn reset_after_feeding_matches_fresh_compile() {
        let fresh = compile("ab*|ba+").unwrap();
        let mut used = fresh.clone();

        used.feed_symbols("abbbzz".chars(), false);
        assert!(used.is_dead());
        used.reset();

        assert_eq!(used.active(), fresh.active());
    }

    #[test]
    fn unknown_symbols_only_kill_the_run() {
        let mut nfa = compile("ab").unwrap();
        nfa.feed_symbols("a€b".chars(), true);
        assert!(nfa.is_dead());
        assert!(!nfa.is_accepting());
    }

    fn inputs(alphabet: &str, max_len: usize) -> Vec<String> {
        std::iter::once(String::new())
            .chain((1..=max_len).flat_map(move |n| {
                (0..n)
                    .map(move |_| alphabet.chars())
                    .multi_cartesian_product()
                    .map(|symbols| symbols.into_iter().collect::<String>())
            }))
            .collect()
    }

    #[test]
    fn agrees_with_regex_crate() {
        let patterns = ["a*b*c*", "ab*|ba+", "a.b|c*", "a?b+c", "abc|a*c?b", "c.a?b*", "b+a?|c"];
        let inputs = inputs("abc", 5);

        for pattern in patterns {
            let expression = to_regex(pattern).unwrap();
            let oracle = ::regex::Regex::new(&format!("^(?:{expression})$")).unwrap();
            let mut nfa = compile(pattern).unwrap();

            for input in &inputs {
                assert_eq!(
                    nfa.matches(input.chars()),
                    oracle.is_match(input),
                    "({pattern}) as {expression} on {input:?}"
                );
            }
        }
    }
}
