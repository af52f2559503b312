//! Thompson construction: small automata glued together per operator.
//!
//! Every combinator takes its operands by value and hands back a new
//! automaton. An operand needed twice has to be cloned by the caller.

use crate::automata::{Label, Nfa, INITIAL_STATE};
use crate::regex::Expression;

/// `0 --label--> 1`, with `1` accepting.
pub fn single_symbol(label: Label) -> Nfa {
    let mut nfa = Nfa::new();
    nfa.add_state(1, true);
    nfa.add_transition(INITIAL_STATE, label, [1]);
    nfa
}

/// Accepts only the empty sequence.
pub fn epsilon() -> Nfa {
    single_symbol(Label::Epsilon)
}

/// Fuses `b`'s initial state onto `a`'s highest state.
pub fn concat(mut a: Nfa, b: Nfa) -> Nfa {
    let join = a.max_state();
    a.merge(b.shift(join));
    a
}

pub fn union(mut a: Nfa, mut b: Nfa) -> Nfa {
    let mut nfa = Nfa::new();

    a.clear_accepting();
    b.clear_accepting();

    let a = a.shift(1);
    let (a_start, a_end) = (a.min_state(), a.max_state());
    nfa.merge(a);

    let b = b.shift(nfa.max_state() + 1);
    let (b_start, b_end) = (b.min_state(), b.max_state());
    nfa.merge(b);

    nfa.add_transition(INITIAL_STATE, Label::Epsilon, [a_start, b_start]);

    let accept = nfa.max_state() + 1;
    nfa.add_state(accept, true);
    nfa.add_transition(a_end, Label::Epsilon, [accept]);
    nfa.add_transition(b_end, Label::Epsilon, [accept]);

    nfa
}

pub fn kleene_star(mut a: Nfa) -> Nfa {
    let mut nfa = Nfa::new();

    a.clear_accepting();
    let a = a.shift(1);
    let (start, last) = (a.min_state(), a.max_state());
    nfa.merge(a);

    let accept = last + 1;
    nfa.add_state(accept, true);
    nfa.add_transition(INITIAL_STATE, Label::Epsilon, [start, accept]);
    nfa.add_transition(last, Label::Epsilon, [INITIAL_STATE, accept]);

    nfa
}

pub fn one_or_more(a: Nfa) -> Nfa {
    concat(a.clone(), kleene_star(a))
}

pub fn zero_or_one(a: Nfa) -> Nfa {
    union(epsilon(), a)
}

pub fn to_nfa(expression: &Expression) -> Nfa {
    match expression {
        Expression::Empty => epsilon(),
        Expression::Literal(c) => single_symbol(Label::Symbol(*c)),
        Expression::Concat(left, right) => concat(to_nfa(left), to_nfa(right)),
        Expression::Union(left, right) => union(to_nfa(left), to_nfa(right)),
        Expression::Star(inner) => kleene_star(to_nfa(inner)),
        Expression::Plus(inner) => one_or_more(to_nfa(inner)),
        Expression::Optional(inner) => zero_or_one(to_nfa(inner)),
    }
}
