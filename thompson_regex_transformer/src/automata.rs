use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Display, Formatter};
use derive_getters::Getters;
use itertools::Itertools;

pub type StateId = usize;

/// Every freshly built or merged automaton starts here.
pub const INITIAL_STATE: StateId = 0;

/// Label on an edge. `Epsilon` edges are taken without consuming input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Epsilon,
    Symbol(char),
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Epsilon => write!(f, "ε"),
            Label::Symbol(c) => write!(f, "{c:?}"),
        }
    }
}

/// A nondeterministic finite automaton together with its current
/// configuration (`active`).
///
/// Equality is structural: states, transitions and accepting states are
/// compared, the alphabet and the active set are not.
#[derive(Clone, Getters)]
pub struct Nfa {
    states: BTreeSet<StateId>,
    alphabet: BTreeSet<char>,
    transitions: BTreeMap<(StateId, Label), BTreeSet<StateId>>,
    accepting: BTreeSet<StateId>,
    active: BTreeSet<StateId>,
}

impl Nfa {
    /// Blank automaton: only the initial state, nothing accepting.
    pub fn new() -> Self {
        Self {
            states: BTreeSet::from([INITIAL_STATE]),
            alphabet: BTreeSet::new(),
            transitions: BTreeMap::new(),
            accepting: BTreeSet::new(),
            active: BTreeSet::from([INITIAL_STATE]),
        }
    }

    pub fn add_state(&mut self, state: StateId, accepting: bool) {
        self.states.insert(state);
        if accepting {
            self.accepting.insert(state);
        }
    }

    /// Records the destination set for `(from, label)`, replacing any
    /// previous one. Both endpoints become members of the state set.
    pub fn add_transition<I>(&mut self, from: StateId, label: Label, to: I)
    where
        I: IntoIterator<Item = StateId>,
    {
        let to: BTreeSet<StateId> = to.into_iter().collect();
        self.states.insert(from);
        self.states.extend(to.iter().copied());
        if let Label::Symbol(c) = label {
            self.alphabet.insert(c);
        }
        self.transitions.insert((from, label), to);
    }

    /// Moves every active state along its `symbol` edges, then closes the
    /// result over epsilon edges. A dead automaton stays dead.
    pub fn feed_symbol(&mut self, symbol: char) {
        if self.is_dead() {
            return;
        }

        let label = Label::Symbol(symbol);
        let next: BTreeSet<StateId> = self
            .active
            .iter()
            .filter_map(|&state| self.transitions.get(&(state, label)))
            .flatten()
            .copied()
            .collect();

        self.active = next;
        self.epsilon_closure();
    }

    /// Feeds `symbols` in order. With `stop_if_dead` the remaining input is
    /// skipped as soon as the active set empties.
    pub fn feed_symbols<I>(&mut self, symbols: I, stop_if_dead: bool)
    where
        I: IntoIterator<Item = char>,
    {
        for symbol in symbols {
            self.feed_symbol(symbol);

            if stop_if_dead && self.is_dead() {
                return;
            }
        }
    }

    fn epsilon_closure(&mut self) {
        let mut pending: Vec<StateId> = self.active.iter().copied().collect();

        while let Some(state) = pending.pop() {
            if let Some(targets) = self.transitions.get(&(state, Label::Epsilon)) {
                for &target in targets {
                    if self.active.insert(target) {
                        pending.push(target);
                    }
                }
            }
        }
    }

    pub fn is_accepting(&self) -> bool {
        !self.active.is_disjoint(&self.accepting)
    }

    pub fn is_dead(&self) -> bool {
        self.active.is_empty()
    }

    pub fn reset(&mut self) {
        self.active = BTreeSet::from([INITIAL_STATE]);
        self.epsilon_closure();
    }

    /// Runs a whole input from the initial configuration and reports
    /// whether it ends in an accepting state.
    pub fn matches<I>(&mut self, symbols: I) -> bool
    where
        I: IntoIterator<Item = char>,
    {
        self.reset();
        self.feed_symbols(symbols, true);
        self.is_accepting()
    }

    pub(crate) fn max_state(&self) -> StateId {
        self.states.last().copied().unwrap_or(INITIAL_STATE)
    }

    pub(crate) fn min_state(&self) -> StateId {
        self.states.first().copied().unwrap_or(INITIAL_STATE)
    }

    pub(crate) fn clear_accepting(&mut self) {
        self.accepting.clear();
    }

    /// Renumbers every state reference by `delta`.
    pub(crate) fn shift(self, delta: StateId) -> Self {
        let moved = |set: BTreeSet<StateId>| -> BTreeSet<StateId> {
            set.into_iter().map(|state| state + delta).collect()
        };

        Self {
            states: moved(self.states),
            alphabet: self.alphabet,
            transitions: self
                .transitions
                .into_iter()
                .map(|((from, label), to)| ((from + delta, label), moved(to)))
                .collect(),
            accepting: moved(self.accepting),
            active: moved(self.active),
        }
    }

    /// Splices `other` into `self`. The result accepts where `other` did.
    /// Callers shift `other` first so the two only meet where intended.
    pub(crate) fn merge(&mut self, other: Nfa) {
        self.accepting = other.accepting;
        self.states.extend(other.states);
        self.alphabet.extend(other.alphabet);
        for (key, to) in other.transitions {
            self.transitions.entry(key).or_default().extend(to);
        }
    }
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Nfa {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states
            && self.transitions == other.transitions
            && self.accepting == other.accepting
    }
}

impl Eq for Nfa {}

impl Debug for Nfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "NFA:")?;
        writeln!(f, "Alphabet: {{{}}}", self.alphabet.iter().join(", "))?;
        writeln!(f, "States: {{{}}}", self.states.iter().join(", "))?;
        writeln!(f, "Transitions:")?;
        for ((from, label), to) in &self.transitions {
            writeln!(f, "    {from} --{label}--> {{{}}}", to.iter().join(", "))?;
        }
        writeln!(f, "Accepting states: {{{}}}", self.accepting.iter().join(", "))?;
        writeln!(f, "Active states: {{{}}}", self.active.iter().join(", "))?;
        writeln!(f, "Accepting: {}", if self.is_accepting() { "Yes" } else { "No" })
    }
}
