use indexmap::IndexSet;
use std::collections::{BTreeSet, HashMap};

use super::{CharClass, Regex};

/// One row of the followpos table. `symbol` is `None` for the end marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowposEntry {
    pub position: usize,
    pub symbol: Option<CharClass>,
    pub follow: Vec<usize>,
}

/// States visited while running a [`Dfa`] over an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    /// Start state first, then one state per consumed character.
    pub states: Vec<usize>,
    /// Character index at which no transition existed.
    pub stuck_at: Option<usize>,
    pub accepted: bool,
}

/// Deterministic automaton over [`CharClass`]. State 0 is the start state;
/// a missing transition rejects.
#[derive(Debug, Clone)]
pub struct Dfa {
    transitions: Vec<[Option<usize>; 2]>,
    accepting: Vec<bool>,
    followpos: Vec<FollowposEntry>,
}

#[derive(Debug)]
struct Node {
    nullable: bool,
    firstpos: BTreeSet<usize>,
    lastpos: BTreeSet<usize>,
}

/// Numbers leaves and accumulates followpos while walking the tree.
#[derive(Default)]
struct Positions {
    /// Symbol of position `i + 1`.
    symbols: Vec<Option<CharClass>>,
    follow: Vec<BTreeSet<usize>>,
}

impl Positions {
    fn leaf(&mut self, symbol: Option<CharClass>) -> Node {
        self.symbols.push(symbol);
        self.follow.push(BTreeSet::new());
        let position = self.symbols.len();
        Node {
            nullable: false,
            firstpos: BTreeSet::from([position]),
            lastpos: BTreeSet::from([position]),
        }
    }

    fn add_follow(&mut self, from: &BTreeSet<usize>, to: &BTreeSet<usize>) {
        for &i in from {
            self.follow[i - 1].extend(to.iter().copied());
        }
    }

    fn annotate(&mut self, regex: &Regex) -> Node {
        match regex {
            Regex::Symbol(class) => self.leaf(Some(*class)),
            Regex::Concat(l, r) => {
                let l = self.annotate(l);
                let r = self.annotate(r);
                self.add_follow(&l.lastpos, &r.firstpos);
                concat(l, r)
            }
            Regex::Alt(l, r) => {
                let l = self.annotate(l);
                let r = self.annotate(r);
                Node {
                    nullable: l.nullable || r.nullable,
                    firstpos: &l.firstpos | &r.firstpos,
                    lastpos: &l.lastpos | &r.lastpos,
                }
            }
            Regex::Star(inner) => {
                let n = self.annotate(inner);
                self.add_follow(&n.lastpos, &n.firstpos);
                Node {
                    nullable: true,
                    ..n
                }
            }
            Regex::Plus(inner) => {
                let n = self.annotate(inner);
                self.add_follow(&n.lastpos, &n.firstpos);
                n
            }
            Regex::Optional(inner) => Node {
                nullable: true,
                ..self.annotate(inner)
            },
        }
    }
}

fn concat(l: Node, r: Node) -> Node {
    Node {
        nullable: l.nullable && r.nullable,
        firstpos: if l.nullable {
            &l.firstpos | &r.firstpos
        } else {
            l.firstpos.clone()
        },
        lastpos: if r.nullable {
            &l.lastpos | &r.lastpos
        } else {
            r.lastpos.clone()
        },
    }
}

impl Dfa {
    /// Direct construction: augment with an end marker, compute followpos,
    /// then run subset construction over position sets.
    pub fn from_regex(regex: &Regex) -> Dfa {
        let mut positions = Positions::default();
        let body = positions.annotate(regex);
        let end = positions.leaf(None);
        positions.add_follow(&body.lastpos, &end.firstpos);
        let root = concat(body, end);
        let end_position = positions.symbols.len();

        let mut states: IndexSet<BTreeSet<usize>> = IndexSet::new();
        states.insert(root.firstpos);
        let mut transitions = Vec::new();
        let mut next = 0;
        while let Some(set) = states.get_index(next) {
            let set = set.clone();
            let mut row = [None; 2];
            for class in CharClass::ALL {
                let target: BTreeSet<usize> = set
                    .iter()
                    .filter(|&&p| positions.symbols[p - 1] == Some(class))
                    .flat_map(|&p| positions.follow[p - 1].iter().copied())
                    .collect();
                if !target.is_empty() {
                    let (index, _) = states.insert_full(target);
                    row[class.index()] = Some(index);
                }
            }
            transitions.push(row);
            next += 1;
        }

        let accepting = states.iter().map(|s| s.contains(&end_position)).collect();
        let followpos = positions
            .symbols
            .iter()
            .zip(&positions.follow)
            .enumerate()
            .map(|(i, (symbol, follow))| FollowposEntry {
                position: i + 1,
                symbol: *symbol,
                follow: follow.iter().copied().collect(),
            })
            .collect();

        let dfa = Dfa {
            transitions,
            accepting,
            followpos,
        };
        log::debug!(
            "built dfa for {}: {} positions, {} states",
            regex.to_postfix(),
            end_position,
            dfa.state_count()
        );
        dfa
    }

    /// Merge equivalent states by refining the accepting / non-accepting
    /// partition until it is stable.
    pub fn minimize(&self) -> Dfa {
        let mut group: Vec<usize> = renumber(self.accepting.iter().copied());
        let mut count = group_count(&group);

        loop {
            let signatures = (0..self.state_count()).map(|s| {
                let targets = self.transitions[s].map(|t| t.map(|t| group[t]));
                (group[s], targets)
            });
            let refined = renumber(signatures);
            let refined_count = group_count(&refined);
            group = refined;
            if refined_count == count {
                break;
            }
            count = refined_count;
        }

        let mut transitions = vec![[None; 2]; count];
        let mut accepting = vec![false; count];
        for state in 0..self.state_count() {
            let g = group[state];
            transitions[g] = self.transitions[state].map(|t| t.map(|t| group[t]));
            accepting[g] = self.accepting[state];
        }

        log::debug!(
            "minimized dfa: {} -> {} states",
            self.state_count(),
            count
        );
        Dfa {
            transitions,
            accepting,
            followpos: self.followpos.clone(),
        }
    }

    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accepting.get(state).copied().unwrap_or(false)
    }

    pub fn transition(&self, state: usize, class: CharClass) -> Option<usize> {
        self.transitions.get(state).and_then(|row| row[class.index()])
    }

    pub fn accepts(&self, input: &str) -> bool {
        self.trace(input).accepted
    }

    /// Run the automaton, recording each state entered.
    pub fn trace(&self, input: &str) -> Trace {
        let mut state = 0;
        let mut states = vec![state];
        for (i, c) in input.chars().enumerate() {
            match CharClass::classify(c).and_then(|class| self.transition(state, class)) {
                Some(next) => {
                    state = next;
                    states.push(state);
                }
                None => {
                    return Trace {
                        states,
                        stuck_at: Some(i),
                        accepted: false,
                    }
                }
            }
        }
        Trace {
            states,
            stuck_at: None,
            accepted: self.is_accepting(state),
        }
    }

    /// Followpos of every position of the augmented pattern.
    pub fn followpos_table(&self) -> &[FollowposEntry] {
        &self.followpos
    }

    /// Graphviz description, states named `S0`, `S1`, ...
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph dfa {\n    rankdir=LR;\n    start [shape=none, label=\"\"];\n");
        for state in 0..self.state_count() {
            let shape = if self.accepting[state] {
                "doublecircle"
            } else {
                "circle"
            };
            out.push_str(&format!("    S{} [shape={}];\n", state, shape));
        }
        out.push_str("    start -> S0;\n");
        for (state, row) in self.transitions.iter().enumerate() {
            for class in CharClass::ALL {
                if let Some(target) = row[class.index()] {
                    out.push_str(&format!(
                        "    S{} -> S{} [label=\"{}\"];\n",
                        state, target, class
                    ));
                }
            }
        }
        out.push_str("}\n");
        out
    }
}

/// Number distinct keys in order of first appearance.
fn renumber<K: Eq + std::hash::Hash>(keys: impl Iterator<Item = K>) -> Vec<usize> {
    let mut ids: HashMap<K, usize> = HashMap::new();
    let mut numbered = Vec::new();
    for key in keys {
        let next = ids.len();
        numbered.push(*ids.entry(key).or_insert(next));
    }
    numbered
}

fn group_count(group: &[usize]) -> usize {
    group.iter().max().map_or(0, |m| m + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dfa(pattern: &str) -> Dfa {
        Dfa::from_regex(&Regex::parse(pattern).unwrap())
    }

    fn words(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut all = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for w in &frontier {
                for &c in alphabet {
                    let mut w = w.clone();
                    w.push(c);
                    next.push(w);
                }
            }
            all.extend(next.iter().cloned());
            frontier = next;
        }
        all
    }

    #[test]
    fn followpos_of_identifier_pattern() {
        let table = dfa("L(L|D)*").followpos_table().to_vec();
        assert_eq!(
            table,
            vec![
                FollowposEntry {
                    position: 1,
                    symbol: Some(CharClass::Letter),
                    follow: vec![2, 3, 4],
                },
                FollowposEntry {
                    position: 2,
                    symbol: Some(CharClass::Letter),
                    follow: vec![2, 3, 4],
                },
                FollowposEntry {
                    position: 3,
                    symbol: Some(CharClass::Digit),
                    follow: vec![2, 3, 4],
                },
                FollowposEntry {
                    position: 4,
                    symbol: None,
                    follow: vec![],
                },
            ]
        );
    }

    #[test]
    fn identifier_construction() {
        let d = dfa("L(L|D)*");
        assert_eq!(d.state_count(), 2);
        assert!(!d.is_accepting(0));
        assert!(d.is_accepting(1));
        assert_eq!(d.transition(0, CharClass::Letter), Some(1));
        assert_eq!(d.transition(0, CharClass::Digit), None);
        assert_eq!(d.transition(1, CharClass::Digit), Some(1));
    }

    #[test]
    fn minimize_merges_equivalent_states() {
        // The letter and digit branches lead to states with identical futures.
        let d = dfa("(LL*)|(DL*)");
        assert_eq!(d.state_count(), 3);
        let min = d.minimize();
        assert_eq!(min.state_count(), 2);
        for w in words(&['a', '1'], 5) {
            assert_eq!(d.accepts(&w), min.accepts(&w), "{:?}", w);
        }
    }

    #[test]
    fn minimize_preserves_language() {
        for pattern in ["L(L|D)*", "D+", "(L|D)*D(L|D)?", "LD?L+", "(LD|DL)*"] {
            let d = dfa(pattern);
            let min = d.minimize();
            assert!(min.state_count() <= d.state_count(), "{}", pattern);
            for w in words(&['x', '7'], 6) {
                assert_eq!(d.accepts(&w), min.accepts(&w), "{} on {:?}", pattern, w);
            }
        }
    }

    #[test]
    fn minimize_is_idempotent() {
        let once = dfa("(L|D)*D(L|D)?").minimize();
        let twice = once.minimize();
        assert_eq!(once.state_count(), twice.state_count());
    }

    #[test]
    fn optional_and_plus_semantics() {
        let d = dfa("LD?L+");
        assert!(d.accepts("ab"));
        assert!(d.accepts("a1b"));
        assert!(d.accepts("a1bcd"));
        assert!(!d.accepts("a"));
        assert!(!d.accepts("a1"));
        assert!(!d.accepts("a11b"));
    }

    #[test]
    fn trace_reports_states_and_stuck_position() {
        let d = dfa("L(L|D)*");
        let ok = d.trace("ab1");
        assert_eq!(ok.states, vec![0, 1, 1, 1]);
        assert_eq!(ok.stuck_at, None);
        assert!(ok.accepted);

        let bad = d.trace("a-b");
        assert_eq!(bad.states, vec![0, 1]);
        assert_eq!(bad.stuck_at, Some(1));
        assert!(!bad.accepted);

        let empty = d.trace("");
        assert_eq!(empty.states, vec![0]);
        assert!(!empty.accepted);
    }

    #[test]
    fn dot_output() {
        let dot = dfa("D+").to_dot();
        assert!(dot.starts_with("digraph dfa {"));
        assert!(dot.contains("S0 [shape=circle];"));
        assert!(dot.contains("S1 [shape=doublecircle];"));
        assert!(dot.contains("start -> S0;"));
        assert!(dot.contains("S0 -> S1 [label=\"D\"];"));
        assert!(dot.contains("S1 -> S1 [label=\"D\"];"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
