//! Matching of `[` and `]` positions, computed once per program before
//! execution begins.

use std::fmt;

use crate::machine::MachineError;
use crate::op::Op;

/// Which side of a loop was left unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketSide {
    Open,
    Close,
}

impl fmt::Display for BracketSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketSide::Open => write!(f, "'['"),
            BracketSide::Close => write!(f, "']'"),
        }
    }
}

/// Bidirectional mapping between matching bracket positions, keyed by
/// absolute index into the instruction stream.
///
/// Built in one linear pass with a stack of pending `[` positions, so each
/// `]` always pairs with its innermost still-open loop. A `]` with nothing
/// to pop, or a `[` still pending at the end of the scan, makes the whole
/// program malformed; no instruction executes in that case.
#[derive(Debug)]
pub struct BracketIndex {
    pairs: Vec<Option<usize>>,
}

impl BracketIndex {
    pub fn build(program: &[char]) -> Result<Self, MachineError> {
        let mut pairs: Vec<Option<usize>> = vec![None; program.len()];
        let mut stack: Vec<usize> = Vec::new();

        for (i, &c) in program.iter().enumerate() {
            match Op::from_char(c) {
                Some(Op::LoopOpen) => stack.push(i),
                Some(Op::LoopClose) => {
                    let Some(open) = stack.pop() else {
                        return Err(MachineError::UnmatchedBracket {
                            ip: i,
                            kind: BracketSide::Close,
                        });
                    };
                    pairs[open] = Some(i);
                    pairs[i] = Some(open);
                }
                _ => {}
            }
        }

        if let Some(&open) = stack.last() {
            return Err(MachineError::UnmatchedBracket {
                ip: open,
                kind: BracketSide::Open,
            });
        }

        Ok(Self { pairs })
    }

    /// The matching position for the bracket at `ip`, or `None` for
    /// positions that do not hold a bracket.
    pub fn partner(&self, ip: usize) -> Option<usize> {
        self.pairs.get(ip).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(program: &str) -> Result<BracketIndex, MachineError> {
        let chars: Vec<char> = program.chars().collect();
        BracketIndex::build(&chars)
    }

    #[test]
    fn pairs_nested_loops_inside_out() {
        let idx = build("+[>[-]<]").unwrap();
        assert_eq!(idx.partner(1), Some(7));
        assert_eq!(idx.partner(7), Some(1));
        assert_eq!(idx.partner(3), Some(5));
        assert_eq!(idx.partner(5), Some(3));
    }

    #[test]
    fn non_bracket_positions_have_no_partner() {
        let idx = build("+[-]").unwrap();
        assert_eq!(idx.partner(0), None);
        assert_eq!(idx.partner(2), None);
        assert_eq!(idx.partner(99), None);
    }

    #[test]
    fn comment_brackets_still_pair_by_absolute_index() {
        // The index is keyed by position in the raw text, comments included.
        let idx = build("x[y]z").unwrap();
        assert_eq!(idx.partner(1), Some(3));
        assert_eq!(idx.partner(3), Some(1));
    }

    #[test]
    fn unmatched_close_reports_its_position() {
        let err = build("+]").unwrap_err();
        assert!(matches!(
            err,
            MachineError::UnmatchedBracket { ip: 1, kind: BracketSide::Close }
        ));
    }

    #[test]
    fn unmatched_open_reports_its_position() {
        let err = build("[[-]").unwrap_err();
        assert!(matches!(
            err,
            MachineError::UnmatchedBracket { ip: 0, kind: BracketSide::Open }
        ));
    }

    #[test]
    fn failure_is_deterministic() {
        for _ in 0..3 {
            let err = build("][").unwrap_err();
            assert!(matches!(
                err,
                MachineError::UnmatchedBracket { ip: 0, kind: BracketSide::Close }
            ));
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn balanced_program() -> impl Strategy<Value = String> {
        let leaf = prop::string::string_regex("[+<>.,]{0,8}").unwrap();
        leaf.prop_recursive(4, 64, 4, |inner| {
            (inner.clone(), inner.clone(), inner)
                .prop_map(|(a, b, c)| format!("{a}[{b}]{c}"))
        })
    }

    proptest! {
        #[test]
        fn open_close_open_round_trips(program in balanced_program()) {
            let chars: Vec<char> = program.chars().collect();
            let idx = BracketIndex::build(&chars).unwrap();
            for (i, &c) in chars.iter().enumerate() {
                if c == '[' {
                    let close = idx.partner(i).expect("every open has a partner");
                    prop_assert!(close > i);
                    prop_assert_eq!(chars[close], ']');
                    prop_assert_eq!(idx.partner(close), Some(i));
                }
            }
        }

        #[test]
        fn stray_close_always_fails(prefix in "[+<>.,]{0,8}") {
            let program = format!("{prefix}]");
            let chars: Vec<char> = program.chars().collect();
            prop_assert!(BracketIndex::build(&chars).is_err());
        }
    }
}
