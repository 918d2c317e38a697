//! Key namespace of a ranking.

use podium_primitives::Uid;

use crate::constants::{KEY_PREFIX, LOCK_INFIX, POINTER_INFIX, RANKING_SET_SUFFIX};

/// Every store key derived from a ranking's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    ranking_set: String,
    pointer_prefix: String,
    pointer_pattern: String,
    lock_prefix: String,
}

impl Namespace {
    pub fn new(name: &str) -> Self {
        let pointer_prefix = format!("{KEY_PREFIX}_{name}_{POINTER_INFIX}_");
        Self {
            ranking_set: format!("{KEY_PREFIX}_{name}_{RANKING_SET_SUFFIX}"),
            pointer_pattern: format!("{}*", escape_glob(&pointer_prefix)),
            pointer_prefix,
            lock_prefix: format!("{KEY_PREFIX}_{name}_{LOCK_INFIX}_"),
        }
    }

    /// Sorted set holding the score entries.
    pub fn ranking_set(&self) -> &str {
        &self.ranking_set
    }

    /// Identity pointer of `uid`.
    pub fn pointer_key(&self, uid: Uid) -> String {
        format!("{}{uid}", self.pointer_prefix)
    }

    /// Glob matching every identity pointer of this ranking.
    pub fn pointer_pattern(&self) -> &str {
        &self.pointer_pattern
    }

    /// The uid a pointer key belongs to, if it is one of ours.
    ///
    /// Pattern enumeration can also return pointers of a ranking whose name
    /// extends this one's (`a` vs `a_uid_x`); those do not parse.
    pub fn parse_pointer_key(&self, key: &str) -> Option<Uid> {
        key.strip_prefix(&self.pointer_prefix)?
            .parse::<u32>()
            .ok()
            .map(Uid::new)
    }

    /// Lock serializing score updates of `uid`.
    pub fn lock_key(&self, uid: Uid) -> String {
        format!("{}{uid}", self.lock_prefix)
    }
}

fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_store::KeyPattern;

    #[test]
    fn test_layout() {
        let ns = Namespace::new("myRanking");
        assert_eq!(ns.ranking_set(), "esrank_myRanking_ranking");
        assert_eq!(ns.pointer_key(Uid::new(42)), "esrank_myRanking_uid_42");
        assert_eq!(ns.pointer_pattern(), "esrank_myRanking_uid_*");
        assert_eq!(ns.lock_key(Uid::new(42)), "esrank_myRanking_lock_42");
    }

    #[test]
    fn test_parse_pointer_key() {
        let ns = Namespace::new("a");
        assert_eq!(ns.parse_pointer_key("esrank_a_uid_7"), Some(Uid::new(7)));
        assert_eq!(ns.parse_pointer_key("esrank_a_uid_x_uid_7"), None);
        assert_eq!(ns.parse_pointer_key("esrank_b_uid_7"), None);
        assert_eq!(ns.parse_pointer_key("esrank_a_ranking"), None);
    }

    #[test]
    fn test_pattern_escapes_glob_characters() {
        let ns = Namespace::new("weird*[name]");
        let pattern = KeyPattern::new(ns.pointer_pattern()).unwrap();
        assert!(pattern.matches(&ns.pointer_key(Uid::new(1))));
        assert!(!pattern.matches("esrank_weirdXX[name]_uid_1"));
        assert!(!pattern.matches("esrank_weird*[name]_ranking"));
    }
}
