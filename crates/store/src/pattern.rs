//! Key enumeration patterns.

use glob::Pattern;

use crate::{StoreError, StoreResult};

/// A compiled key pattern in the KEYS dialect: `*`, `?`, character classes
/// (`[abc]`, `[a-z]`, `[^a]`) and `\` escapes outside classes.
#[derive(Clone, Debug)]
pub struct KeyPattern(Pattern);

impl KeyPattern {
    pub fn new(pattern: &str) -> StoreResult<Self> {
        Pattern::new(&translate(pattern)).map(Self).map_err(|err| {
            StoreError::Command(format!("invalid key pattern {pattern:?}: {err}"))
        })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.0.matches(key)
    }
}

/// Rewrite into `glob` syntax, which has no escapes, negates with `!` and
/// reads `**` as a recursive path wildcard. Runs of stars collapse to one.
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '*' if !in_class => {
                while chars.next_if_eq(&'*').is_some() {}
                out.push('*');
            }
            '\\' if !in_class => match chars.next() {
                Some(lit @ ('*' | '?' | '[' | ']')) => {
                    out.push('[');
                    out.push(lit);
                    out.push(']');
                }
                Some(lit) => out.push(lit),
                None => out.push('\\'),
            },
            '[' if !in_class => {
                in_class = true;
                out.push('[');
                if chars.next_if_eq(&'^').is_some() {
                    out.push('!');
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            c => out.push(c),
        }
    }
    out
}
