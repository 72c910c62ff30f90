//! The production registry (component H): lookup of a compiled state
//! table by `{name, n?, c?, t?}`, per §6.
//!
//! Productions are registered under one of four parameter shapes —
//! unparameterized, indentation-only (`n`), context-only (`c`), or
//! chomping-only (`t`) — matching the four kinds of block-collection and
//! scalar productions that need a parameter at all. Context-parameterized
//! lookups use a single `:` separator between the production name and the
//! context string (the first Open Question in §9, resolved that way
//! because production names are themselves drawn from a fixed,
//! colon-free identifier set).

use crate::machine::StateTable;

/// A requested (or registered) production identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Production {
    /// Production name, e.g. `"block-mapping"`.
    pub name: &'static str,
    /// Indentation parameter, for block-collection productions.
    pub n: Option<i64>,
    /// Context parameter (flow vs. block, key vs. value), for productions
    /// whose grammar forks on it.
    pub c: Option<&'static str>,
    /// Chomping parameter (`strip`/`clip`/`keep`), for block scalars.
    pub t: Option<&'static str>,
}

impl Production {
    /// An unparameterized production.
    pub const fn simple(name: &'static str) -> Self {
        Production {
            name,
            n: None,
            c: None,
            t: None,
        }
    }

    /// An indentation-parameterized production.
    pub const fn indented(name: &'static str, n: i64) -> Self {
        Production {
            name,
            n: Some(n),
            c: None,
            t: None,
        }
    }

    /// A context-parameterized production.
    pub const fn contextual(name: &'static str, c: &'static str) -> Self {
        Production {
            name,
            n: None,
            c: Some(c),
            t: None,
        }
    }

    /// A chomping-parameterized production.
    pub const fn chomped(name: &'static str, t: &'static str) -> Self {
        Production {
            name,
            n: None,
            c: None,
            t: Some(t),
        }
    }

    /// The key this production resolves under: the name alone for
    /// unparameterized and indentation-parameterized productions (`n` is
    /// carried as live machine state, not part of the lookup key), or
    /// `"name:context"`/`"name:chomping"` otherwise.
    fn key(&self) -> String {
        match (self.c, self.t) {
            (Some(c), _) => format!("{}:{}", self.name, c),
            (None, Some(t)) => format!("{}:{}", self.name, t),
            (None, None) => self.name.to_string(),
        }
    }
}

/// A single registered entry: the key it was registered under and its
/// compiled table. First match wins on lookup, so earlier registrations
/// shadow later ones with the same key.
struct Entry {
    key: String,
    table: StateTable,
}

/// The set of productions a parser can dispatch to.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Registry {
            entries: Vec::new(),
        }
    }

    /// Register `table` under `production`'s key. Earlier registrations
    /// under the same key take precedence on lookup (first-match-wins),
    /// so later `register` calls for the same key are effectively
    /// fallbacks.
    pub fn register(&mut self, production: &Production, table: StateTable) {
        self.entries.push(Entry {
            key: production.key(),
            table,
        });
    }

    /// Look up the table registered for `production`'s key.
    pub fn lookup(&self, production: &Production) -> Option<StateTable> {
        let key = production.key();
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{Action, Guard, StateDef};

    static TABLE_A: &[StateDef] = &[StateDef {
        guard: Guard::None,
        actions: &[Action::Success],
        transitions: &[],
    }];
    static TABLE_B: &[StateDef] = &[StateDef {
        guard: Guard::None,
        actions: &[Action::Failure],
        transitions: &[],
    }];

    #[test]
    fn unparameterized_lookup_ignores_indentation() {
        let mut registry = Registry::new();
        registry.register(&Production::simple("scalar"), TABLE_A);
        let found = registry
            .lookup(&Production::indented("scalar", 4))
            .unwrap();
        assert!(std::ptr::eq(found, TABLE_A));
    }

    #[test]
    fn contextual_lookups_are_distinct_by_context() {
        let mut registry = Registry::new();
        registry.register(&Production::contextual("node", "block-in"), TABLE_A);
        registry.register(&Production::contextual("node", "flow-in"), TABLE_B);
        assert!(std::ptr::eq(
            registry
                .lookup(&Production::contextual("node", "block-in"))
                .unwrap(),
            TABLE_A
        ));
        assert!(std::ptr::eq(
            registry
                .lookup(&Production::contextual("node", "flow-in"))
                .unwrap(),
            TABLE_B
        ));
    }

    #[test]
    fn first_registration_wins_on_duplicate_keys() {
        let mut registry = Registry::new();
        registry.register(&Production::simple("scalar"), TABLE_A);
        registry.register(&Production::simple("scalar"), TABLE_B);
        assert!(std::ptr::eq(
            registry.lookup(&Production::simple("scalar")).unwrap(),
            TABLE_A
        ));
    }

    #[test]
    fn unknown_production_misses() {
        let registry = Registry::new();
        assert!(registry.lookup(&Production::simple("missing")).is_none());
    }
}
