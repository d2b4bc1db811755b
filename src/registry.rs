//! Class registry and top-level manifest.
//!
//! Both are owned by exactly one generation run and only ever grow; the one
//! exception is rolling back the classes of a document that failed midway.
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::AggregateError;
use crate::ir::ClassDefinition;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ClassRegistry {
    classes: IndexMap<String, ClassDefinition>,
}

/// Outcome of [`ClassRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    /// Same name, same structure.
    Identical,
    /// Same name, different structure; the first definition is kept.
    Shadowed,
}

impl ClassRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn contains(&self, fqn: &str) -> bool { self.classes.contains_key(fqn) }

    pub fn get(&self, fqn: &str) -> Option<&ClassDefinition> { self.classes.get(fqn) }

    pub fn len(&self) -> usize { self.classes.len() }

    pub fn is_empty(&self) -> bool { self.classes.is_empty() }

    /// Insertion order, which is also a valid dependency order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Marker for [`rollback`](Self::rollback).
    pub fn checkpoint(&self) -> usize { self.classes.len() }

    /// Drop everything registered since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: usize) {
        self.classes.truncate(checkpoint);
    }

    /// First writer wins.
    pub fn register(&mut self, class: ClassDefinition) -> Registration {
        let fqn = class.fully_qualified_name();
        match self.classes.get(&fqn) {
            Some(existing) if *existing == class => Registration::Identical,
            Some(_) => {
                tracing::debug!(class = %fqn, "class already registered with a different shape; keeping the first");
                Registration::Shadowed
            }
            None => {
                tracing::trace!(class = %fqn, "registered class");
                self.classes.insert(fqn, class);
                Registration::Inserted
            }
        }
    }
}

/// Fully-qualified names of top-level classes, one per processed document.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TopLevelManifest {
    entries: IndexSet<String>,
}

impl TopLevelManifest {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, fqn: String) -> Result<(), AggregateError> {
        if self.entries.contains(&fqn) {
            return Err(AggregateError::DuplicateTopLevel(fqn));
        }
        self.entries.insert(fqn);
        Ok(())
    }

    pub fn contains(&self, fqn: &str) -> bool { self.entries.contains(fqn) }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Field, PrimitiveKind, TypeDescriptor};

    fn class(name: &str, field: &str, kind: PrimitiveKind) -> ClassDefinition {
        ClassDefinition {
            name: name.into(),
            namespace: vec!["Ns".into()],
            fields: vec![Field {
                source_key: field.into(),
                sanitized_name: field.into(),
                ty: TypeDescriptor::Primitive(kind),
            }],
        }
    }

    #[test]
    fn first_writer_wins() {
        let mut reg = ClassRegistry::new();
        assert_eq!(reg.register(class("A", "x", PrimitiveKind::Int)), Registration::Inserted);
        assert_eq!(reg.register(class("A", "x", PrimitiveKind::Int)), Registration::Identical);
        assert_eq!(reg.register(class("A", "y", PrimitiveKind::Bool)), Registration::Shadowed);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("Ns::A").unwrap().fields[0].source_key, "x");
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut reg = ClassRegistry::new();
        for n in ["C", "A", "B"] {
            reg.register(class(n, "x", PrimitiveKind::Int));
        }
        assert_eq!(reg.names().collect::<Vec<_>>(), ["Ns::C", "Ns::A", "Ns::B"]);
    }

    #[test]
    fn rollback_drops_later_classes() {
        let mut reg = ClassRegistry::new();
        reg.register(class("A", "x", PrimitiveKind::Int));
        let mark = reg.checkpoint();
        reg.register(class("B", "x", PrimitiveKind::Int));
        reg.register(class("C", "x", PrimitiveKind::Int));
        reg.rollback(mark);
        assert_eq!(reg.names().collect::<Vec<_>>(), ["Ns::A"]);
        assert!(!reg.contains("Ns::B"));
    }

    #[test]
    fn manifest_refuses_duplicates() {
        let mut m = TopLevelManifest::new();
        m.push("A::A".into()).unwrap();
        m.push("B::B".into()).unwrap();
        assert_eq!(
            m.push("A::A".into()),
            Err(AggregateError::DuplicateTopLevel("A::A".into()))
        );
        assert_eq!(m.iter().collect::<Vec<_>>(), ["A::A", "B::B"]);
    }
}
