//! Class graph construction.
//!
//! One document root becomes a tree of [`ClassDefinition`]s. Nested classes are
//! registered before the class that references them, so the registry's
//! insertion order is always a valid dependency order.
use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::GraphError;
use crate::inference;
use crate::ir::{qualify, ClassDefinition, Field};
use crate::naming::sanitize_field_name;
use crate::registry::{ClassRegistry, Registration};
use crate::value::SchemaValue;

pub const DEFAULT_MAX_DEPTH: usize = 64;

pub struct ClassGraphBuilder<'r> {
    registry: &'r mut ClassRegistry,
    max_depth: usize,
    depth: usize,
}

impl<'r> ClassGraphBuilder<'r> {
    pub fn new(registry: &'r mut ClassRegistry) -> Self {
        Self { registry, max_depth: DEFAULT_MAX_DEPTH, depth: 0 }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build `class_name` under `namespace` and everything it transitively
    /// references. Returns the fully-qualified name. Memoized: a name already
    /// in the registry is returned without looking at `root`.
    pub fn build(
        &mut self,
        class_name: &str,
        root: &IndexMap<String, SchemaValue>,
        namespace: &[String],
    ) -> Result<String, GraphError> {
        self.build_class(class_name, root, namespace).map(|(fqn, _)| fqn)
    }

    /// [`build`](Self::build) for a document root. The root must end up as
    /// its own registered definition, not memoized onto an existing class or
    /// shadowed by a nested class of the same name.
    pub fn build_root(
        &mut self,
        class_name: &str,
        root: &IndexMap<String, SchemaValue>,
        namespace: &[String],
    ) -> Result<String, GraphError> {
        match self.build_class(class_name, root, namespace)? {
            (fqn, Some(Registration::Inserted)) => Ok(fqn),
            (fqn, _) => Err(GraphError::RootShadowed(fqn)),
        }
    }

    fn build_class(
        &mut self,
        class_name: &str,
        root: &IndexMap<String, SchemaValue>,
        namespace: &[String],
    ) -> Result<(String, Option<Registration>), GraphError> {
        let fqn = qualify(namespace, class_name);
        if self.registry.contains(&fqn) {
            return Ok((fqn, None));
        }

        self.enter(&fqn)?;
        let fields = self.infer_fields(root, namespace);
        self.leave();

        let registration = self.registry.register(ClassDefinition {
            name: class_name.to_string(),
            namespace: namespace.to_vec(),
            fields: fields?,
        });
        Ok((fqn, Some(registration)))
    }

    fn infer_fields(
        &mut self,
        root: &IndexMap<String, SchemaValue>,
        namespace: &[String],
    ) -> Result<Vec<Field>, GraphError> {
        let mut taken = HashSet::with_capacity(root.len());
        let mut fields = Vec::with_capacity(root.len());
        for (key, value) in root {
            let ty = inference::infer(self, key, value, namespace)?;
            fields.push(Field {
                source_key: key.clone(),
                sanitized_name: unique_member_name(&mut taken, sanitize_field_name(key)),
                ty,
            });
        }
        Ok(fields)
    }

    pub(crate) fn enter(&mut self, at: &str) -> Result<(), GraphError> {
        if self.depth >= self.max_depth {
            return Err(GraphError::DepthExceeded {
                at: at.to_string(),
                depth: self.depth + 1,
                max: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

// `a-b` and `a_b` both sanitize to `a_b`; later keys get a numeric suffix.
fn unique_member_name(taken: &mut HashSet<String>, sanitized: String) -> String {
    if taken.insert(sanitized.clone()) {
        return sanitized;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{sanitized}_{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
