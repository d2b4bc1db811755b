//! Aggregate descriptor: one reloadable member per top-level class.
//!
//! For a top-level class `Task::TaskConfig::auto_TaskConfig`:
//! - member name: namespace segments snake-cased and joined → `task_task_config`
//! - source path: namespace minus the file segment, plus the snake-cased class
//!   name → `task/task_config.yaml`
//! - lookup key: the member name lower-cased with `_` runs collapsed; this is
//!   the string the generated `update_from_yaml(name, ..)` dispatches on.
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::AggregateError;
use crate::naming::{camel_to_snake, canonical_key, strip_top_level};
use crate::registry::{ClassRegistry, TopLevelManifest};

pub const DEFAULT_AGGREGATE_NAME: &str = "ConfigCollect";
const FALLBACK_MEMBER: &str = "config";
const SOURCE_EXT: &str = "yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateMember {
    pub class: String,
    pub member_name: String,
    pub source_path: String,     // relative to the reload base path, `/`-separated
    pub lookup_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateDescriptor {
    pub name: String,
    pub members: Vec<AggregateMember>,
}

impl AggregateDescriptor {
    pub fn member(&self, lookup_key: &str) -> Option<&AggregateMember> {
        self.members.iter().find(|m| m.lookup_key == lookup_key)
    }
}

/// Fails on the first lookup-key collision instead of letting one member
/// shadow another.
pub fn build(
    name: &str,
    manifest: &TopLevelManifest,
    registry: &ClassRegistry,
) -> Result<AggregateDescriptor, AggregateError> {
    let mut by_key: IndexMap<String, AggregateMember> = IndexMap::with_capacity(manifest.len());

    for fqn in manifest.iter() {
        let class = registry
            .get(fqn)
            .ok_or_else(|| AggregateError::UnknownClass(fqn.to_string()))?;

        let member = derive_member(fqn, &class.namespace, &class.name);
        if let Some(existing) = by_key.get(&member.lookup_key) {
            return Err(AggregateError::NameCollision {
                key: member.lookup_key,
                first: existing.class.clone(),
                second: fqn.to_string(),
            });
        }
        by_key.insert(member.lookup_key.clone(), member);
    }

    Ok(AggregateDescriptor {
        name: name.to_string(),
        members: by_key.into_values().collect(),
    })
}

fn derive_member(fqn: &str, namespace: &[String], class_name: &str) -> AggregateMember {
    let snake: Vec<String> = namespace.iter().map(|s| camel_to_snake(s)).collect();

    let member_name = if snake.is_empty() {
        FALLBACK_MEMBER.to_string()
    } else {
        snake.join("_")
    };

    let file = format!("{}.{SOURCE_EXT}", camel_to_snake(strip_top_level(class_name)));
    let source_path = match snake.split_last() {
        Some((_file_segment, dirs)) if !dirs.is_empty() => format!("{}/{file}", dirs.join("/")),
        _ => file,
    };

    AggregateMember {
        class: fqn.to_string(),
        lookup_key: canonical_key(&member_name),
        member_name,
        source_path,
    }
}
