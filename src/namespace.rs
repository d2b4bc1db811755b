//! Namespace paths from source locations.
use std::path::{Component, Path};

use crate::naming::name_case;

/// `task/run-loop` + `task_config` → `["Task", "RunLoop", "TaskConfig"]`.
///
/// Root-level documents (empty or `.` directory) get only the base-name segment.
pub fn resolve(relative_dir: &Path, base_name: &str) -> Vec<String> {
    let mut out: Vec<String> = relative_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(seg) => Some(name_case(&seg.to_string_lossy())),
            _ => None,
        })
        .filter(|seg| !seg.is_empty())
        .collect();
    out.push(name_case(base_name));
    out
}
