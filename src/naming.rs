//! Pure name transforms shared by inference, namespacing and the aggregate.
//!
//! These are heuristics with known failure cases that callers rely on staying
//! stable (aggregate paths are reconstructed by inverting them):
//! - `singularize` only strips one trailing `s` (`children` stays `children`,
//!   `status` becomes `statu`).
//! - `name_case` lower-cases the tail of every word, so acronyms and camelCase
//!   keys lose their inner capitals (`HTTPServer` → `Httpserver`).
use once_cell::sync::Lazy;
use regex::Regex;

static CAMEL_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").unwrap());
static CAMEL_EDGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// `task_config` / `task-config` → `TaskConfig`.
pub fn name_case(name: &str) -> String {
    name.split(['_', '-'])
        .map(capitalize_word)
        .collect()
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}

/// Marks a document's own class. `name_case` never emits `_`, so no nested
/// class can be named like this.
pub const TOP_LEVEL_PREFIX: &str = "auto_";

/// `TaskSetting` → `auto_TaskSetting`.
pub fn top_level_name(base: &str) -> String {
    format!("{TOP_LEVEL_PREFIX}{base}")
}

pub fn strip_top_level(name: &str) -> &str {
    name.strip_prefix(TOP_LEVEL_PREFIX).unwrap_or(name)
}

/// Strip a single trailing `s`.
pub fn singularize(name: &str) -> &str {
    name.strip_suffix('s').unwrap_or(name)
}

/// Every non-alphanumeric character becomes `_`.
pub fn sanitize_field_name(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// `TaskConfig` → `task_config`, `HTTPServer` → `http_server`.
pub fn camel_to_snake(name: &str) -> String {
    let s1 = CAMEL_WORD.replace_all(name, "${1}_${2}");
    CAMEL_EDGE.replace_all(&s1, "${1}_${2}").to_lowercase()
}

/// Lower-case, collapse `_` runs and trim leading/trailing `_`.
pub fn canonical_key(name: &str) -> String {
    let lower = name.to_lowercase();
    UNDERSCORE_RUN.replace_all(&lower, "_").trim_matches('_').to_string()
}
