//! Rust renderer for a finished generation run.
//!
//! Layout of the emitted unit:
//! - private `yaml_*` conversion helpers at the root
//! - one nested `pub mod` per namespace segment (snake_case), holding that
//!   namespace's structs in registry order
//! - the aggregate struct plus its error type at the root
//!
//! Every path is relative (`super::..`), so the output compiles wherever it is
//! mounted as a module. The consuming crate needs `serde_yaml`.
use indexmap::IndexMap;

use crate::aggregate::{AggregateDescriptor, AggregateMember};
use crate::generate::GenerationOutput;
use crate::ir::{split_qualified, ClassDefinition, PrimitiveKind, TypeDescriptor};
use crate::naming::camel_to_snake;
use crate::registry::ClassRegistry;

const INDENT: &str = "    ";
const RELOAD_ERROR: &str = "ReloadError";
const LINT_ALLOW: &str = "#[allow(non_snake_case, non_camel_case_types, dead_code)]";

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];
// cannot be raw identifiers
const PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];
// taken by the aggregate's own methods
const AGGREGATE_METHODS: &[&str] = &["update_from_yaml", "update_from_yaml_all"];

pub struct Codegen {
    out: String,
}

#[derive(Default)]
struct ModNode<'a> {
    classes: Vec<&'a ClassDefinition>,
    children: IndexMap<String, ModNode<'a>>,
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

impl Codegen {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    pub fn emit(&mut self, output: &GenerationOutput) {
        self.emit_header();
        self.emit_helpers();
        self.emit_classes(&output.classes);
        self.emit_aggregate(&output.aggregate, &output.classes);
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        if !text.is_empty() {
            for _ in 0..depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn emit_header(&mut self) {
        self.line(0, "// @generated by yaml-classgen. Do not edit by hand.");
        self.line(0, "");
    }

    fn emit_helpers(&mut self) {
        let src = r#"fn yaml_bool(v: &serde_yaml::Value) -> Option<bool> {
    v.as_bool()
}

fn yaml_i64(v: &serde_yaml::Value) -> Option<i64> {
    v.as_i64()
}

fn yaml_f64(v: &serde_yaml::Value) -> Option<f64> {
    v.as_f64()
}

fn yaml_string(v: &serde_yaml::Value) -> Option<String> {
    match v {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Tagged(t) => yaml_string(&t.value),
        _ => None,
    }
}

fn yaml_vec<T>(
    v: &serde_yaml::Value,
    item: impl Fn(&serde_yaml::Value) -> Option<T>,
) -> Option<Vec<T>> {
    v.as_sequence().map(|xs| xs.iter().filter_map(|x| item(x)).collect())
}
"#;
        for l in src.lines() {
            self.line(0, l);
        }
        self.line(0, "");
    }

    // ------------------------------ Classes ------------------------------- //

    fn emit_classes(&mut self, registry: &ClassRegistry) {
        let mut root = ModNode::default();
        for class in registry.iter() {
            let mut node = &mut root;
            for seg in &class.namespace {
                node = node.children.entry(module_ident(seg)).or_default();
            }
            node.classes.push(class);
        }
        self.emit_mod(&root, 0);
    }

    fn emit_mod(&mut self, node: &ModNode<'_>, depth: usize) {
        for class in &node.classes {
            self.emit_class(class, depth);
        }
        for (name, child) in &node.children {
            self.line(depth, LINT_ALLOW);
            self.line(depth, &format!("pub mod {name} {{"));
            self.emit_mod(child, depth + 1);
            self.line(depth, "}");
            self.line(0, "");
        }
    }

    fn emit_class(&mut self, class: &ClassDefinition, depth: usize) {
        let name = type_ident(&class.name);

        self.line(depth, LINT_ALLOW);
        self.line(depth, "#[derive(Debug, Clone, Default, PartialEq)]");
        self.line(depth, &format!("pub struct {name} {{"));
        for field in &class.fields {
            let ty = rust_type(&field.ty, depth);
            self.line(depth + 1, &format!("pub {}: {ty},", value_ident(&field.sanitized_name)));
        }
        self.line(depth, "}");
        self.line(0, "");

        self.line(depth, &format!("impl {name} {{"));
        self.line(depth + 1, "/// Assign every field whose key is present; missing keys keep their value.");
        let node = if class.fields.is_empty() { "_node" } else { "node" };
        self.line(depth + 1, &format!("pub fn update_from_yaml(&mut self, {node}: &serde_yaml::Value) {{"));
        for field in &class.fields {
            let key = format!("{:?}", field.source_key);
            let member = value_ident(&field.sanitized_name);
            match &field.ty {
                TypeDescriptor::ClassRef(_) => {
                    self.line(depth + 2, &format!("if let Some(v) = node.get({key}) {{"));
                    self.line(depth + 3, &format!("self.{member}.update_from_yaml(v);"));
                    self.line(depth + 2, "}");
                }
                ty => {
                    let conv = converter(ty, depth);
                    self.line(depth + 2, &format!("if let Some(v) = node.get({key}).and_then({conv}) {{"));
                    self.line(depth + 3, &format!("self.{member} = v;"));
                    self.line(depth + 2, "}");
                }
            }
        }
        self.line(depth + 1, "}");
        self.line(depth, "}");
        self.line(0, "");
    }

    // ----------------------------- Aggregate ------------------------------ //

    fn emit_aggregate(&mut self, agg: &AggregateDescriptor, registry: &ClassRegistry) {
        let name = type_ident(&agg.name);
        let error = RELOAD_ERROR;

        self.emit_reload_error(error);

        self.line(0, LINT_ALLOW);
        self.line(0, "#[derive(Debug, Default)]");
        self.line(0, &format!("pub struct {name} {{"));
        for m in &agg.members {
            let ty = class_path(&m.class, 0);
            self.line(1, &format!("{}: std::sync::RwLock<{ty}>,", value_ident(&m.member_name)));
        }
        self.line(0, "}");
        self.line(0, "");

        self.line(0, "#[allow(unused_variables)]");
        self.line(0, &format!("impl {name} {{"));

        // dispatch
        self.line(1, "/// Reload one unit by name from `base_path`.");
        self.line(1, &format!(
            "pub fn update_from_yaml(&self, name: &str, base_path: impl AsRef<std::path::Path>) -> Result<(), {error}> {{"
        ));
        self.line(2, "let base_path = base_path.as_ref();");
        self.line(2, "match name {");
        for m in &agg.members {
            self.line(3, &format!("{:?} => self.{}(base_path),", m.lookup_key, reload_fn(m)));
        }
        self.line(3, &format!("_ => Err({error}::UnknownUnit(name.to_string())),"));
        self.line(2, "}");
        self.line(1, "}");
        self.line(0, "");

        self.line(1, "/// Reload every unit from `base_path`, stopping at the first failure.");
        self.line(1, &format!(
            "pub fn update_from_yaml_all(&self, base_path: impl AsRef<std::path::Path>) -> Result<(), {error}> {{"
        ));
        self.line(2, "let base_path = base_path.as_ref();");
        for m in &agg.members {
            self.line(2, &format!("self.{}(base_path)?;", reload_fn(m)));
        }
        self.line(2, "Ok(())");
        self.line(1, "}");

        for m in &agg.members {
            self.line(0, "");
            self.emit_member(m, registry, error);
        }
        self.line(0, "}");
        self.line(0, "");

        self.emit_loader(error);
    }

    fn emit_member(&mut self, m: &AggregateMember, registry: &ClassRegistry, error: &str) {
        let field = value_ident(&m.member_name);
        let ty = class_path(&m.class, 0);
        let accessor = if AGGREGATE_METHODS.contains(&m.member_name.as_str()) {
            format!("{field}_")
        } else {
            field.clone()
        };

        if let Some(class) = registry.get(&m.class) {
            self.line(1, &format!("/// `{}` ({} fields).", class.fully_qualified_name(), class.fields.len()));
        }
        self.line(1, &format!("pub fn {accessor}(&self) -> {ty} {{"));
        self.line(2, &format!(
            "self.{field}.read().unwrap_or_else(std::sync::PoisonError::into_inner).clone()"
        ));
        self.line(1, "}");
        self.line(0, "");

        let join: String = m.source_path.split('/').map(|seg| format!(".join({seg:?})")).collect();
        self.line(1, &format!("fn {}(&self, base_path: &std::path::Path) -> Result<(), {error}> {{", reload_fn(m)));
        self.line(2, &format!("let node = load_yaml(&base_path{join})?;"));
        self.line(2, &format!(
            "let mut unit = self.{field}.write().unwrap_or_else(std::sync::PoisonError::into_inner);"
        ));
        self.line(2, "unit.update_from_yaml(&node);");
        self.line(2, "Ok(())");
        self.line(1, "}");
    }

    fn emit_reload_error(&mut self, error: &str) {
        let src = format!(r#"#[derive(Debug)]
pub enum {error} {{
    Io {{ path: std::path::PathBuf, source: std::io::Error }},
    Parse {{ path: std::path::PathBuf, source: serde_yaml::Error }},
    UnknownUnit(String),
}}

impl std::fmt::Display for {error} {{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {{
        match self {{
            Self::Io {{ path, source }} => write!(f, "failed to read {{}}: {{source}}", path.display()),
            Self::Parse {{ path, source }} => write!(f, "failed to parse {{}}: {{source}}", path.display()),
            Self::UnknownUnit(name) => write!(f, "no configuration unit named `{{name}}`"),
        }}
    }}
}}

impl std::error::Error for {error} {{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {{
        match self {{
            Self::Io {{ source, .. }} => Some(source),
            Self::Parse {{ source, .. }} => Some(source),
            Self::UnknownUnit(_) => None,
        }}
    }}
}}
"#);
        for l in src.lines() {
            self.line(0, l);
        }
        self.line(0, "");
    }

    fn emit_loader(&mut self, error: &str) {
        let src = format!(r#"fn load_yaml(path: &std::path::Path) -> Result<serde_yaml::Value, {error}> {{
    let text = std::fs::read_to_string(path)
        .map_err(|source| {error}::Io {{ path: path.to_path_buf(), source }})?;
    serde_yaml::from_str(&text)
        .map_err(|source| {error}::Parse {{ path: path.to_path_buf(), source }})
}}
"#);
        for l in src.lines() {
            self.line(0, l);
        }
    }
}

// ------------------------------ Helpers ---------------------------------- //

fn reload_fn(m: &AggregateMember) -> String {
    format!("update_from_yaml_{}", sanitize_ident(&m.lookup_key))
}

/// `super::` repeated `depth` times: the path back to the generated root.
fn to_root(depth: usize) -> String {
    "super::".repeat(depth)
}

fn rust_type(ty: &TypeDescriptor, depth: usize) -> String {
    match ty {
        TypeDescriptor::Primitive(PrimitiveKind::Bool) => "bool".to_string(),
        TypeDescriptor::Primitive(PrimitiveKind::Int) => "i64".to_string(),
        TypeDescriptor::Primitive(PrimitiveKind::Float) => "f64".to_string(),
        TypeDescriptor::Primitive(PrimitiveKind::String) => "String".to_string(),
        TypeDescriptor::SequenceOf(inner) => format!("Vec<{}>", rust_type(inner, depth)),
        TypeDescriptor::ClassRef(fqn) => class_path(fqn, depth),
    }
}

fn class_path(fqn: &str, depth: usize) -> String {
    let (namespace, name) = split_qualified(fqn);
    let mut out = to_root(depth);
    for seg in &namespace {
        out.push_str(&module_ident(seg));
        out.push_str("::");
    }
    out.push_str(&type_ident(&name));
    out
}

/// Expression usable as `impl Fn(&serde_yaml::Value) -> Option<T>`.
fn converter(ty: &TypeDescriptor, depth: usize) -> String {
    let root = to_root(depth);
    match ty {
        TypeDescriptor::Primitive(PrimitiveKind::Bool) => format!("{root}yaml_bool"),
        TypeDescriptor::Primitive(PrimitiveKind::Int) => format!("{root}yaml_i64"),
        TypeDescriptor::Primitive(PrimitiveKind::Float) => format!("{root}yaml_f64"),
        TypeDescriptor::Primitive(PrimitiveKind::String) => format!("{root}yaml_string"),
        TypeDescriptor::SequenceOf(inner) => format!(
            "|v: &serde_yaml::Value| {root}yaml_vec(v, {})",
            converter(inner, depth)
        ),
        TypeDescriptor::ClassRef(fqn) => format!(
            "|v: &serde_yaml::Value| {{ let mut x = {}::default(); x.update_from_yaml(v); Some(x) }}",
            class_path(fqn, depth)
        ),
    }
}

fn module_ident(segment: &str) -> String {
    value_ident(&camel_to_snake(segment))
}

fn type_ident(name: &str) -> String {
    escape_ident(name, "Unnamed")
}

fn value_ident(name: &str) -> String {
    escape_ident(name, "field")
}

/// Characters that cannot appear in an identifier become `_`. The IR keeps the
/// raw names, which reload paths are derived from.
fn sanitize_ident(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == '_' || c.is_alphabetic() || c.is_ascii_digit() { c } else { '_' })
        .collect()
}

fn escape_ident(raw: &str, fallback: &str) -> String {
    let mut s = sanitize_ident(raw);
    if s.chars().all(|c| c == '_') {
        s.push_str(fallback);
        return s;
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    if PATH_KEYWORDS.contains(&s.as_str()) {
        s.push('_');
    } else if KEYWORDS.contains(&s.as_str()) {
        s.insert_str(0, "r#");
    }
    s
}

// ------------------------------- Tests ------------------------------------ //

// Renderer output for `ROBOT_SOURCES`, compiled as part of the test build.
#[cfg(test)]
mod expected_robot;
