//! One generation run: sources in, class registry + manifest + aggregate out.
//!
//! Sources are processed one at a time, in sorted path order. A source that
//! cannot be read, parsed or built is logged and skipped, and the classes it
//! registered before failing are rolled back. Only aggregate-level collisions
//! abort the run.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::aggregate::{self, AggregateDescriptor, DEFAULT_AGGREGATE_NAME};
use crate::error::{AggregateError, DocumentError, GenerateError};
use crate::graph::{ClassGraphBuilder, DEFAULT_MAX_DEPTH};
use crate::ir::qualify;
use crate::namespace;
use crate::naming::top_level_name;
use crate::registry::{ClassRegistry, TopLevelManifest};
use crate::value::{self, SchemaValue};

const DOCUMENT_EXTENSIONS: &[&str] = &["yaml", "yml"];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Class name for single-document input.
    pub root_type: String,
    pub aggregate_name: String,
    pub max_depth: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_type: "Config".to_string(),
            aggregate_name: DEFAULT_AGGREGATE_NAME.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug)]
pub struct SourceDiagnostic {
    pub source: PathBuf,
    pub error: DocumentError,
}

#[derive(Debug, Serialize)]
pub struct GenerationOutput {
    pub classes: ClassRegistry,
    pub manifest: TopLevelManifest,
    pub aggregate: AggregateDescriptor,
    #[serde(skip)]
    pub diagnostics: Vec<SourceDiagnostic>,
}

pub struct Generation {
    config: GeneratorConfig,
    registry: ClassRegistry,
    manifest: TopLevelManifest,
    /// top-level class → path it was read from, relative to the input root
    sources: IndexMap<String, PathBuf>,
    diagnostics: Vec<SourceDiagnostic>,
}

impl Generation {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            registry: ClassRegistry::new(),
            manifest: TopLevelManifest::new(),
            sources: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Run over a single document file or a directory tree of documents.
    pub fn run_path(mut self, input: &Path) -> Result<GenerationOutput, GenerateError> {
        if !input.exists() {
            return Err(GenerateError::MissingInput(input.to_path_buf()));
        }
        if input.is_file() {
            self.add_file(input)?;
        } else if input.is_dir() {
            for path in discover_documents(input)? {
                self.add_source(input, &path)?;
            }
        } else {
            return Err(GenerateError::UnsupportedInput(input.to_path_buf()));
        }
        self.finish()
    }

    /// Single-document mode: `root_type` at the empty namespace.
    pub fn add_file(&mut self, path: &Path) -> Result<(), GenerateError> {
        let class_name = self.config.root_type.clone();
        let relative = path.file_name().map(PathBuf::from).unwrap_or_else(|| path.to_path_buf());
        match read_document(path) {
            Ok(doc) => self.add_document(&relative, &class_name, &doc, &[]),
            Err(error) => {
                self.skip(&relative, error);
                Ok(())
            }
        }
    }

    /// Directory mode: namespace and class name come from `path` relative to `base`.
    /// The class is the prefixed file segment, so `task/task_setting.yaml` may
    /// hold a nested `task_setting:` key.
    pub fn add_source(&mut self, base: &Path, path: &Path) -> Result<(), GenerateError> {
        let relative = path.strip_prefix(base).unwrap_or(path).to_path_buf();
        let stem = relative.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let dir = relative.parent().unwrap_or(Path::new(""));
        let ns = namespace::resolve(dir, &stem);
        let class_name = top_level_name(ns.last().map(String::as_str).unwrap_or_default());

        match read_document(path) {
            Ok(doc) => self.add_document(&relative, &class_name, &doc, &ns),
            Err(error) => {
                self.skip(&relative, error);
                Ok(())
            }
        }
    }

    /// Build one decoded document as a top-level class. Build failures skip the
    /// document; a second document claiming the same top-level class is fatal.
    pub fn add_document(
        &mut self,
        source: &Path,
        class_name: &str,
        doc: &SchemaValue,
        ns: &[String],
    ) -> Result<(), GenerateError> {
        let Some(root) = doc.as_mapping() else {
            let error = match doc {
                SchemaValue::Null => DocumentError::Empty,
                other => DocumentError::NotAMapping(other.kind()),
            };
            self.skip(source, error);
            return Ok(());
        };

        let fqn = qualify(ns, class_name);
        if self.manifest.contains(&fqn) {
            return Err(AggregateError::DuplicateTopLevel(fqn).into());
        }

        let checkpoint = self.registry.checkpoint();
        let built = ClassGraphBuilder::new(&mut self.registry)
            .with_max_depth(self.config.max_depth)
            .build_root(class_name, root, ns);

        match built {
            Ok(fqn) => {
                tracing::info!(class = %fqn, source = %source.display(), "generated top-level class");
                self.manifest.push(fqn.clone())?;
                self.sources.insert(fqn, source.to_path_buf());
            }
            Err(error) => {
                self.registry.rollback(checkpoint);
                self.skip(source, error.into());
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<GenerationOutput, GenerateError> {
        if self.manifest.is_empty() {
            tracing::warn!("no top-level classes were generated");
        }
        let aggregate = aggregate::build(&self.config.aggregate_name, &self.manifest, &self.registry)?;

        for member in &aggregate.members {
            let Some(actual) = self.sources.get(&member.class) else { continue };
            if !same_relative_path(actual, &member.source_path) {
                tracing::warn!(
                    member = %member.member_name,
                    read_from = %actual.display(),
                    reloads_from = %member.source_path,
                    "reload path differs from the document's actual location"
                );
            }
        }

        Ok(GenerationOutput {
            classes: self.registry,
            manifest: self.manifest,
            aggregate,
            diagnostics: self.diagnostics,
        })
    }

    fn skip(&mut self, source: &Path, error: DocumentError) {
        if error.is_informational() {
            tracing::info!(source = %source.display(), "skipping: {error}");
        } else {
            tracing::warn!(source = %source.display(), "skipping: {error}");
        }
        self.diagnostics.push(SourceDiagnostic { source: source.to_path_buf(), error });
    }
}

fn read_document(path: &Path) -> Result<SchemaValue, DocumentError> {
    let src = std::fs::read_to_string(path)?;
    value::from_yaml_str(&src)
}

fn same_relative_path(actual: &Path, derived: &str) -> bool {
    let actual: Vec<_> = actual.components().map(|c| c.as_os_str().to_string_lossy()).collect();
    let derived: Vec<_> = derived.split('/').collect();
    actual.len() == derived.len() && actual.iter().zip(&derived).all(|(a, d)| a == d)
}

/// Every `*.yaml` / `*.yml` below `dir`, sorted and deduplicated.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let root = glob::Pattern::escape(&dir.to_string_lossy());
    let mut out = Vec::<PathBuf>::new();

    for ext in DOCUMENT_EXTENSIONS {
        let pattern = format!("{root}/**/*.{ext}");
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(p) if p.is_file() => out.push(p),
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(path = %error.path().display(), "skipping unreadable entry: {}", error.error());
                }
            }
        }
    }

    out.sort();
    out.dedup();
    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //
