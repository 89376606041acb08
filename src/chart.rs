//! Reading a chart directory: metadata, values and template files.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    thread,
};

use anyhow::Context as AnyhowContext;
use serde_yaml::{Mapping, Value};

use crate::{render_file, RenderOptions, RenderedDocument, ValueContext};

pub const METADATA_FILE: &str = "Chart.yaml";
pub const VALUES_FILE: &str = "values.yaml";
pub const TEMPLATES_DIR: &str = "templates";

/// A chart as loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub path: PathBuf,

    /// Contents of `Chart.yaml`, available to templates as `.Chart`
    pub metadata: Value,

    /// `values.yaml` with any extra values files merged over it, available as `.Values`
    pub values: Value,

    /// Template file name -> contents, for every YAML file in `templates/`
    pub templates: BTreeMap<String, String>,
}

impl Chart {
    /// Loads the chart at `path`. `Chart.yaml`, `values.yaml` and `templates/` are all optional.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            anyhow::bail!("chart path `{}` is not a directory", path.display());
        }

        let metadata = read_optional_yaml(&path.join(METADATA_FILE))?;
        let values = read_optional_yaml(&path.join(VALUES_FILE))?;
        let templates = read_templates(&path.join(TEMPLATES_DIR))?;

        log::debug!(
            "loaded chart `{}` with {} template(s)",
            path.display(),
            templates.len()
        );

        Ok(Chart {
            path: path.to_path_buf(),
            metadata,
            values,
            templates,
        })
    }

    /// Merges each values file over the chart's values, in order.
    pub fn with_values_files(mut self, files: &[PathBuf]) -> anyhow::Result<Self> {
        for file in files {
            let overlay = read_yaml(file)?;
            log::debug!("merging values from `{}`", file.display());
            merge_values(&mut self.values, overlay);
        }
        Ok(self)
    }

    pub fn context(&self) -> ValueContext {
        ValueContext::new(self.values.clone(), self.metadata.clone())
    }

    /// Renders every template, one thread per template file.
    pub fn render(&self, options: &RenderOptions) -> BTreeMap<String, Vec<RenderedDocument>> {
        let ctx = self.context();

        thread::scope(|scope| {
            let handles: Vec<_> = self
                .templates
                .iter()
                .map(|(name, source)| {
                    let ctx = &ctx;
                    (name, scope.spawn(move || render_file(source, ctx, options)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(name, handle)| {
                    let documents = match handle.join() {
                        Ok(documents) => documents,
                        Err(panic) => std::panic::resume_unwind(panic),
                    };
                    (name.clone(), documents)
                })
                .collect()
        })
    }
}

/// Deep-merges `overlay` into `base`: mappings merge key by key, anything else is replaced.
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}

fn read_yaml(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("unable to read `{}`", path.display()))?;
    if text.trim().is_empty() {
        return Ok(Value::Mapping(Mapping::new()));
    }
    serde_yaml::from_str(&text).with_context(|| format!("invalid YAML in `{}`", path.display()))
}

fn read_optional_yaml(path: &Path) -> anyhow::Result<Value> {
    if !path.exists() {
        log::debug!("`{}` not found, using an empty mapping", path.display());
        return Ok(Value::Mapping(Mapping::new()));
    }
    read_yaml(path)
}

fn read_templates(dir: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let mut templates = BTreeMap::new();
    if !dir.is_dir() {
        log::warn!("`{}` not found, chart has no templates", dir.display());
        return Ok(templates);
    }

    let entries = fs::read_dir(dir).with_context(|| format!("unable to list `{}`", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("unable to list `{}`", dir.display()))?
            .path();

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        );
        if !path.is_file() || !is_yaml {
            continue;
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("path `{}` is missing a file name", path.display()))?;
        let source = fs::read_to_string(&path)
            .with_context(|| format!("unable to read template `{}`", path.display()))?;
        templates.insert(name, source);
    }

    Ok(templates)
}
