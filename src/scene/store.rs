use std::path::{Path, PathBuf};

use crate::foundation::error::{MainshotError, MainshotResult};
use crate::scene::template::Template;

/// Read access to stored templates.
///
/// Implementations own their concurrency story; rendering only ever reads.
pub trait TemplateStore: Send + Sync {
    /// Every template, in a stable order.
    fn list(&self) -> MainshotResult<Vec<Template>>;

    /// Template whose [`Template::source`] equals `source`.
    fn get(&self, source: &str) -> MainshotResult<Option<Template>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|t| t.source.as_deref() == Some(source)))
    }
}

/// Templates read from `*.json` files in one directory, sorted by file name.
#[derive(Clone, Debug)]
pub struct DirTemplateStore {
    dir: PathBuf,
}

impl DirTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TemplateStore for DirTemplateStore {
    fn list(&self) -> MainshotResult<Vec<Template>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            MainshotError::input(format!(
                "read template dir '{}': {e}",
                self.dir.display()
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MainshotError::input(e.to_string()))?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let templates = paths
            .iter()
            .map(Template::from_path)
            .collect::<MainshotResult<Vec<_>>>()?;
        tracing::debug!(dir = %self.dir.display(), count = templates.len(), "loaded templates");
        Ok(templates)
    }
}

/// Fixed in-memory template list.
#[derive(Clone, Debug, Default)]
pub struct MemoryTemplateStore {
    templates: Vec<Template>,
}

impl MemoryTemplateStore {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Preset templates compiled into the crate.
    pub fn builtin() -> MainshotResult<Self> {
        const PRESETS: &[(&str, &str)] = &[
            (
                "ai_promo_taobao.json",
                include_str!("../../templates/presets/ai_promo_taobao.json"),
            ),
            (
                "fresh_xiaohongshu.json",
                include_str!("../../templates/presets/fresh_xiaohongshu.json"),
            ),
            (
                "minimal_taobao.json",
                include_str!("../../templates/presets/minimal_taobao.json"),
            ),
            (
                "premium_taobao.json",
                include_str!("../../templates/presets/premium_taobao.json"),
            ),
            (
                "promo_douyin.json",
                include_str!("../../templates/presets/promo_douyin.json"),
            ),
            (
                "promo_taobao.json",
                include_str!("../../templates/presets/promo_taobao.json"),
            ),
        ];

        let templates = PRESETS
            .iter()
            .map(|(name, json)| {
                let mut tpl = Template::from_json_str(json)?;
                tpl.source = Some((*name).to_owned());
                Ok(tpl)
            })
            .collect::<MainshotResult<Vec<_>>>()?;
        Ok(Self { templates })
    }

    pub fn push(&mut self, template: Template) {
        self.templates.push(template);
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn list(&self) -> MainshotResult<Vec<Template>> {
        Ok(self.templates.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
