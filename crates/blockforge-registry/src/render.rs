//! Render context for composed blocks
//!
//! HTML rendering belongs to the host's template engine. This module prepares
//! what a template needs: a unique element id, the CSS class list, the field
//! values of the block and the path of its view.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use blockforge::FieldGroup;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::slug::{ensure_prefix, slugify};

/// Directory of block views, relative to the resource root
pub const VIEW_DIR: &str = "views.blocks.";

/// Extension of block views
pub const VIEW_EXTENSION: &str = ".blade.php";

/// Element ids for rendered blocks: `block-0`, `block-1`, ...
///
/// One counter is owned per render pass.
#[derive(Debug, Clone, Default)]
pub struct BlockIds {
    position: usize,
}

impl BlockIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids handed out so far
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for BlockIds {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let id = format!("block-{}", self.position);
        self.position += 1;
        Some(id)
    }
}

/// Block attributes supplied by the host when rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockProps {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub align: String,

    /// Extra classes entered by the editor
    #[serde(default, rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One render call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub block: BlockProps,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub post: u64,
}

/// Host-side field value lookup
pub trait FieldValues {
    fn get_field(&self, name: &str) -> Option<Value>;
}

impl FieldValues for Map<String, Value> {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl FieldValues for HashMap<String, Value> {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Everything a block view receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockContext {
    pub id: String,
    pub slug: String,
    pub block: BlockProps,
    pub content: String,
    pub preview: bool,
    pub post: u64,
    /// Space-separated CSS classes
    pub classes: String,
}

impl BlockContext {
    pub fn new(slug: impl Into<String>, request: RenderRequest, ids: &mut BlockIds) -> Self {
        let id = ids.next().unwrap_or_default();
        let classes = block_classes(&request.block);

        BlockContext {
            id,
            slug: slug.into(),
            block: request.block,
            content: request.content,
            preview: request.preview,
            post: request.post,
            classes,
        }
    }

    /// View data: `extra`, then the context under `block`, then one entry per
    /// top-level field
    ///
    /// Later entries replace earlier ones with the same name, so field values
    /// always win. Fields without a value map to null.
    pub fn hydrate<V: FieldValues + ?Sized>(
        &self,
        group: &FieldGroup,
        values: &V,
        extra: Map<String, Value>,
    ) -> Map<String, Value> {
        let mut data = extra;
        data.insert(
            "block".to_string(),
            serde_json::to_value(self).unwrap_or(Value::Null),
        );
        for name in group.field_names() {
            data.insert(name.to_string(), values.get_field(name).unwrap_or(Value::Null));
        }
        data
    }

    pub fn view_path(&self) -> PathBuf {
        view_path(&self.slug)
    }
}

/// `b-<title slug>`, then `align<align>` and the editor classes when set
pub fn block_classes(props: &BlockProps) -> String {
    let mut classes = vec![ensure_prefix(&slugify(&props.title), "b-")];
    if !props.align.is_empty() {
        classes.push(ensure_prefix(&props.align, "align"));
    }
    if let Some(class_name) = props.class_name.as_deref().filter(|c| !c.is_empty()) {
        classes.push(class_name.to_string());
    }
    classes.join(" ")
}

/// Relative path of a block's view: `hero` gives `views/blocks/hero.blade.php`
pub fn view_path(slug: &str) -> PathBuf {
    let dotted = format!("{}{}", VIEW_DIR, slug);
    let stem = dotted.strip_suffix(VIEW_EXTENSION).unwrap_or(&dotted);
    PathBuf::from(format!("{}{}", stem.replace('.', "/"), VIEW_EXTENSION))
}

/// The view under `resources`, if it exists
pub fn resolve_view(resources: &Path, slug: &str) -> Option<PathBuf> {
    let path = resources.join(view_path(slug));
    path.is_file().then_some(path)
}
