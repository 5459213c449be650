//! Fluent authoring API for field groups
//!
//! Generated keys embed the group name: group `global_fields` gets the key
//! `group_global_fields`, and its field `custom_id` gets
//! `field_global_fields_custom_id`. Fields nested in composites include the
//! parent names in their key path.

use serde_json::{Map, Value, json};

use crate::case;
use crate::error::{Result, SchemaError};
use crate::group::{Field, FieldGroup, GROUP_KEY_PREFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Repeater,
    Group,
    FlexibleContent,
    Layout,
}

impl FrameKind {
    fn container_key(self) -> &'static str {
        match self {
            FrameKind::FlexibleContent => "layouts",
            _ => "sub_fields",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FrameKind::Repeater => "repeater",
            FrameKind::Group => "group",
            FrameKind::FlexibleContent => "flexible content",
            FrameKind::Layout => "layout",
        }
    }
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    field: Field,
    children: Vec<Field>,
}

/// Builder for a [`FieldGroup`]
#[derive(Debug)]
pub struct FieldsBuilder {
    name: String,
    settings: Map<String, Value>,
    fields: Vec<Field>,
    stack: Vec<Frame>,
    errors: Vec<String>,
}

impl FieldsBuilder {
    /// Start a group; `name` becomes the key token
    pub fn new(name: impl Into<String>) -> Self {
        FieldsBuilder {
            name: name.into(),
            settings: Map::new(),
            fields: Vec::new(),
            stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// The key the built group will carry
    pub fn key(&self) -> String {
        format!("{}{}", GROUP_KEY_PREFIX, self.name)
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        self.setting("title", title.into())
    }

    /// Set a group-level setting
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Replace the location rules with a single rule
    pub fn set_location(self, param: &str, operator: &str, value: &str) -> Self {
        self.setting(
            "location",
            json!([[{"param": param, "operator": operator, "value": value}]]),
        )
    }

    /// Add a leaf field of any type
    pub fn add_field(mut self, name: &str, field_type: &str) -> Self {
        let field = self.make_field(name, field_type);
        self.current_list().push(field);
        self
    }

    pub fn add_text(self, name: &str) -> Self {
        self.add_field(name, "text")
    }

    pub fn add_textarea(self, name: &str) -> Self {
        self.add_field(name, "textarea")
    }

    pub fn add_wysiwyg(self, name: &str) -> Self {
        self.add_field(name, "wysiwyg")
    }

    pub fn add_image(self, name: &str) -> Self {
        self.add_field(name, "image")
    }

    pub fn add_true_false(self, name: &str) -> Self {
        self.add_field(name, "true_false")
    }

    /// Add a tab; `Design` becomes a field named `design_tab` labelled `Design`
    pub fn add_tab(mut self, label: &str) -> Self {
        let name = format!("{}_tab", case::name_from_label(label));
        let field = self
            .make_field(&name, "tab")
            .with("label", label)
            .with("placement", "top");
        self.current_list().push(field);
        self
    }

    pub fn add_repeater(self, name: &str) -> Self {
        self.open(FrameKind::Repeater, name, "repeater")
    }

    pub fn end_repeater(self) -> Self {
        self.close(FrameKind::Repeater)
    }

    pub fn add_group(self, name: &str) -> Self {
        self.open(FrameKind::Group, name, "group")
    }

    pub fn end_group(self) -> Self {
        self.close(FrameKind::Group)
    }

    pub fn add_flexible_content(self, name: &str) -> Self {
        self.open(FrameKind::FlexibleContent, name, "flexible_content")
    }

    /// Start a layout inside the open flexible content field, closing the previous layout
    pub fn add_layout(mut self, name: &str) -> Self {
        if self.top_kind() == Some(FrameKind::Layout) {
            self = self.close(FrameKind::Layout);
        }
        if self.top_kind() != Some(FrameKind::FlexibleContent) {
            self.errors
                .push(format!("layout '{}' added outside flexible content", name));
            return self;
        }

        let mut layout = self.make_field(name, "layout");
        layout.as_map_mut().remove("type");
        let layout = layout.with("display", "block");
        self.stack.push(Frame {
            kind: FrameKind::Layout,
            field: layout,
            children: Vec::new(),
        });
        self
    }

    pub fn end_flexible_content(mut self) -> Self {
        if self.top_kind() == Some(FrameKind::Layout) {
            self = self.close(FrameKind::Layout);
        }
        self.close(FrameKind::FlexibleContent)
    }

    /// Set a setting on the most recently added field
    pub fn with_setting(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if let Some(last) = self.current_list().last_mut() {
            last.insert(key, value);
        } else if let Some(frame) = self.stack.last_mut() {
            frame.field.insert(key, value);
        } else {
            self.errors
                .push(format!("setting '{}' given before any field", key));
        }
        self
    }

    /// Finish the group
    pub fn build(self) -> Result<FieldGroup> {
        let key = self.key();
        if let Some(message) = self.errors.into_iter().next() {
            return Err(SchemaError::builder(message));
        }
        if let Some(frame) = self.stack.last() {
            return Err(SchemaError::builder(format!(
                "{} '{}' was never closed",
                frame.kind.describe(),
                frame.field.name().unwrap_or_default()
            )));
        }

        let mut settings = Map::new();
        settings.insert("title".to_string(), Value::String(case::label(&self.name)));
        settings.extend(self.settings);

        Ok(FieldGroup {
            key,
            fields: self.fields,
            settings,
        })
    }

    fn make_field(&self, name: &str, field_type: &str) -> Field {
        let mut path: Vec<&str> = self
            .stack
            .iter()
            .filter_map(|frame| frame.field.name())
            .collect();
        path.push(name);

        Field::new(name, field_type)
            .with("key", format!("field_{}_{}", self.name, path.join("_")))
            .with("label", case::label(name))
    }

    fn current_list(&mut self) -> &mut Vec<Field> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.fields,
        }
    }

    fn top_kind(&self) -> Option<FrameKind> {
        self.stack.last().map(|frame| frame.kind)
    }

    fn open(mut self, kind: FrameKind, name: &str, field_type: &str) -> Self {
        let field = self.make_field(name, field_type);
        self.stack.push(Frame {
            kind,
            field,
            children: Vec::new(),
        });
        self
    }

    fn close(mut self, kind: FrameKind) -> Self {
        if self.top_kind() != Some(kind) {
            self.errors
                .push(format!("end of {} without a matching start", kind.describe()));
            return self;
        }

        if let Some(frame) = self.stack.pop() {
            let children: Vec<Value> = frame.children.into_iter().map(Value::from).collect();
            let field = frame.field.with(kind.container_key(), Value::Array(children));
            self.current_list().push(field);
        }
        self
    }
}
