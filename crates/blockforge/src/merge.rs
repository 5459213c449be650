//! Global field merging
//!
//! Global fragments are reusable field lists (design tab, custom classes,
//! ...) spliced into every block's field group. Each fragment is paired with
//! an anchor field name: when the base group has that field the fragment is
//! inserted right after it, otherwise it is appended.
//!
//! The anchor's position is counted over named entries only; entries without
//! a `name` key are skipped when counting. Position 0 is treated like "not
//! found": an anchor that is the first named field sends the fragment to the
//! end of the list, and the fragment's own copy of the anchor is kept. When
//! the anchor is found further down, the fragment is spliced right after it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::case;
use crate::error::{Result, SchemaError};
use crate::group::{Field, FieldGroup, GROUP_KEY_PREFIX};
use crate::rewrite::{RewriteScope, TokenRewrite, rewrite_fields};

/// Anchor of the built-in design fragment
pub const DESIGN_ANCHOR: &str = "design_tab";

/// Group name of the built-in design fragment
pub const DESIGN_GROUP: &str = "global_fields";

/// The built-in design fragment: a `Design` tab followed by custom class and id fields
///
/// Laid out exactly as `FieldsBuilder::new("global_fields")` with
/// `add_tab("Design")`, `add_text("custom_classes")` and
/// `add_text("custom_id")` would build it.
pub fn design_fragment() -> FieldGroup {
    let field = |name: &str, field_type: &str| {
        Field::new(name, field_type)
            .with("key", format!("field_{}_{}", DESIGN_GROUP, name))
            .with("label", case::label(name))
    };

    let mut group = FieldGroup::new(format!("{}{}", GROUP_KEY_PREFIX, DESIGN_GROUP));
    group
        .settings
        .insert("title".to_string(), Value::String(case::label(DESIGN_GROUP)));
    group.fields = vec![
        field(DESIGN_ANCHOR, "tab")
            .with("label", "Design")
            .with("placement", "top"),
        field("custom_classes", "text"),
        field("custom_id", "text"),
    ];
    group
}

/// A global fragment and the field it is anchored to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalFields {
    pub anchor: String,
    pub fragment: FieldGroup,
}

impl GlobalFields {
    pub fn new(anchor: impl Into<String>, fragment: FieldGroup) -> Self {
        GlobalFields {
            anchor: anchor.into(),
            fragment,
        }
    }
}

/// Ordered collection of global fragments
///
/// Serialized as a JSON object mapping anchor name to fragment document,
/// in merge order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct GlobalFieldSet(Vec<GlobalFields>);

impl GlobalFieldSet {
    pub fn new() -> Self {
        GlobalFieldSet(Vec::new())
    }

    /// Parse an `{ anchor: fragment }` object, failing fast on malformed fragments
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => GlobalFieldSet::try_from(map),
            Value::Null => Ok(GlobalFieldSet::new()),
            other => Err(SchemaError::InvalidDocument {
                reason: format!("global fields must be an object keyed by anchor, got {}", other),
            }),
        }
    }

    /// The built-in set: the design fragment anchored at `design_tab`
    pub fn standard() -> Self {
        GlobalFieldSet::new().with(DESIGN_ANCHOR, design_fragment())
    }

    /// The built-in set followed by `extra`, in order
    pub fn standard_with(extra: &GlobalFieldSet) -> Self {
        let mut set = Self::standard();
        set.0.extend(extra.0.iter().cloned());
        set
    }

    pub fn push(&mut self, anchor: impl Into<String>, fragment: FieldGroup) -> &mut Self {
        self.0.push(GlobalFields::new(anchor, fragment));
        self
    }

    pub fn with(mut self, anchor: impl Into<String>, fragment: FieldGroup) -> Self {
        self.push(anchor, fragment);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlobalFields> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for GlobalFieldSet {
    type Error = SchemaError;

    fn try_from(map: Map<String, Value>) -> Result<Self> {
        let mut set = GlobalFieldSet::new();
        for (anchor, fragment) in map {
            let fragment = FieldGroup::fragment_from_value(&anchor, fragment)?;
            set.push(anchor, fragment);
        }
        Ok(set)
    }
}

impl From<GlobalFieldSet> for Map<String, Value> {
    fn from(set: GlobalFieldSet) -> Self {
        set.0
            .into_iter()
            .map(|g| {
                let fragment = serde_json::to_value(&g.fragment).unwrap_or(Value::Null);
                (g.anchor, fragment)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a GlobalFieldSet {
    type Item = &'a GlobalFields;
    type IntoIter = std::slice::Iter<'a, GlobalFields>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Where a fragment ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Spliced right after the anchor at `position`
    AfterAnchor { position: usize, inserted: usize },
    /// Appended to the end of the field list
    Appended { inserted: usize },
}

impl Placement {
    pub fn inserted(&self) -> usize {
        match *self {
            Placement::AfterAnchor { inserted, .. } | Placement::Appended { inserted } => inserted,
        }
    }
}

/// Rank of the anchor among named top-level entries, and its index in the full list
fn anchor_position(base: &FieldGroup, anchor: &str) -> Option<(usize, usize)> {
    base.fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.get("name").is_some())
        .enumerate()
        .find(|(_, (_, field))| field.name() == Some(anchor))
        .map(|(rank, (index, _))| (rank, index))
}

/// Splices global fragments into a base field group
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalFieldMerger;

impl GlobalFieldMerger {
    pub fn new() -> Self {
        GlobalFieldMerger
    }

    /// Merge every fragment of `globals` into `base`, in order
    ///
    /// Later fragments see the insertions made by earlier ones.
    pub fn merge(&self, mut base: FieldGroup, globals: &GlobalFieldSet) -> FieldGroup {
        for global in globals {
            self.merge_fragment(&mut base, &global.anchor, &global.fragment);
        }
        base
    }

    /// Merge one fragment, rewriting its embedded group token to the base group's token
    pub fn merge_fragment(&self, base: &mut FieldGroup, anchor: &str, fragment: &FieldGroup) -> Placement {
        let scope = TokenRewrite::between_groups(&fragment.key, &base.key);
        self.merge_fields_with(base, anchor, fragment.fields.clone(), &scope)
    }

    /// Merge a field list using an arbitrary rewrite scope
    pub fn merge_fields_with<S: RewriteScope + ?Sized>(
        &self,
        base: &mut FieldGroup,
        anchor: &str,
        mut fields: Vec<Field>,
        scope: &S,
    ) -> Placement {
        let rewritten = rewrite_fields(scope, &mut fields);

        let placement = match anchor_position(base, anchor) {
            Some((rank, position)) if rank > 0 => {
                fields.retain(|f| f.name() != Some(anchor));
                let inserted = fields.len();
                let at = position + 1;
                base.fields.splice(at..at, fields);
                Placement::AfterAnchor { position, inserted }
            }
            found => {
                if found.is_some() {
                    warn!(
                        group = %base.key,
                        anchor,
                        "anchor is the first named field; appending global fields instead"
                    );
                }
                let inserted = fields.len();
                base.fields.extend(fields);
                Placement::Appended { inserted }
            }
        };

        debug!(
            group = %base.key,
            anchor,
            rewritten,
            ?placement,
            "merged global fields"
        );
        placement
    }

    /// Raw-document entry point: parse, merge and serialize back
    pub fn merge_value(&self, base: Value, globals: Value) -> Result<Value> {
        let base = FieldGroup::from_value(base)?;
        let globals = GlobalFieldSet::from_value(globals)?;
        self.merge(base, &globals).to_value()
    }
}
