//! Identifier rewriting for fields moved between groups
//!
//! Generated field keys embed the owning group's token
//! (`field_global_fields_custom_id`). When a fragment is merged into another
//! group those embedded tokens must be switched to the target's token.
//! [`RewriteScope`] is the seam; [`TokenRewrite`] is the textual
//! search-and-replace used today.

use serde_json::Value;

use crate::group::{Field, key_token};

/// Rewrites string leaves of a field tree
pub trait RewriteScope {
    /// Returns the rewritten string, or `None` when `value` is unaffected
    fn rewrite_str(&self, value: &str) -> Option<String>;
}

/// Literal substring replacement of one bare group token by another
///
/// Substring matching is blind: a token that also occurs inside an unrelated
/// string is rewritten there too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRewrite {
    from: String,
    to: String,
}

impl TokenRewrite {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        TokenRewrite {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Scope moving fields from the group keyed `source_key` into the group keyed `target_key`
    pub fn between_groups(source_key: &str, target_key: &str) -> Self {
        TokenRewrite::new(key_token(source_key), key_token(target_key))
    }

    pub fn from_token(&self) -> &str {
        &self.from
    }

    pub fn to_token(&self) -> &str {
        &self.to
    }

    /// An empty source token matches nothing
    pub fn is_noop(&self) -> bool {
        self.from.is_empty() || self.from == self.to
    }
}

impl RewriteScope for TokenRewrite {
    fn rewrite_str(&self, value: &str) -> Option<String> {
        if self.is_noop() || !value.contains(&self.from) {
            return None;
        }
        Some(value.replace(&self.from, &self.to))
    }
}

/// Rewrite every string leaf under `value`; object keys and non-string leaves are left alone.
///
/// Returns the number of strings changed.
pub fn rewrite_value<S: RewriteScope + ?Sized>(scope: &S, value: &mut Value) -> usize {
    match value {
        Value::String(s) => match scope.rewrite_str(s) {
            Some(rewritten) => {
                *s = rewritten;
                1
            }
            None => 0,
        },
        Value::Array(items) => items.iter_mut().map(|v| rewrite_value(scope, v)).sum(),
        Value::Object(map) => map.values_mut().map(|v| rewrite_value(scope, v)).sum(),
        _ => 0,
    }
}

/// Rewrite a list of fields in place
pub fn rewrite_fields<S: RewriteScope + ?Sized>(scope: &S, fields: &mut [Field]) -> usize {
    fields
        .iter_mut()
        .flat_map(|field| field.as_map_mut().values_mut())
        .map(|v| rewrite_value(scope, v))
        .sum()
}
