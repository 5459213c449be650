//! Macros for declarative field group definition

/// Declare a flat field group
///
/// Each entry is `name: type`. The `tab` type is special: `design: tab`
/// adds a tab labelled `Design`, named `design_tab`. Evaluates to
/// `Result<FieldGroup>`.
///
/// # Examples
///
/// ```rust
/// use blockforge::field_group;
///
/// let group = field_group!("global_fields" {
///     design: tab,
///     custom_classes: text,
///     custom_id: text,
/// })
/// .unwrap();
///
/// assert_eq!(group.key, "group_global_fields");
/// assert_eq!(group.field_names(), vec!["design_tab", "custom_classes", "custom_id"]);
/// ```
#[macro_export]
macro_rules! field_group {
    (@add $builder:expr, $field:ident, tab) => {
        $builder.add_tab(&$crate::case::label(stringify!($field)))
    };

    (@add $builder:expr, $field:ident, $kind:ident) => {
        $builder.add_field(stringify!($field), stringify!($kind))
    };

    ($name:literal { $($field:ident : $kind:ident),* $(,)? }) => {{
        let builder = $crate::FieldsBuilder::new($name);
        $(
            let builder = $crate::field_group!(@add builder, $field, $kind);
        )*
        builder.build()
    }};
}
