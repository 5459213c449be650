//! Identifier case conversions shared by the builder and the defaults table

/// Convert to snake_case the way the host framework does.
///
/// Input made only of lowercase letters is returned as is. Otherwise every word is
/// capitalised, whitespace is dropped, and an underscore is inserted before
/// each ASCII uppercase letter that follows another character.
pub fn snake(value: &str) -> String {
    if value.chars().all(char::is_lowercase) {
        return value.to_string();
    }

    let mut words = String::with_capacity(value.len());
    for word in value.split_whitespace() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            words.extend(first.to_uppercase());
            words.push_str(chars.as_str());
        }
    }

    let chars: Vec<char> = words.chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, c) in chars.iter().enumerate() {
        out.push(*c);
        if chars.get(i + 1).is_some_and(|next| next.is_ascii_uppercase()) {
            out.push('_');
        }
    }
    out.to_lowercase()
}

/// Human label from a field name: `custom_classes` becomes `Custom Classes`
pub fn label(name: &str) -> String {
    name.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Machine name from a label: `Design Options` becomes `design_options`
pub fn name_from_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
