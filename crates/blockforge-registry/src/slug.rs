//! Slug derivation for block names and CSS classes

/// Text removed from slugs derived from type names
pub const TYPE_PATH_PREFIX: &str = "app-blocks-";

/// Derive a block slug from a type name.
///
/// The name is split into camel-case words (`HeroBanner` gives `Hero`,
/// `Banner`; `HTMLParser` gives `HTML`, `Parser`), all-caps words are
/// lowercased, other words get a lowercase first letter, and the words are
/// joined with `-`. Path separators and other punctuation are skipped, and
/// the `app-blocks-` text is removed from the result.
pub fn slug_from_type_name(type_name: &str) -> String {
    let words: Vec<String> = camel_words(type_name)
        .into_iter()
        .map(|word| {
            if word == word.to_uppercase() {
                word.to_lowercase()
            } else {
                lcfirst(word)
            }
        })
        .collect();

    words.join("-").replace(TYPE_PATH_PREFIX, "")
}

/// URL-friendly slug of a display title: `Hero Banner!` becomes `hero-banner`
pub fn slugify(title: &str) -> String {
    let lowered = title.replace('_', "-").replace('@', "-at-").to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for c in lowered.chars() {
        if c == '-' || c.is_whitespace() {
            pending_separator = true;
        } else if c.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        }
    }
    out
}

/// Prefix `value` with exactly one copy of `prefix`
pub fn ensure_prefix(value: &str, prefix: &str) -> String {
    let mut rest = value;
    if !prefix.is_empty() {
        while let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
        }
    }
    format!("{}{}", prefix, rest)
}

fn lcfirst(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_upper_or_digit(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit()
}

fn is_lower_or_digit(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Scan left to right for either an uppercase run that ends at the end of
/// input or right before a capitalised word, or a letter followed by one or
/// more lowercase letters and digits.
fn camel_words(input: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map_or(input.len(), |(b, _)| *b);
    let char_at = |i: usize| chars.get(i).map(|(_, c)| *c);

    let mut words = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i].1;

        if c.is_ascii_uppercase() {
            let mut run_end = i + 1;
            while char_at(run_end).is_some_and(is_upper_or_digit) {
                run_end += 1;
            }
            // Give back characters until the run is followed by a word start or the end
            let acronym_end = (i + 1..=run_end).rev().find(|&end| {
                end == chars.len()
                    || (char_at(end).is_some_and(|c| c.is_ascii_uppercase())
                        && char_at(end + 1).is_some_and(is_lower_or_digit))
            });
            if let Some(end) = acronym_end {
                words.push(&input[byte_at(i)..byte_at(end)]);
                i = end;
                continue;
            }
        }

        if c.is_ascii_alphabetic() && char_at(i + 1).is_some_and(is_lower_or_digit) {
            let mut end = i + 1;
            while char_at(end).is_some_and(is_lower_or_digit) {
                end += 1;
            }
            words.push(&input[byte_at(i)..byte_at(end)]);
            i = end;
            continue;
        }

        i += 1;
    }
    words
}
