//! Naming conventions for relation fields.
//!
//! To-one relations should read as a single entity (`order`, `customer`),
//! to-many relations as a collection (`orders`, `cartItemList`). Plurality is
//! guessed from the last word of the name:
//!
//! - A `List` suffix always marks a collection
//! - A handful of irregular plurals are recognized
//! - Otherwise a trailing `s` is plural, except `ss`, `us` and `is` endings

/// Suffix marking a collection regardless of the word before it.
pub const LIST_SUFFIX: &str = "List";

/// Irregular plurals that do not end with `s`.
const IRREGULAR_PLURALS: &[&str] = &[
    "children", "data", "feet", "geese", "media", "men", "mice", "people", "teeth", "women",
    "criteria",
];

/// Endings that look plural but usually are not.
const SINGULAR_S_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Returns `true` when `name` uses the collection suffix convention.
pub fn has_list_suffix(name: &str) -> bool {
    name.len() > LIST_SUFFIX.len() && name.ends_with(LIST_SUFFIX)
}

/// The last word of a camelCase, snake_case or kebab-case name, lowercased.
fn last_word(name: &str) -> String {
    let tail = name.rsplit(['_', '-']).next().unwrap_or(name);
    let start = tail
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    tail[start..].to_lowercase()
}

/// Best-effort plural detection.
///
/// # Examples
///
/// ```
/// use rcs_mapping::naming::looks_plural;
///
/// assert!(looks_plural("orders"));
/// assert!(looks_plural("cartItemList"));
/// assert!(looks_plural("people"));
/// assert!(!looks_plural("order"));
/// assert!(!looks_plural("status"));
/// assert!(!looks_plural("address"));
/// ```
pub fn looks_plural(name: &str) -> bool {
    if has_list_suffix(name) {
        return true;
    }
    let word = last_word(name);
    if word.is_empty() {
        return false;
    }
    if IRREGULAR_PLURALS.contains(&word.as_str()) {
        return true;
    }
    word.ends_with('s') && !SINGULAR_S_ENDINGS.iter().any(|end| word.ends_with(end))
}

/// Returns a reason when `name` does not suit a to-one relation.
pub fn to_one_name_violation(name: &str) -> Option<String> {
    if has_list_suffix(name) {
        return Some(format!("ends with {LIST_SUFFIX:?}"));
    }
    if looks_plural(name) {
        return Some("looks plural".into());
    }
    None
}

/// Returns a reason when `name` does not suit a to-many relation.
pub fn to_many_name_violation(name: &str) -> Option<String> {
    if looks_plural(name) {
        None
    } else {
        Some(format!("looks singular and does not end with {LIST_SUFFIX:?}"))
    }
}
