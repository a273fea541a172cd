//! Identifier case conversion.

/// Convert a camelCase identifier to snake_case.
///
/// Leading and trailing underscores are preserved. A word boundary is placed
/// before an uppercase letter that follows a lowercase letter or a digit, and
/// before the last letter of an uppercase run that is followed by a lowercase
/// letter, so acronyms stay together:
///
/// ```
/// use resilient_codable::case::to_snake_case;
///
/// assert_eq!(to_snake_case("myURLProperty"), "my_url_property");
/// assert_eq!(to_snake_case("_leadingUnderscore"), "_leading_underscore");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(identifier: &str) -> String {
    let without_leading = identifier.trim_start_matches('_');
    let core = without_leading.trim_end_matches('_');
    if core.is_empty() {
        return identifier.to_string();
    }
    let leading = &identifier[..identifier.len() - without_leading.len()];
    let trailing = &without_leading[core.len()..];

    let chars: Vec<char> = core.chars().collect();
    let mut out = String::with_capacity(identifier.len() + 4);
    out.push_str(leading);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next.is_some_and(char::is_lowercase));
            if boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out.push_str(trailing);
    out
}
