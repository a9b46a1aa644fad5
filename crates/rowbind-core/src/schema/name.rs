/// Converts a camel-case identifier to its column/table form.
///
/// An underscore is inserted wherever an ASCII lowercase letter is
/// immediately followed by a run of one or more uppercase letters, then the
/// whole string is lowercased. This is the regex substitution
/// `([a-z])([A-Z]+)` → `$1_$2` followed by lowercasing: an uppercase run
/// becomes a single word and digits never start a new word.
pub fn snake_case(src: &str) -> String {
    let mut ret = String::with_capacity(src.len() + 4);
    let mut prev_lower = false;

    for ch in src.chars() {
        if ch.is_ascii_uppercase() && prev_lower {
            ret.push('_');
        }

        prev_lower = ch.is_ascii_lowercase();
        ret.extend(ch.to_lowercase());
    }

    ret
}

/// Name of the accessor a deferred relation load is registered under:
/// `"get"` followed by the field name with its first letter capitalized.
pub fn accessor_name(field: &str) -> String {
    let mut chars = field.chars();

    match chars.next() {
        Some(first) => {
            let mut ret = String::from("get");
            ret.extend(first.to_uppercase());
            ret.push_str(chars.as_str());
            ret
        }
        None => String::from("get"),
    }
}
