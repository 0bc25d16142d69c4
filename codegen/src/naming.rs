//! Identifier conversions shared by both engines.

/// `MyRecord` -> `my_record`. Used to derive the `decode_x` family of
/// function names from a record's `name`.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_pascal_case() {
        assert_eq!(to_snake_case("MyRecord"), "my_record");
        assert_eq!(to_snake_case("HTTPHeader"), "h_t_t_p_header");
        assert_eq!(to_snake_case("point"), "point");
    }
}
