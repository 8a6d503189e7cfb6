//! Identifier case helpers.

/// Uppercases the first character and leaves the rest untouched: `orderId` -> `OrderId`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercases the first character: `SearchParams` -> `searchParams`.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Splits before every uppercase letter after the first character and lowercases:
/// `GetOrderById` -> `get-order-by-id`.
pub fn hyphenate(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('-');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// `{service}/{final-name}` in lowercase.
pub fn route_template(service: &str, final_name: &str) -> String {
    format!("{}/{}", service.to_lowercase(), hyphenate(final_name))
}
