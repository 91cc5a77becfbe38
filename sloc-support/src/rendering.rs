//! Text rendering utilities for human-friendly error messages.
//!
//! Service keys are either Rust types (rendered through their full
//! `type_name`) or free-form names. These helpers keep both readable.

use tracing::trace;

/// Shortens a fully qualified type name for display.
///
/// ```
/// use sloc_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>");
/// assert_eq!(short, "Arc<dyn Logger>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                // path prefix, keep only the last segment
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => current_segment.push(ch),
        }
    }

    result.push_str(&current_segment);
    result
}

/// Renders a list of key labels as an indented bullet list.
///
/// ```
/// use sloc_support::rendering::render_key_list;
///
/// let rendered = render_key_list(&["Hello", "my_app::Database"]);
/// assert_eq!(rendered, "\n    - Hello\n    - my_app::Database");
/// ```
pub fn render_key_list(keys: &[impl AsRef<str>]) -> String {
    keys.iter()
        .map(|k| format!("\n    - {}", k.as_ref()))
        .collect()
}

/// Suggests registered keys whose label is close to `requested`.
///
/// Scoring, highest first: substring match on the full label, substring
/// match on the shortened type name, then a shared prefix of at least
/// three characters. Ties are ordered by label.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    trace!(requested, candidates = available.len(), "Scoring suggestions");

    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_lower == requested_lower {
                return None;
            }

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    // equal scores fall back to label order
    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_simple_path() {
        assert_eq!(shorten_type_name("my_app::services::UserService"), "UserService");
    }

    #[test]
    fn shorten_with_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
            "Arc<dyn Logger>"
        );
    }

    #[test]
    fn shorten_tuple() {
        assert_eq!(shorten_type_name("(alloc::string::String, i32)"), "(String, i32)");
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("Hello"), "Hello");
    }

    #[test]
    fn empty_key_list() {
        let keys: Vec<&str> = vec![];
        assert_eq!(render_key_list(&keys), "");
    }

    #[test]
    fn suggest_similar_types() {
        let available = vec![
            "my_app::UserService",
            "my_app::UserRepository",
            "my_app::Logger",
            "my_app::Database",
        ];

        let suggestions = suggest_similar("UserServise", &available, 3);
        assert!(!suggestions.is_empty());
        assert!(suggestions[0].contains("UserService"));
    }

    #[test]
    fn suggest_named_keys() {
        let available = vec!["Hello", "greeting", "database_url"];
        let suggestions = suggest_similar("Hell", &available, 3);
        assert_eq!(suggestions, vec!["Hello".to_string()]);
    }

    #[test]
    fn suggest_respects_limit() {
        let available = vec!["user_a", "user_b", "user_c", "user_d"];
        let suggestions = suggest_similar("user", &available, 2);
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn suggest_breaks_ties_by_label() {
        let available = vec!["user_d", "user_b", "user_a", "user_c"];
        let suggestions = suggest_similar("user", &available, 3);
        assert_eq!(suggestions, vec!["user_a", "user_b", "user_c"]);
    }

    #[test]
    fn suggest_skips_exact_label() {
        let available = vec!["Hello"];
        assert!(suggest_similar("Hello", &available, 3).is_empty());
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["my_app::Database"];
        let suggestions = suggest_similar("XyzAbcDef", &available, 3);
        assert!(suggestions.is_empty());
    }
}
