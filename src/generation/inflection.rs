//! Rule-based English singularization for route segments
//!
//! Operates on lower-case ASCII words, which is all the naming normalizer
//! ever produces.

use once_cell::sync::Lazy;
use regex::Regex;

/// Suffix rules, tried in order. The first match wins.
static SUFFIX_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"^(.{2,})ies$", "${1}y"),
        (r"^(.+l)ves$", "${1}f"),
        (r"^(.+(?:ss|x|ch|sh|zz))es$", "${1}"),
        (r"^(.+us)es$", "${1}"),
        (r"^(.+ys)es$", "${1}is"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("singularization rule must compile"),
            replacement,
        )
    })
    .collect()
});

/// Words ending like this are already singular
static ALREADY_SINGULAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:ss|us|is)$").expect("singular suffix pattern must compile"));

fn irregular(word: &str) -> Option<&'static str> {
    let singular = match word {
        "people" => "person",
        "children" => "child",
        "men" => "man",
        "women" => "woman",
        "mice" => "mouse",
        "geese" => "goose",
        "feet" => "foot",
        "teeth" => "tooth",
        "movies" => "movie",
        "cookies" => "cookie",
        _ => return None,
    };
    Some(singular)
}

fn is_uncountable(word: &str) -> bool {
    matches!(
        word,
        "news"
            | "series"
            | "species"
            | "sheep"
            | "fish"
            | "deer"
            | "equipment"
            | "information"
    )
}

/// Returns the singular form of `word`, or `None` when no singular form can
/// be derived (the word is uncountable, already singular, or unknown).
///
/// # Examples
/// ```
/// use routesmith::generation::inflection::singularize;
///
/// assert_eq!(singularize("orders").as_deref(), Some("order"));
/// assert_eq!(singularize("categories").as_deref(), Some("category"));
/// assert_eq!(singularize("status"), None);
/// ```
pub fn singularize(word: &str) -> Option<String> {
    if word.is_empty() || is_uncountable(word) {
        return None;
    }
    if let Some(singular) = irregular(word) {
        return Some(singular.to_string());
    }
    for (rule, replacement) in SUFFIX_RULES.iter() {
        if rule.is_match(word) {
            return Some(rule.replace(word, *replacement).into_owned());
        }
    }
    if ALREADY_SINGULAR.is_match(word) {
        return None;
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => Some(stem.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        assert_eq!(singularize("orders").as_deref(), Some("order"));
        assert_eq!(singularize("todos").as_deref(), Some("todo"));
        assert_eq!(singularize("posts").as_deref(), Some("post"));
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(singularize("categories").as_deref(), Some("category"));
        assert_eq!(singularize("wolves").as_deref(), Some("wolf"));
        assert_eq!(singularize("boxes").as_deref(), Some("box"));
        assert_eq!(singularize("matches").as_deref(), Some("match"));
        assert_eq!(singularize("wishes").as_deref(), Some("wish"));
        assert_eq!(singularize("addresses").as_deref(), Some("address"));
        assert_eq!(singularize("statuses").as_deref(), Some("status"));
        assert_eq!(singularize("analyses").as_deref(), Some("analysis"));
    }

    #[test]
    fn test_irregular_and_uncountable() {
        assert_eq!(singularize("people").as_deref(), Some("person"));
        assert_eq!(singularize("children").as_deref(), Some("child"));
        assert_eq!(singularize("movies").as_deref(), Some("movie"));
        assert_eq!(singularize("news"), None);
        assert_eq!(singularize("series"), None);
    }

    #[test]
    fn test_no_singular_form() {
        assert_eq!(singularize("order"), None);
        assert_eq!(singularize("health"), None);
        assert_eq!(singularize("status"), None);
        assert_eq!(singularize("address"), None);
        assert_eq!(singularize("analysis"), None);
        assert_eq!(singularize("s"), None);
        assert_eq!(singularize(""), None);
    }
}
