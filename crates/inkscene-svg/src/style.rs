//! Inline `style` attribute handling.

use std::collections::HashMap;

use tracing::debug;

/// Parse a CSS declaration list (`fill:#fff; stroke : none`) into a map.
///
/// Blank segments are ignored, as are segments without a `:`. Keys and
/// values are trimmed; later declarations win.
pub fn parse_style(style: &str) -> HashMap<String, String> {
    let mut declarations = HashMap::new();
    for segment in style.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        match segment.split_once(':') {
            Some((key, value)) => {
                declarations.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => debug!(segment, "ignoring style declaration without ':'"),
        }
    }
    declarations
}

/// Merge a `style` attribute underneath direct attributes.
///
/// The returned map holds every direct attribute except `style`, plus every
/// style declaration whose key is not also a direct attribute.
pub fn merge_style(attributes: &HashMap<String, String>) -> HashMap<String, String> {
    let mut merged = attributes
        .get("style")
        .map(|style| parse_style(style))
        .unwrap_or_default();
    merged.extend(
        attributes
            .iter()
            .filter(|(key, _)| key.as_str() != "style")
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style() {
        let style = parse_style("fill:#ff0000; stroke : none;;  opacity:0.5 ");
        assert_eq!(style.len(), 3);
        assert_eq!(style["fill"], "#ff0000");
        assert_eq!(style["stroke"], "none");
        assert_eq!(style["opacity"], "0.5");
    }

    #[test]
    fn test_parse_style_blank_and_malformed() {
        assert!(parse_style("").is_empty());
        assert!(parse_style(" ; ; ").is_empty());
        let style = parse_style("garbage; fill:red");
        assert_eq!(style.len(), 1);
        assert_eq!(style["fill"], "red");
    }

    #[test]
    fn test_parse_style_value_with_colon() {
        let style = parse_style("marker:url(http://example.com/a.svg#m)");
        assert_eq!(style["marker"], "url(http://example.com/a.svg#m)");
    }

    #[test]
    fn test_merge_style_precedence() {
        let mut attrs = HashMap::new();
        attrs.insert("fill".to_string(), "blue".to_string());
        attrs.insert("style".to_string(), "fill:red;stroke:green".to_string());

        let merged = merge_style(&attrs);
        assert_eq!(merged["fill"], "blue");
        assert_eq!(merged["stroke"], "green");
        assert!(!merged.contains_key("style"));
    }
}
