//! Low-level HTML and script-text emission.
//!
//! Widget markup is assembled from strings rather than `maud::html!` because
//! tag names and attribute sets arrive at runtime from caller configuration,
//! and the macro only accepts literal tags. Escaping still goes through maud's
//! [`Render`] implementation, so text content and attribute values pass the
//! same escaper the demo page shell uses.
//!
//! Attribute maps are `BTreeMap`s, so attributes always render in sorted
//! order and the same element options produce byte-identical markup on every
//! call.
//!
//! The module also owns script-safe JSON encoding: values embedded in an
//! inline `<script>` block additionally escape `<`, `>`, `&` and the JS line
//! separators as `\uXXXX` sequences so no payload can terminate the enclosing
//! script context.

use maud::Render;

use crate::options::AttrMap;

/// HTML-escape a text fragment using maud's escaper.
pub fn escape(text: &str) -> String {
    text.render().into_string()
}

/// Append a CSS class to the `class` attribute, creating it if absent.
///
/// Already-present classes are left alone, so normalization passes can run
/// over caller-supplied attribute maps without duplicating classes.
pub fn add_css_class(attrs: &mut AttrMap, class: &str) {
    match attrs.get_mut("class") {
        Some(existing) => {
            if !existing.split_whitespace().any(|c| c == class) {
                existing.push(' ');
                existing.push_str(class);
            }
        }
        None => {
            attrs.insert("class".to_string(), class.to_string());
        }
    }
}

/// Render an attribute map as ` name="value"` pairs, values escaped.
fn render_attrs(attrs: &AttrMap) -> String {
    let mut out = String::new();
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
    out
}

/// Render an opening tag.
pub fn begin_tag(tag: &str, attrs: &AttrMap) -> String {
    format!("<{tag}{}>", render_attrs(attrs))
}

/// Render a closing tag.
pub fn end_tag(tag: &str) -> String {
    format!("</{tag}>")
}

/// Render a complete element.
///
/// `content` must already be escaped (or be trusted markup); this mirrors
/// the split between label text and `encode_label` in the option types.
pub fn tag(tag: &str, content: &str, attrs: &AttrMap) -> String {
    format!("<{tag}{attrs}>{content}</{tag}>", attrs = render_attrs(attrs))
}

/// Render an `<input>` element of the given type.
///
/// `name` and `value` are merged into the attribute map before emission, so
/// they participate in the same sorted, escaped rendering as everything else.
pub fn input(kind: &str, name: Option<&str>, value: Option<&str>, attrs: &AttrMap) -> String {
    let mut all = attrs.clone();
    all.insert("type".to_string(), kind.to_string());
    if let Some(name) = name {
        all.insert("name".to_string(), name.to_string());
    }
    if let Some(value) = value {
        all.insert("value".to_string(), value.to_string());
    }
    format!("<input{}>", render_attrs(&all))
}

/// JSON-encode a value so it is safe to embed in an inline script block.
///
/// `<`, `>`, `&`, U+2028 and U+2029 are emitted as `\uXXXX` escapes. In JSON
/// these characters only ever occur inside string literals, so the rewrite
/// keeps the output valid JSON and valid JavaScript.
pub fn json_html_encode(value: &serde_json::Value) -> String {
    let json = value.to_string();
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// Encode a string as a script-safe JS string literal (quotes included).
pub fn js_string(text: &str) -> String {
    json_html_encode(&serde_json::Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttrMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn attrs_render_sorted_and_escaped() {
        let tag = begin_tag("div", &attrs(&[("id", "x"), ("class", "a \"b\"")]));
        assert_eq!(tag, r#"<div class="a &quot;b&quot;" id="x">"#);
    }

    #[test]
    fn tag_wraps_content() {
        assert_eq!(
            tag("span", "hi", &attrs(&[("class", "c")])),
            r#"<span class="c">hi</span>"#
        );
    }

    #[test]
    fn input_merges_name_and_value() {
        let html = input("hidden", Some("photo[crop]"), Some("x"), &attrs(&[("class", "c")]));
        assert_eq!(
            html,
            r#"<input class="c" name="photo[crop]" type="hidden" value="x">"#
        );
    }

    #[test]
    fn input_without_name_or_value() {
        assert_eq!(input("range", None, None, &AttrMap::new()), r#"<input type="range">"#);
    }

    #[test]
    fn add_css_class_appends_once() {
        let mut map = attrs(&[("class", "one")]);
        add_css_class(&mut map, "two");
        add_css_class(&mut map, "two");
        assert_eq!(map.get("class").unwrap(), "one two");
    }

    #[test]
    fn add_css_class_creates_attribute() {
        let mut map = AttrMap::new();
        add_css_class(&mut map, "only");
        assert_eq!(map.get("class").unwrap(), "only");
    }

    #[test]
    fn json_html_encode_escapes_script_breakers() {
        let value = serde_json::json!({ "html": "</script><b>&" });
        let encoded = json_html_encode(&value);
        assert!(!encoded.contains('<'));
        assert!(!encoded.contains('>'));
        assert!(!encoded.contains('&'));
        assert!(encoded.contains("\\u003c/script\\u003e"));
    }

    #[test]
    fn js_string_is_quoted() {
        assert_eq!(js_string("a\"b"), r#""a\"b""#);
    }
}
