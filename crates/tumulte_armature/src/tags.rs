//! Tag classification.

use phf::phf_set;

/// HTML and SVG element names. Anything else refers to a component.
static KNOWN_TAGS: phf::Set<&'static str> = phf_set! {
    // HTML
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base",
    "bdi", "bdo", "blockquote", "body", "br", "button", "canvas", "caption",
    "cite", "code", "col", "colgroup", "data", "datalist", "dd", "del",
    "details", "dfn", "dialog", "div", "dl", "dt", "em", "embed", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img",
    "input", "ins", "kbd", "label", "legend", "li", "link", "main", "map",
    "mark", "menu", "meta", "meter", "nav", "noscript", "object", "ol",
    "optgroup", "option", "output", "p", "param", "picture", "pre",
    "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "search",
    "section", "select", "slot", "small", "source", "span", "strong",
    "style", "sub", "summary", "sup", "table", "tbody", "td", "template",
    "textarea", "tfoot", "th", "thead", "time", "title", "tr", "track", "u",
    "ul", "var", "video", "wbr",
    // SVG
    "svg", "g", "path", "circle", "rect", "line", "polyline", "polygon",
    "ellipse", "text", "tspan", "defs", "use", "symbol", "clippath",
    "lineargradient", "radialgradient", "stop", "mask", "pattern", "image",
    "foreignobject", "marker", "filter",
};

static VOID_TAGS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "param", "source", "track", "wbr",
};

/// Check if a tag refers to another component rather than a DOM element.
pub fn is_custom_tag(tag: &str) -> bool {
    tag.contains('-') || !KNOWN_TAGS.contains(tag.to_ascii_lowercase().as_str())
}

/// Elements that never have children or a closing tag.
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(tag.to_ascii_lowercase().as_str())
}

/// Elements whose content is raw text, not markup.
pub fn is_raw_text_tag(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_custom_tag() {
        assert!(is_custom_tag("my-app"));
        assert!(is_custom_tag("todo-item"));
        assert!(is_custom_tag("Sidebar"));
        assert!(!is_custom_tag("div"));
        assert!(!is_custom_tag("DIV"));
        assert!(!is_custom_tag("slot"));
        assert!(!is_custom_tag("linearGradient"));
    }

    #[test]
    fn test_void_and_raw_text() {
        assert!(is_void_tag("br"));
        assert!(is_void_tag("IMG"));
        assert!(!is_void_tag("div"));
        assert!(is_raw_text_tag("SCRIPT"));
        assert!(!is_raw_text_tag("template"));
    }
}
