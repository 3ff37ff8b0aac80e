//! Optional per-extension minification transforms.
//!
//! Minification is currently disabled for firmware builds so hand-written
//! JavaScript keeps working; the default set is empty and every asset passes
//! through untouched. The transforms stay available for callers that opt in.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// A pure text transform applied before compression.
pub type Minifier = fn(&str) -> String;

/// Set of minification transforms keyed by lowercase file extension.
#[derive(Debug, Clone, Default)]
pub struct MinifierSet {
    transforms: BTreeMap<String, Minifier>,
}

impl MinifierSet {
    /// Empty set: no asset is transformed.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Built-in transforms for `js`, `css`, `html` and `json` sources.
    pub fn builtin() -> Self {
        let mut set = Self::default();
        set.register("js", minify_js);
        set.register("css", minify_css);
        set.register("html", minify_html);
        set.register("json", minify_json);
        set
    }

    /// Register a transform for a file extension (without the leading dot).
    pub fn register(&mut self, extension: &str, transform: Minifier) {
        self.transforms
            .insert(extension.to_ascii_lowercase(), transform);
    }

    /// Look up the transform registered for an extension, if any.
    pub fn get(&self, extension: &str) -> Option<Minifier> {
        self.transforms.get(&extension.to_ascii_lowercase()).copied()
    }

    /// Returns `true` when no transform is registered.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

fn block_comments() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("invalid block comment regex"))
}

fn line_comments() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"//.*").expect("invalid line comment regex"))
}

fn whitespace_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

fn css_punctuation() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r" ?([{}:;,]) ?").expect("invalid punctuation regex"))
}

fn html_comments() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("invalid html comment regex"))
}

fn tag_gaps() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r">\s+<").expect("invalid tag gap regex"))
}

/// Strip comments and collapse whitespace in JavaScript source.
pub fn minify_js(text: &str) -> String {
    let text = block_comments().replace_all(text, "");
    let text = line_comments().replace_all(&text, "");
    whitespace_runs().replace_all(&text, " ").trim().to_string()
}

/// Strip comments, collapse whitespace and tighten punctuation in CSS source.
pub fn minify_css(text: &str) -> String {
    let text = block_comments().replace_all(text, "");
    let text = whitespace_runs().replace_all(&text, " ");
    let text = css_punctuation().replace_all(&text, "$1");
    text.replace(";}", "}").trim().to_string()
}

/// Strip comments and collapse whitespace between HTML tags.
pub fn minify_html(text: &str) -> String {
    let text = html_comments().replace_all(text, "");
    let text = tag_gaps().replace_all(&text, "><");
    whitespace_runs().replace_all(&text, " ").trim().to_string()
}

/// Collapse whitespace runs in JSON text.
pub fn minify_json(text: &str) -> String {
    whitespace_runs().replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_inert() {
        let set = MinifierSet::disabled();
        assert!(set.is_empty());
        assert!(set.get("js").is_none());
    }

    #[test]
    fn builtin_set_covers_text_extensions() {
        let set = MinifierSet::builtin();
        assert!(set.get("js").is_some());
        assert!(set.get("css").is_some());
        assert!(set.get("html").is_some());
        assert!(set.get("json").is_some());
        assert!(set.get("png").is_none());
    }

    #[test]
    fn lookup_ignores_extension_case() {
        let set = MinifierSet::builtin();
        assert!(set.get("JS").is_some());
    }

    #[test]
    fn strips_js_comments() {
        let source = "/* banner */\nlet x = 1; // trailing\nlet y = 2;";
        assert_eq!(minify_js(source), "let x = 1; let y = 2;");
    }

    #[test]
    fn tightens_css() {
        let source = "body {\n  color: red;\n}\n/* note */\n";
        assert_eq!(minify_css(source), "body{color:red}");
    }

    #[test]
    fn collapses_html_between_tags() {
        let source = "<html>\n  <!-- comment -->\n  <body>\n    hi\n  </body>\n</html>";
        assert_eq!(minify_html(source), "<html><body> hi </body></html>");
    }

    #[test]
    fn collapses_json_whitespace() {
        let source = "{\n  \"a\": 1\n}";
        assert_eq!(minify_json(source), "{ \"a\": 1 }");
    }
}
