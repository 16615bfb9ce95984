//! Links to the debug session view.

use worker_core::UrlFormat;

/// Route of the session detail view, relative to the module.
pub const VIEW_ROUTE: &str = "default/view";

/// Builds links into the debug module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugUrl {
    module_id: String,
    format: UrlFormat,
}

impl DebugUrl {
    /// Create a link builder for the given module.
    pub fn new(module_id: impl Into<String>, format: UrlFormat) -> Self {
        Self {
            module_id: module_id.into(),
            format,
        }
    }

    /// Full route of the session detail view.
    pub fn view_route(&self) -> String {
        format!("{}/{}", self.module_id.trim_matches('/'), VIEW_ROUTE)
    }

    /// Link to the detail view of the session with `tag`.
    pub fn session_view(&self, tag: &str) -> String {
        let route = self.view_route();
        let tag = urlencoding::encode(tag);

        match &self.format {
            UrlFormat::Query { script_url } => format!(
                "{}?r={}&tag={}",
                script_url,
                urlencoding::encode(&route),
                tag
            ),
            UrlFormat::Path => format!("/{}?tag={}", route, tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_style() -> UrlFormat {
        UrlFormat::Query {
            script_url: "/index.php".to_string(),
        }
    }

    #[test]
    fn test_query_style_link() {
        let url = DebugUrl::new("test-module", query_style());

        assert_eq!(
            url.session_view("test-debug-tag"),
            "/index.php?r=test-module%2Fdefault%2Fview&tag=test-debug-tag"
        );
    }

    #[test]
    fn test_path_style_link() {
        let url = DebugUrl::new("debug", UrlFormat::Path);

        assert_eq!(url.session_view("5f1a"), "/debug/default/view?tag=5f1a");
    }

    #[test]
    fn test_tag_is_encoded() {
        let url = DebugUrl::new("debug", UrlFormat::Path);

        assert_eq!(url.session_view("a b&c"), "/debug/default/view?tag=a%20b%26c");
    }

    #[test]
    fn test_nested_module_id() {
        let url = DebugUrl::new("/admin/debug/", UrlFormat::Path);

        assert_eq!(url.view_route(), "admin/debug/default/view");
    }
}
