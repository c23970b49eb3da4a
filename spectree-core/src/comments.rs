//! Helpers turning handler identity and attached comments into operation
//! names, summaries and descriptions.

/// Split a documentation comment into `(summary, description)`.
///
/// The summary is the first paragraph joined onto one line; the description
/// is everything after the first blank line.
pub fn parse_comments(comment: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) else {
        return (None, None);
    };

    let mut lines = comment.lines().map(str::trim);
    let summary: Vec<&str> = lines.by_ref().take_while(|line| !line.is_empty()).collect();
    let rest: Vec<&str> = lines.collect();

    let description = rest.join("\n").trim().to_string();
    (
        Some(summary.join(" ")),
        (!description.is_empty()).then_some(description),
    )
}

/// Short operation name from a function type name.
///
/// `app::handlers::list_users` becomes `list_users`; closures resolve to the
/// function they are defined in and generic arguments are dropped.
pub fn parse_name(type_name: &str) -> String {
    let mut path = type_name.split('<').next().unwrap_or(type_name);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path.rsplit("::").next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_and_description() {
        let (summary, desc) = parse_comments(Some(
            "List users\n  in pages\n\nReturns at most `limit` users.\nSorted by id.",
        ));
        assert_eq!(summary.as_deref(), Some("List users in pages"));
        assert_eq!(
            desc.as_deref(),
            Some("Returns at most `limit` users.\nSorted by id.")
        );
    }

    #[test]
    fn summary_only() {
        let (summary, desc) = parse_comments(Some("Health check"));
        assert_eq!(summary.as_deref(), Some("Health check"));
        assert!(desc.is_none());
    }

    #[test]
    fn empty_comment() {
        assert_eq!(parse_comments(None), (None, None));
        assert_eq!(parse_comments(Some("  \n ")), (None, None));
    }

    #[test]
    fn names() {
        assert_eq!(parse_name("app::handlers::list_users"), "list_users");
        assert_eq!(parse_name("app::main::{{closure}}"), "main");
        assert_eq!(parse_name("app::main::{{closure}}::{{closure}}"), "main");
        assert_eq!(parse_name("app::get_item<app::Item>"), "get_item");
        assert_eq!(parse_name("health"), "health");
    }
}
