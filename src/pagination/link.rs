//! RFC 5988 `Link` header parsing

use std::collections::HashMap;

/// Parse a `Link` header into a map of relation name to target URL
///
/// Format: `<https://host/api/v4/projects?page=2>; rel="next", <...>; rel="last"`.
/// A `rel` carrying several space-separated names registers the URL under
/// each of them. Entries without a `rel` are ignored, and a later entry for
/// the same relation replaces an earlier one.
pub fn parse_link_header(header: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();
    let mut rest = header;

    while let Some(start) = rest.find('<') {
        let Some(len) = rest[start..].find('>') else {
            break;
        };
        let url = rest[start + 1..start + len].trim();
        rest = &rest[start + len + 1..];

        let params_end = rest.find('<').unwrap_or(rest.len());
        let params = &rest[..params_end];

        for param in params.split(';') {
            let param = param.trim().trim_end_matches(',').trim();
            let Some((name, value)) = param.split_once('=') else {
                continue;
            };
            if !name.trim().eq_ignore_ascii_case("rel") {
                continue;
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            for rel in value.split_whitespace() {
                links.insert(rel.to_string(), url.to_string());
            }
        }
    }

    links
}

#[cfg(test)]
mod link_tests {
    use super::*;

    #[test]
    fn test_parse_gitlab_link_header() {
        let header = concat!(
            "<https://gitlab.com/api/v4/projects?page=1&per_page=3>; rel=\"prev\", ",
            "<https://gitlab.com/api/v4/projects?page=3&per_page=3>; rel=\"next\", ",
            "<https://gitlab.com/api/v4/projects?page=1&per_page=3>; rel=\"first\", ",
            "<https://gitlab.com/api/v4/projects?page=4&per_page=3>; rel=\"last\""
        );

        let links = parse_link_header(header);

        assert_eq!(links.len(), 4);
        assert_eq!(
            links.get("next").map(String::as_str),
            Some("https://gitlab.com/api/v4/projects?page=3&per_page=3")
        );
        assert_eq!(
            links.get("last").map(String::as_str),
            Some("https://gitlab.com/api/v4/projects?page=4&per_page=3")
        );
    }

    #[test]
    fn test_parse_url_with_commas() {
        let header = "<https://x/api/v4/issues?labels=a,b&page=2>; rel=\"next\"";
        let links = parse_link_header(header);
        assert_eq!(
            links.get("next").map(String::as_str),
            Some("https://x/api/v4/issues?labels=a,b&page=2")
        );
    }

    #[test]
    fn test_parse_multiple_rel_names() {
        let links = parse_link_header("<https://x/p?page=2>; rel=\"next last\"");
        assert_eq!(links.get("next"), links.get("last"));
        assert!(links.contains_key("next"));
    }

    #[test]
    fn test_parse_extra_params_and_unquoted_rel() {
        let links = parse_link_header("<https://x/p?page=2>; title=\"Page 2\"; rel=next");
        assert_eq!(
            links.get("next").map(String::as_str),
            Some("https://x/p?page=2")
        );
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert!(parse_link_header("").is_empty());
        assert!(parse_link_header("not a link header").is_empty());
        assert!(parse_link_header("<https://x/p?page=2>").is_empty());
        assert!(parse_link_header("<https://x/p?page=2; rel=\"next\"").is_empty());
    }
}
