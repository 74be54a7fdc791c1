/// Builds the scheme-less link to a merge request shown in the report.
///
/// # Arguments
///
/// * `web_url` - Project web URL (e.g., <https://gitlab.com/group/project>)
/// * `iid` - Project-scoped merge request number
///
/// # Returns
///
/// Host and path of the merge request (e.g., `gitlab.com/group/project/merge_requests/12`)
pub fn merge_request_url(web_url: &str, iid: u64) -> String {
    let location = strip_scheme(web_url).trim_end_matches('/');
    format!("{location}/merge_requests/{iid}")
}

fn strip_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_scheme_https() {
        assert_eq!(strip_scheme("https://gitlab.com/group/app"), "gitlab.com/group/app");
    }

    #[test]
    fn test_strip_scheme_without_scheme() {
        assert_eq!(strip_scheme("gitlab.local/app"), "gitlab.local/app");
    }

    #[test]
    fn test_merge_request_url() {
        let url = merge_request_url("https://gitlab.example.com/web/shop", 42);
        assert_eq!(url, "gitlab.example.com/web/shop/merge_requests/42");
    }

    #[test]
    fn test_merge_request_url_trailing_slash() {
        let url = merge_request_url("http://git.internal:8080/tools/cli/", 1);
        assert_eq!(url, "git.internal:8080/tools/cli/merge_requests/1");
    }
}
