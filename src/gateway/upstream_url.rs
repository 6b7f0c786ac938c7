//! 转发目标地址拼装
//!
//! 入站通配路径 + 原始查询串 => `{origin}/api/{path}?{query}`。
//! 查询串按原文透传，不做重编码、过滤或去重。

/// 拼装转发目标 URL
///
/// `origin` 末尾斜杠与 `path` 开头斜杠都会被规整掉，保证恰好一个分隔符。
#[must_use]
pub fn build_target_url(origin: &str, path: &str, raw_query: Option<&str>) -> String {
    let origin = origin.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    let mut url = format!("{origin}/api/{path}");
    if let Some(query) = raw_query
        && !query.is_empty()
    {
        url.push('?');
        url.push_str(query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("members", None, "http://backend:5000/api/members")]
    #[case("members/42", None, "http://backend:5000/api/members/42")]
    #[case("members", Some("page=2&limit=10"), "http://backend:5000/api/members?page=2&limit=10")]
    #[case("reports/monthly/2024", Some("a=1&a=2"), "http://backend:5000/api/reports/monthly/2024?a=1&a=2")]
    fn test_build_target_url(
        #[case] path: &str,
        #[case] query: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(build_target_url("http://backend:5000", path, query), expected);
    }

    #[test]
    fn test_trailing_and_leading_slashes_collapse() {
        assert_eq!(
            build_target_url("http://backend:5000/", "/members", None),
            "http://backend:5000/api/members"
        );
    }

    #[test]
    fn test_empty_query_is_ignored() {
        assert_eq!(
            build_target_url("http://backend:5000", "members", Some("")),
            "http://backend:5000/api/members"
        );
    }

    #[test]
    fn test_query_passed_through_verbatim() {
        // 已编码与重复键都不做处理
        let url = build_target_url(
            "http://backend:5000",
            "search",
            Some("q=a%20b&tag=x&tag=y&raw[]=1"),
        );
        assert_eq!(url, "http://backend:5000/api/search?q=a%20b&tag=x&tag=y&raw[]=1");
    }
}
