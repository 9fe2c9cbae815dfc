use http::HeaderMap;

/// Extract the `rel="next"` target from a `Link` response header.
///
/// Format: `<https://api.github.com/...&page=2>; rel="next", <...>; rel="last"`
pub fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(http::header::LINK)?.to_str().ok()?;
    parse_next_link(value)
}

fn parse_next_link(value: &str) -> Option<String> {
    value.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        is_next.then(|| url.to_string())
    })
}

/// Read `X-RateLimit-Remaining`. Missing or non-numeric values yield None.
pub fn remaining_rate_limit(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("x-ratelimit-remaining")?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
