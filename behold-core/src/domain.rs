// Bare-domain extraction used to key the NSFW table

use url::Url;

/// Reduce an http(s) URL to its bare domain: the host without a leading
/// `www.` and without the final label.
///
/// `https://www.example.com/x` becomes `example`, `https://sub.example.co.uk`
/// becomes `sub.example.co`. Hosts with no dot yield `None`.
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let (domain, _) = host.rsplit_once('.')?;

    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_www_and_tld() {
        assert_eq!(extract_domain("https://www.github.com/"), Some("github".to_string()));
        assert_eq!(extract_domain("http://github.com"), Some("github".to_string()));
    }

    #[test]
    fn test_keeps_subdomains() {
        assert_eq!(
            extract_domain("https://gist.github.com/someone"),
            Some("gist.github".to_string())
        );
        assert_eq!(
            extract_domain("https://www.bbc.co.uk/news"),
            Some("bbc.co".to_string())
        );
    }

    #[test]
    fn test_same_domain_for_equivalent_urls() {
        assert_eq!(
            extract_domain("https://www.reddit.com/user/x"),
            extract_domain("http://reddit.com")
        );
    }

    #[test]
    fn test_ignores_port_and_case() {
        assert_eq!(
            extract_domain("HTTPS://WWW.Example.COM:8443/path"),
            Some("example".to_string())
        );
    }

    #[test]
    fn test_rejects_non_http_and_dotless_hosts() {
        assert_eq!(extract_domain("ftp://files.example.com"), None);
        assert_eq!(extract_domain("http://localhost:8080/"), None);
        assert_eq!(extract_domain("not a url"), None);
        assert_eq!(extract_domain(""), None);
    }
}
