pub const DEFAULT_CLASSIFIER_URL: &str = "http://localhost:5000/predict";
pub const CLASSIFIER_PORT: u16 = 5000;

/// Picks the classifier URL: an explicit override wins, otherwise the
/// classifier is assumed to run on port 5000 of the host serving the page.
pub fn resolve_classifier_url(configured: Option<&str>, page_hostname: Option<&str>) -> String {
    if let Some(url) = configured.map(str::trim).filter(|url| !url.is_empty()) {
        return url.to_string();
    }

    match page_hostname.map(str::trim) {
        Some(host) if !is_loopback(host) => {
            format!("http://{}:{}/predict", host, CLASSIFIER_PORT)
        }
        _ => DEFAULT_CLASSIFIER_URL.to_string(),
    }
}

fn is_loopback(host: &str) -> bool {
    matches!(host, "" | "localhost" | "127.0.0.1" | "[::1]" | "::1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        assert_eq!(
            resolve_classifier_url(Some("https://birds.example/api/predict"), Some("10.0.0.5")),
            "https://birds.example/api/predict"
        );
    }

    #[test]
    fn blank_override_is_ignored() {
        assert_eq!(
            resolve_classifier_url(Some("   "), Some("192.168.1.20")),
            "http://192.168.1.20:5000/predict"
        );
    }

    #[test]
    fn loopback_and_unknown_hosts_use_default() {
        for host in [None, Some(""), Some("localhost"), Some("127.0.0.1"), Some("[::1]")] {
            assert_eq!(resolve_classifier_url(None, host), DEFAULT_CLASSIFIER_URL);
        }
    }
}
