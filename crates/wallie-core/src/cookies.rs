/// Ordered `name=value` cookie pairs.
///
/// Used both for the browser's `Cookie` header, which is relayed to the
/// tracker on every call, and for the session cookies the tracker hands back
/// at login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies(Vec<(String, String)>);

impl Cookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` request header (`a=1; b=2`). Malformed pairs are
    /// skipped.
    pub fn parse_header(raw: &str) -> Self {
        let mut cookies = Self::new();
        cookies.extend_from_header(raw);
        cookies
    }

    pub fn extend_from_header(&mut self, raw: &str) {
        for part in raw.split(';') {
            if let Some((name, value)) = split_pair(part) {
                self.push(name, value);
            }
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// True when `name` is present with a non-empty value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Render as a `Cookie` request header, `None` when there is nothing to
    /// send.
    pub fn header_value(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self.0.iter().map(|(n, v)| format!("{n}={v}")).collect();
        Some(pairs.join("; "))
    }
}

/// Name and value of a `Set-Cookie` response header; attributes are dropped.
pub fn parse_set_cookie(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?;
    split_pair(pair).map(|(n, v)| (n.to_string(), v.to_string()))
}

fn split_pair(part: &str) -> Option<(&str, &str)> {
    let (name, value) = part.trim().split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim().trim_matches('"')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cookie_header() {
        let cookies = Cookies::parse_header("JSESSIONID=abc; wallieRedirect=/sizing?project=X;atlassian.xsrf.token=t1");
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies.get("JSESSIONID"), Some("abc"));
        assert_eq!(cookies.get("wallieRedirect"), Some("/sizing?project=X"));
        assert_eq!(cookies.get("atlassian.xsrf.token"), Some("t1"));
    }

    #[test]
    fn skips_malformed_pairs() {
        let cookies = Cookies::parse_header("junk; =nameless; ok=1;;");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies.get("ok"), Some("1"));
    }

    #[test]
    fn empty_value_is_not_a_session() {
        let cookies = Cookies::parse_header("JSESSIONID=");
        assert_eq!(cookies.get("JSESSIONID"), Some(""));
        assert!(!cookies.has("JSESSIONID"));
    }

    #[test]
    fn header_value_round_trips_order() {
        let mut cookies = Cookies::new();
        assert_eq!(cookies.header_value(), None);
        cookies.push("a", "1");
        cookies.push("b", "2");
        assert_eq!(cookies.header_value().as_deref(), Some("a=1; b=2"));
    }

    #[test]
    fn set_cookie_keeps_only_name_and_value() {
        assert_eq!(
            parse_set_cookie("JSESSIONID=F00; Path=/jira; HttpOnly; Max-Age=99999"),
            Some(("JSESSIONID".to_string(), "F00".to_string()))
        );
        assert_eq!(parse_set_cookie("; Path=/"), None);
    }
}
