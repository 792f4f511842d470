use crate::cookies::schema::samesite;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical cookie record, shared by both store dialects.
///
/// Timestamps are Unix seconds. `session` and `persistent` are derived from
/// `expires` and always agree with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub expires: Option<f64>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub same_site: Option<SameSite>,
    #[serde(default)]
    pub created: Option<f64>,
    #[serde(default)]
    pub last_accessed: Option<f64>,
    #[serde(default = "default_true")]
    pub session: bool,
    #[serde(default)]
    pub persistent: bool,
    #[serde(default)]
    pub source_scheme: Option<String>,
}

fn default_true() -> bool {
    true
}

/// SameSite attribute as stored by the browser.
///
/// Codes other than None/Lax/Strict (e.g. Chromium's `-1` "unspecified") are
/// kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SameSiteRepr", into = "SameSiteRepr")]
pub enum SameSite {
    NoRestriction,
    Lax,
    Strict,
    Other(i64),
}

impl SameSite {
    /// Interpret a raw Chromium `samesite` code.
    pub fn from_code(code: i64) -> Self {
        match code {
            samesite::NO_RESTRICTION => SameSite::NoRestriction,
            samesite::LAX => SameSite::Lax,
            samesite::STRICT => SameSite::Strict,
            other => SameSite::Other(other),
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::NoRestriction => f.write_str("None"),
            SameSite::Lax => f.write_str("Lax"),
            SameSite::Strict => f.write_str("Strict"),
            SameSite::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Wire form: `"None" | "Lax" | "Strict"` or a raw integer code.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SameSiteRepr {
    Code(i64),
    Label(String),
}

impl TryFrom<SameSiteRepr> for SameSite {
    type Error = String;

    fn try_from(repr: SameSiteRepr) -> Result<Self, Self::Error> {
        match repr {
            SameSiteRepr::Code(code) => Ok(SameSite::from_code(code)),
            SameSiteRepr::Label(label) => match label.to_ascii_lowercase().as_str() {
                "none" | "no_restriction" => Ok(SameSite::NoRestriction),
                "lax" => Ok(SameSite::Lax),
                "strict" => Ok(SameSite::Strict),
                _ => Err(format!("unknown SameSite value '{}'", label)),
            },
        }
    }
}

impl From<SameSite> for SameSiteRepr {
    fn from(same_site: SameSite) -> Self {
        match same_site {
            SameSite::Other(code) => SameSiteRepr::Code(code),
            labelled => SameSiteRepr::Label(labelled.to_string()),
        }
    }
}

/// Strip leading dots from a cookie domain. Idempotent.
pub fn normalize_domain(domain: &str) -> &str {
    domain.trim_start_matches('.')
}

impl Cookie {
    /// A session cookie with no optional attributes set.
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let domain = domain.into();
        Self {
            domain: normalize_domain(&domain).to_string(),
            name: name.into(),
            value: value.into(),
            path: path.into(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: None,
            created: None,
            last_accessed: None,
            session: true,
            persistent: false,
            source_scheme: None,
        }
    }

    /// Set the expiry, keeping `session`/`persistent` consistent with it.
    pub fn with_expires(mut self, expires: Option<f64>) -> Self {
        self.expires = expires.filter(|&t| t != 0.0);
        self.session = self.expires.is_none();
        self.persistent = !self.session;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: Option<SameSite>) -> Self {
        self.same_site = same_site;
        self
    }

    /// Re-establish the record invariants on a cookie from an arbitrary source.
    pub fn normalized(self) -> Self {
        let expires = self.expires;
        let mut cookie = self.with_expires(expires);
        if cookie.domain.starts_with('.') {
            cookie.domain = normalize_domain(&cookie.domain).to_string();
        }
        cookie
    }

    pub fn is_session(&self) -> bool {
        self.session
    }

    /// Whether the cookie has expired as of `now` (Unix seconds).
    pub fn is_expired(&self, now: f64) -> bool {
        self.expires.is_some_and(|expiry| expiry < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain_idempotent() {
        for domain in [".example.com", "..example.com", "example.com", ""] {
            let once = normalize_domain(domain);
            assert_eq!(normalize_domain(once), once);
            assert!(!once.starts_with('.'));
        }
    }

    #[test]
    fn test_session_invariant() {
        let cookie = Cookie::new(".example.com", "sid", "v", "/");
        assert_eq!(cookie.domain, "example.com");
        assert!(cookie.session && !cookie.persistent);

        let cookie = cookie.with_expires(Some(1_900_000_000.0));
        assert!(!cookie.session && cookie.persistent);

        // Zero is not a real expiry
        let cookie = cookie.with_expires(Some(0.0));
        assert!(cookie.session && !cookie.persistent);
        assert_eq!(cookie.expires, None);
    }

    #[test]
    fn test_json_field_names() {
        let cookie = Cookie::new("example.com", "a", "b", "/")
            .with_http_only(true)
            .with_same_site(Some(SameSite::NoRestriction));
        let json = serde_json::to_value(&cookie).unwrap();

        assert_eq!(json["httpOnly"], true);
        assert_eq!(json["sameSite"], "None");
        assert!(json["lastAccessed"].is_null());
        assert!(json["sourceScheme"].is_null());
    }

    #[test]
    fn test_same_site_accepts_codes_and_labels() {
        let parsed: SameSite = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, SameSite::NoRestriction);
        let parsed: SameSite = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(parsed, SameSite::Strict);
        let parsed: SameSite = serde_json::from_str("-1").unwrap();
        assert_eq!(parsed, SameSite::Other(-1));
        assert_eq!(serde_json::to_string(&SameSite::Other(-1)).unwrap(), "-1");
        assert!(serde_json::from_str::<SameSite>("\"sideways\"").is_err());
    }

    #[test]
    fn test_minimal_json_cookie() {
        let cookie: Cookie =
            serde_json::from_str(r#"{"domain": ".shop.example.com", "name": "cart"}"#).unwrap();
        let cookie = cookie.normalized();
        assert_eq!(cookie.domain, "shop.example.com");
        assert!(cookie.session);
        assert_eq!(cookie.same_site, None);
    }

    #[test]
    fn test_is_expired() {
        let cookie = Cookie::new("example.com", "a", "b", "/").with_expires(Some(100.0));
        assert!(cookie.is_expired(200.0));
        assert!(!cookie.is_expired(50.0));
        assert!(!Cookie::new("example.com", "a", "b", "/").is_expired(200.0));
    }
}
