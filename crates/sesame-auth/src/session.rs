//! Session cookie construction.

use httpdate::fmt_http_date;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// SameSite attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// SameSite=Strict
    Strict,
    /// SameSite=Lax
    Lax,
    /// SameSite=None
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Builds `Set-Cookie` values for the signed-in session.
///
/// With `host_prefix` on (the default) the name is prefixed with `__Host-`,
/// which requires `Path=/` and `Secure`; both are always emitted in that
/// case. The cookie path is always `/`.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    /// Cookie name (without any prefix).
    pub name: String,

    /// Send on HTTPS only.
    pub secure: bool,

    /// Not accessible to JS.
    pub http_only: bool,

    /// SameSite attribute.
    pub same_site: SameSite,

    /// Session lifetime; session-scoped when unset.
    pub max_age: Option<Duration>,

    /// Prefix the name with `__Host-`.
    pub host_prefix: bool,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            name: "sesame_session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            max_age: None,
            host_prefix: true,
        }
    }
}

impl SessionCookie {
    fn full_name(&self) -> String {
        if self.host_prefix {
            format!("__Host-{}", self.name.trim_start_matches("__Host-"))
        } else {
            self.name.clone()
        }
    }

    fn attributes(&self) -> Vec<String> {
        let mut parts = vec!["Path=/".to_string()];
        if self.secure || self.host_prefix {
            parts.push("Secure".to_string());
        }
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        parts.push(format!("SameSite={}", self.same_site.as_str()));
        parts
    }

    /// `Set-Cookie` value carrying `value` for the session.
    pub fn issue(&self, value: &str) -> String {
        let mut parts = vec![format!("{}={value}", self.full_name())];
        parts.extend(self.attributes());
        if let Some(max_age) = self.max_age {
            parts.push(format!("Max-Age={}", max_age.as_secs()));
            // Expires for older clients.
            parts.push(format!("Expires={}", fmt_http_date(SystemTime::now() + max_age)));
        }
        parts.join("; ")
    }

    /// `Set-Cookie` value clearing the session.
    pub fn clear(&self) -> String {
        let mut parts = vec![format!("{}=", self.full_name())];
        parts.extend(self.attributes());
        parts.push("Max-Age=0".to_string());
        parts.push(format!("Expires={}", fmt_http_date(UNIX_EPOCH)));
        parts.join("; ")
    }
}
