//! One-shot notice cookie ("flash"): set on a redirect, consumed by the next
//! page view. The payload is base64-encoded JSON so arbitrary message text
//! stays cookie-safe. Display-only, so the cookie is not signed — the session
//! cookie is the authenticated one.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// A transient, human-readable notice for the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Queues a notice on the jar; delivered with whatever response carries it.
pub fn push(jar: CookieJar, level: FlashLevel, message: impl Into<String>) -> CookieJar {
    let flash = Flash {
        level,
        message: message.into(),
    };
    jar.add(Cookie::build((FLASH_COOKIE, encode(&flash))).path("/").build())
}

/// Takes the pending notice, if any, returning a jar that clears the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let pending = jar.get(FLASH_COOKIE).and_then(|c| decode(c.value()));
    let mut removal = Cookie::from(FLASH_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), pending)
}

/// Raw `Set-Cookie` value for responses built outside a jar (error redirects).
pub fn set_cookie_value(level: FlashLevel, message: &str) -> String {
    let flash = Flash {
        level,
        message: message.to_string(),
    };
    format!("{FLASH_COOKIE}={}; Path=/", encode(&flash))
}

fn encode(flash: &Flash) -> String {
    URL_SAFE_NO_PAD.encode(serde_json::to_vec(flash).unwrap_or_default())
}

fn decode(value: &str) -> Option<Flash> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let flash = Flash {
            level: FlashLevel::Warning,
            message: "Please login first".to_string(),
        };
        assert_eq!(decode(&encode(&flash)), Some(flash));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode("not-base64!!"), None);
        assert_eq!(decode(&URL_SAFE_NO_PAD.encode(b"not json")), None);
    }

    #[test]
    fn test_push_then_take() {
        let jar = push(CookieJar::default(), FlashLevel::Success, "Job posted successfully!");
        let (_, pending) = take(jar);
        let pending = pending.unwrap();
        assert_eq!(pending.level, FlashLevel::Success);
        assert_eq!(pending.message, "Job posted successfully!");
    }

    #[test]
    fn test_take_clears_the_cookie() {
        let jar = push(CookieJar::default(), FlashLevel::Info, "Logged out successfully");
        let (jar, _) = take(jar);
        let (_, again) = take(jar);
        assert_eq!(again, None);
    }

    #[test]
    fn test_set_cookie_value_is_header_safe() {
        let value = set_cookie_value(FlashLevel::Danger, "Invalid file type. Only PDF, DOC, DOCX allowed");
        assert!(value.starts_with("flash="));
        assert!(value.chars().all(|c| c.is_ascii_graphic() || c == ' '));
        assert!(!value.trim_start_matches("flash=").contains(' '));
    }
}
