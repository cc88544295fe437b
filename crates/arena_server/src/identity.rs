//! Identity resolution from the upgrade request.
//!
//! Login happens elsewhere; by the time a client opens the WebSocket it
//! already carries an `id` cookie naming its user. Anything missing or
//! unparseable makes the connection anonymous.

use crate::UserId;
use axum::http::{HeaderMap, header::COOKIE};
use tracing::{debug, instrument};

/// Cookie that carries the user id.
pub const ID_COOKIE: &str = "id";

/// Reads the user id from the request's `Cookie` headers.
#[instrument(skip(headers))]
pub fn user_id_from_headers(headers: &HeaderMap) -> Option<UserId> {
    let user_id = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ID_COOKIE)
        .and_then(|(_, value)| value.trim().parse().ok());

    debug!(?user_id, "Resolved connection identity");
    user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for cookie in cookies {
            map.append(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        map
    }

    #[test]
    fn test_reads_id_cookie() {
        assert_eq!(user_id_from_headers(&headers(&["id=42"])), Some(42));
    }

    #[test]
    fn test_finds_id_among_other_cookies() {
        assert_eq!(
            user_id_from_headers(&headers(&["theme=dark; id=7; lang=fr"])),
            Some(7)
        );
        assert_eq!(
            user_id_from_headers(&headers(&["theme=dark", "id=9"])),
            Some(9)
        );
    }

    #[test]
    fn test_missing_or_bad_id_is_anonymous() {
        assert_eq!(user_id_from_headers(&HeaderMap::new()), None);
        assert_eq!(user_id_from_headers(&headers(&["id=abc"])), None);
        assert_eq!(user_id_from_headers(&headers(&["userid=3"])), None);
    }
}
