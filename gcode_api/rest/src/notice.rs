use axum_extra::extract::cookie::Cookie;
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine};
use gcode_models::notice::Notice;

pub const NOTICE_COOKIE: &str = "gcode_notice";

/// Serializes the notice into a read once cookie. The first request that
/// consumes the cookie clears it again, so the client shows the message at
/// most one time, even across reloads.
pub fn notice_cookie(notice: &Notice) -> anyhow::Result<Cookie<'static>> {
    let value = STANDARD_NO_PAD.encode(serde_json::to_vec(notice)?);

    Ok(Cookie::build((NOTICE_COOKIE, value))
        .path("/")
        .http_only(true)
        .build())
}

pub fn decode_notice(value: &str) -> Option<Notice> {
    let bytes = STANDARD_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(NOTICE_COOKIE).path("/").build()
}
