use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use axum_extra::extract::CookieJar;

use crate::notice;

pub fn router() -> Router<()> {
    Router::new().route("/notice", routing::get(take_notice))
}

/// Hands the pending notice to the client and clears it, so it is displayed
/// at most once. Undecodable cookies are cleared as well.
async fn take_notice(jar: CookieJar) -> Response {
    let Some(cookie) = jar.get(notice::NOTICE_COOKIE) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let pending = notice::decode_notice(cookie.value());
    let jar = jar.remove(notice::removal_cookie());

    match pending {
        Some(pending) => (jar, Json(pending)).into_response(),
        None => (jar, StatusCode::NO_CONTENT).into_response(),
    }
}
