use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Form, Json, Router,
};
use axum_extra::extract::CookieJar;
use gcode_core_contact_contracts::{ContactFeatureService, ContactSubmitError};

use super::{error, internal_server_error};
use crate::{
    models::contact::{ApiAcceptedSubmission, ApiContactRequest, ApiRejectedSubmission},
    notice,
};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/contact", routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactFeatureService>>,
    jar: CookieJar,
    Form(request): Form<ApiContactRequest>,
) -> Response {
    match service.submit(request.into()).await {
        Ok(accepted) => {
            let cookie = match notice::notice_cookie(&accepted.notice) {
                Ok(cookie) => cookie,
                Err(err) => return internal_server_error(err),
            };
            (jar.add(cookie), Json(ApiAcceptedSubmission::from(accepted))).into_response()
        }
        // The form rerenders itself with the received values, so a rejected
        // submission is not an error status.
        Err(ContactSubmitError::Rejected(rejected)) => {
            Json(ApiRejectedSubmission::from(rejected)).into_response()
        }
        Err(ContactSubmitError::Delivery) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, "Could not send message")
        }
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}
