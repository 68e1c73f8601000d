//! Form page handlers

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Response},
    http::StatusCode,
    Form,
};

use crate::AppState;
use crate::models::ScenarioRecord;
use crate::views::{render_page, Outcome};

/// Empty form with default values
pub async fn index() -> Html<String> {
    Html(render_page(&ScenarioRecord::default(), Outcome::None))
}

/// Score a submitted form and render the result below it
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<ScenarioRecord>, FormRejection>,
) -> Response {
    let record = match form {
        Ok(Form(record)) => record,
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::info!("Form rejected: {}", message);
            let page = render_page(&ScenarioRecord::default(), Outcome::Rejected(&message));
            return (StatusCode::BAD_REQUEST, Html(page)).into_response();
        }
    };

    match state.inference.predict(&record) {
        Ok(prediction) => Html(render_page(
            &record,
            Outcome::Scored { score: prediction.score, record: &record },
        ))
        .into_response(),
        Err(err) => {
            tracing::info!("Submission failed: {}", err);
            let page = render_page(&record, Outcome::Rejected(err.public_message()));
            (err.status(), Html(page)).into_response()
        }
    }
}
