use axum::{response::Html, routing::get, Form, Router};
use axum_extra::extract::CookieJar;
use tracing::{debug, info, instrument};

use crate::{
    auth::session::CurrentUser,
    error::FormError,
    flash,
    predict::{
        calculator::{predict, PredictionInput},
        dto::PredictForm,
    },
    state::AppState,
    views,
};

/// Routes that must sit behind the auth gate.
pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/predict", get(predict_form).post(run_prediction))
}

#[instrument(skip(jar))]
pub async fn predict_form(
    CurrentUser(username): CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Html<String>) {
    let (jar, notice) = flash::take(jar);
    (jar, Html(views::predict_page(&username, notice.as_ref(), None)))
}

#[instrument(skip(jar, form))]
pub async fn run_prediction(
    CurrentUser(username): CurrentUser,
    jar: CookieJar,
    Form(form): Form<PredictForm>,
) -> Result<(CookieJar, Html<String>), FormError> {
    let input = PredictionInput::parse(&form.date, &form.time, &form.num_houses).map_err(|e| {
        debug!(error = %e, "prediction input rejected");
        e.back_to("/predict")
    })?;

    let prediction = predict(input);
    info!(houses = prediction.houses, kwh = prediction.kwh, "prediction computed");

    let (jar, notice) = flash::take(jar);
    Ok((
        jar,
        Html(views::predict_page(&username, notice.as_ref(), Some(&prediction))),
    ))
}
