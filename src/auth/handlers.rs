use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::CookieJar;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{
        dto::CredentialsForm,
        session::{end_session, CurrentUser, SessionKeys},
    },
    error::{AppError, FormError},
    flash::{self, Flash},
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

/// Routes that must sit behind the auth gate.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

pub async fn index(State(keys): State<SessionKeys>, jar: CookieJar) -> Response {
    match keys.current_user(&jar) {
        Some(_) => views::found("/dashboard"),
        None => views::found("/login"),
    }
}

pub async fn register_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = flash::take(jar);
    (jar, Html(views::register_page(notice.as_ref())))
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, FormError> {
    if let Err(e) = state.store.register(&form.username, &form.password).await {
        debug!(error = %e, username = %form.username.trim(), "registration rejected");
        return Err(e.back_to("/register"));
    }

    info!(username = %form.username.trim(), "user registered");
    let jar = flash::push(
        CookieJar::new(),
        &Flash::success("Registration successful! Please log in."),
    );
    Ok((jar, views::found("/login")).into_response())
}

pub async fn login_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = flash::take(jar);
    (jar, Html(views::login_page(notice.as_ref())))
}

#[instrument(skip(state, keys, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    State(keys): State<SessionKeys>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, FormError> {
    let username = form.username.trim();
    let ok = state
        .store
        .verify(username, &form.password)
        .await
        .map_err(|e| e.back_to("/login"))?;

    if !ok {
        warn!(username, "login invalid credentials");
        return Err(AppError::InvalidCredentials.back_to("/login"));
    }

    let jar = keys
        .start_session(jar, username)
        .map_err(|e| AppError::from(e).back_to("/login"))?;
    let jar = flash::push(jar, &Flash::success("Logged in successfully."));

    info!(username, "user logged in");
    Ok((jar, views::found("/dashboard")).into_response())
}

pub async fn logout(jar: CookieJar) -> Response {
    let jar = flash::push(end_session(jar), &Flash::info("You have been logged out."));
    (jar, views::found("/login")).into_response()
}

#[instrument(skip(jar))]
pub async fn dashboard(CurrentUser(username): CurrentUser, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, notice) = flash::take(jar);
    (jar, Html(views::dashboard_page(&username, notice.as_ref())))
}
