//! Server-rendered HTML pages.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::{flash::Flash, predict::calculator::Prediction};

/// 302 Found to `path`.
pub fn found(path: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, path.to_owned())]).into_response()
}

fn layout(title: &str, user: Option<&str>, flash: Option<&Flash>, body: &str) -> String {
    let nav = match user {
        Some(_) => r#"<a href="/dashboard">Dashboard</a> | <a href="/predict">Predict</a> | <a href="/logout">Logout</a>"#,
        None => r#"<a href="/login">Login</a> | <a href="/register">Register</a>"#,
    };
    let notice = flash
        .map(|f| {
            format!(
                r#"<div class="alert alert-{}">{}</div>"#,
                f.category.as_str(),
                text(&f.message)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<nav>{nav}</nav>
{notice}
<main>
{body}
</main>
</body>
</html>"#,
        title = text(title),
    )
}

fn credentials_form(action: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
  <label>Username <input type="text" name="username" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">{submit}</button>
</form>"#,
        action = attr(action),
        submit = text(submit),
    )
}

pub fn login_page(flash: Option<&Flash>) -> String {
    let body = format!(
        "<h1>Login</h1>\n{}\n<p>No account? <a href=\"/register\">Register</a></p>",
        credentials_form("/login", "Login")
    );
    layout("Login", None, flash, &body)
}

pub fn register_page(flash: Option<&Flash>) -> String {
    let body = format!(
        "<h1>Register</h1>\n{}\n<p>Already registered? <a href=\"/login\">Login</a></p>",
        credentials_form("/register", "Register")
    );
    layout("Register", None, flash, &body)
}

pub fn dashboard_page(username: &str, flash: Option<&Flash>) -> String {
    let body = format!(
        "<h1>Welcome, {}!</h1>\n<p><a href=\"/predict\">Make an energy consumption prediction</a></p>",
        text(username)
    );
    layout("Dashboard", Some(username), flash, &body)
}

pub fn predict_page(username: &str, flash: Option<&Flash>, prediction: Option<&Prediction>) -> String {
    let result = prediction
        .map(|p| {
            format!(
                r#"<section class="result">
  <h2>Prediction Result</h2>
  <p>Date: {}</p>
  <p>Houses: {}</p>
  <p>Estimated consumption: {:.2} kWh</p>
</section>"#,
                text(&p.formatted_timestamp),
                p.houses,
                p.kwh
            )
        })
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Energy Consumption Prediction</h1>
<form method="post" action="/predict">
  <label>Date <input type="date" name="date" required></label>
  <label>Time <input type="time" name="time" required></label>
  <label>Number of houses <input type="number" name="num_houses" min="1" placeholder="5567"></label>
  <button type="submit">Predict</button>
</form>
{result}"#
    );
    layout("Predict", Some(username), flash, &body)
}

pub fn internal_error() -> String {
    layout(
        "Error",
        None,
        None,
        "<h1>Something went wrong</h1>\n<p>Please try again.</p>",
    )
}
