use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    api::ApiClient,
    session::{self, Role},
};

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: String,
    username: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn login_page() -> Html<String> {
    let template = LoginTemplate {
        error: String::new(),
        username: String::new(),
    };
    Html(template.render().unwrap())
}

pub async fn login(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    let username = form.username.trim().to_string();
    if username.is_empty() || form.password.is_empty() {
        return Err(login_error(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
            &username,
        ));
    }

    match client.login(&username, &form.password).await {
        Ok(outcome) => {
            let display_name = outcome.user.username.clone().unwrap_or(username);
            match Role::parse(&outcome.user.role) {
                Some(role) => {
                    session::establish(&cookies, &outcome.access_token, &display_name, role);
                    Ok(Redirect::to(role.dashboard_path()))
                }
                // A role this UI has no dashboard for falls back to the root route.
                None => {
                    log::warn!("login returned unknown role {:?}", outcome.user.role);
                    Ok(Redirect::to("/"))
                }
            }
        }
        Err(error) => Err(login_error(
            StatusCode::UNAUTHORIZED,
            &error.to_string(),
            &username,
        )),
    }
}

pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    session::clear(&cookies);
    Redirect::to("/login")
}

fn login_error(status: StatusCode, message: &str, username: &str) -> (StatusCode, Html<String>) {
    let template = LoginTemplate {
        error: message.to_string(),
        username: username.to_string(),
    };
    (status, Html(template.render().unwrap()))
}
