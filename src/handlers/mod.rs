pub mod admin;
pub mod auth;
pub mod cashier;
pub mod pharmacist;
pub mod stock_keeper;

use axum::response::Redirect;
use chrono::NaiveDate;
use tower_cookies::Cookies;

use crate::api::FetchError;
use crate::session::{self, Role, Session};

/// Landing route: send the user to whichever dashboard their role owns.
pub async fn dashboard(cookies: Cookies) -> Redirect {
    match session::current(&cookies) {
        Some(session) => Redirect::to(session.role.dashboard_path()),
        None => Redirect::to("/login"),
    }
}

/// Role gate shared by the dashboards: no session goes back to login, the
/// wrong role goes to its own dashboard.
pub(crate) fn require_role(cookies: &Cookies, role: Role) -> Result<Session, Redirect> {
    match session::current(cookies) {
        None => Err(Redirect::to("/login")),
        Some(session) if session.role == role => Ok(session),
        Some(session) => Err(Redirect::to(session.role.dashboard_path())),
    }
}

/// Splits a report result into data for the card and an inline banner
/// message, so one failed fetch never blanks the sibling cards.
pub(crate) fn report_or_banner<T: Default>(result: Result<T, FetchError>) -> (T, String) {
    match result {
        Ok(data) => (data, String::new()),
        Err(error) => {
            log::warn!("report fetch failed: {}", error);
            (T::default(), error.to_string())
        }
    }
}

/// Date query parameters are optional and quietly ignored when unparseable.
pub(crate) fn date_param(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
