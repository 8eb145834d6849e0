//! Explicit session context: the bearer token, username, and role travel in
//! cookies with a single lifecycle (set at login, cleared at logout) and
//! every authenticated handler rebuilds a `Session` from them.

use tower_cookies::{Cookie, Cookies};

const TOKEN_COOKIE: &str = "auth_token";
const USERNAME_COOKIE: &str = "username";
const ROLE_COOKIE: &str = "role";
const SESSION_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Cashier,
    Pharmacist,
    StockKeeper,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Self::Admin),
            "cashier" => Some(Self::Cashier),
            "pharmacist" => Some(Self::Pharmacist),
            "stock-keeper" => Some(Self::StockKeeper),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Cashier => "cashier",
            Self::Pharmacist => "pharmacist",
            Self::StockKeeper => "stock-keeper",
        }
    }

    pub fn dashboard_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Cashier => "/cashier",
            Self::Pharmacist => "/pharmacist",
            Self::StockKeeper => "/stock-keeper",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
}

pub fn establish(cookies: &Cookies, token: &str, username: &str, role: Role) {
    cookies.add(session_cookie(TOKEN_COOKIE, token.to_string()));
    cookies.add(session_cookie(USERNAME_COOKIE, username.to_string()));
    cookies.add(session_cookie(ROLE_COOKIE, role.as_str().to_string()));
}

pub fn clear(cookies: &Cookies) {
    for name in [TOKEN_COOKIE, USERNAME_COOKIE, ROLE_COOKIE] {
        let mut cookie = Cookie::from(name);
        cookie.set_path("/");
        cookies.remove(cookie);
    }
}

/// Rebuilds the session from cookies. Any missing or unusable piece means no
/// session, which the handlers turn into a redirect to the login page.
pub fn current(cookies: &Cookies) -> Option<Session> {
    let token = cookies.get(TOKEN_COOKIE)?.value().to_string();
    if token.is_empty() {
        return None;
    }
    let username = cookies.get(USERNAME_COOKIE)?.value().to_string();
    let role = Role::parse(cookies.get(ROLE_COOKIE)?.value())?;
    Some(Session {
        token,
        username,
        role,
    })
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::hours(SESSION_HOURS))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings_round_trip() {
        for role in [Role::Admin, Role::Cashier, Role::Pharmacist, Role::StockKeeper] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_role_does_not_parse() {
        assert_eq!(Role::parse("supervisor"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn dashboard_paths_match_roles() {
        assert_eq!(Role::Cashier.dashboard_path(), "/cashier");
        assert_eq!(Role::StockKeeper.dashboard_path(), "/stock-keeper");
    }
}
