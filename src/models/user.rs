use serde::Deserialize;

/// Successful `POST /auth/login` response. The token key is snake_case on
/// the wire, unlike the camelCase report payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginOutcome {
    pub access_token: String,
    pub user: ApiUser,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: String,
}
