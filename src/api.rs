//! HTTP client for the remote pharmacy POS API. Reads are parameterized
//! report fetches, writes are validated form commands; both replay the bearer
//! token from the session and neither retries nor caches anything.

use bytes::Bytes;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::commands::ValidCommand;
use crate::models::LoginOutcome;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("authentication required")]
    MissingToken,
    #[error("report request failed (HTTP {status})")]
    Http { status: StatusCode },
    #[error("could not reach the pharmacy API")]
    Network(#[source] reqwest::Error),
    #[error("unexpected response from the pharmacy API")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("authentication required")]
    MissingToken,
    /// Server-side rejection; the message is the server's own, verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("could not reach the pharmacy API")]
    Network(#[source] reqwest::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    #[default]
    Month,
}

impl Period {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// Every report endpoint the four dashboards read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    EarningsVsExpenses,
    InsuranceStatus,
    PurchaseExpenses,
    Sales,
    Earnings,
    Expenses,
    NetProfit,
    Medicines,
    InsuranceRecords,
    InsurancePayments,
    Purchases,
}

impl ReportKind {
    pub fn path(self) -> &'static str {
        match self {
            Self::EarningsVsExpenses => "/admin-report/earnings-vs-expenses",
            Self::InsuranceStatus => "/admin-report/insurance-status",
            Self::PurchaseExpenses => "/admin-report/purchase-expenses",
            Self::Sales => "/cashier/get-sales",
            Self::Earnings => "/cashier/earnings",
            Self::Expenses => "/cashier/expenses",
            Self::NetProfit => "/cashier/net-profit",
            Self::Medicines => "/pharmacist/all-medicine",
            Self::InsuranceRecords => "/pharmacist/insurance-records",
            Self::InsurancePayments => "/pharmacist/insurance-payments",
            Self::Purchases => "/stock-keeper/purchases",
        }
    }
}

/// A read request, immutable once built.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub kind: ReportKind,
    pub period: Option<Period>,
    pub date: Option<NaiveDate>,
}

impl ReportQuery {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            period: None,
            date: None,
        }
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn on_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(period) = self.period {
            pairs.push(("period", period.as_str().to_string()));
        }
        if let Some(date) = self.date {
            pairs.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// One fresh request per call: no retries, no caching. An empty token is
    /// a caller error, not something to send anyway.
    pub async fn fetch_report<T: DeserializeOwned>(
        &self,
        query: &ReportQuery,
        token: &str,
    ) -> Result<T, FetchError> {
        if token.is_empty() {
            return Err(FetchError::MissingToken);
        }
        let url = format!("{}{}", self.base_url, query.kind.path());
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(FetchError::Network)?;
        if !response.status().is_success() {
            log::warn!("report {} failed with {}", query.kind.path(), response.status());
            return Err(FetchError::Http {
                status: response.status(),
            });
        }
        response.json::<T>().await.map_err(FetchError::Decode)
    }

    /// Sends a validated form command. On rejection the server's message is
    /// surfaced verbatim; refreshing derived views afterwards is the caller's
    /// job.
    pub async fn submit(&self, command: ValidCommand, token: &str) -> Result<(), SubmitError> {
        if token.is_empty() {
            return Err(SubmitError::MissingToken);
        }
        let url = format!("{}{}", self.base_url, command.path);
        let response = self
            .http
            .request(command.method, &url)
            .bearer_auth(token)
            .json(&command.body)
            .send()
            .await
            .map_err(SubmitError::Network)?;
        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let message = rejection_message(response)
            .await
            .unwrap_or_else(|| format!("request failed (HTTP {})", status));
        Err(SubmitError::Rejected(message))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, SubmitError> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(SubmitError::Network)?;
        if !response.status().is_success() {
            let message = rejection_message(response)
                .await
                .unwrap_or_else(|| "Login failed".to_string());
            return Err(SubmitError::Rejected(message));
        }
        response
            .json::<LoginOutcome>()
            .await
            .map_err(|_| SubmitError::Rejected("Unexpected login response".to_string()))
    }

    /// Export is an opaque pass-through; the body is handed straight back to
    /// the browser as a download.
    pub async fn export(&self, format: &str, token: &str) -> Result<Bytes, FetchError> {
        if token.is_empty() {
            return Err(FetchError::MissingToken);
        }
        let url = format!("{}/admin-report/export", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("format", format)])
            .send()
            .await
            .map_err(FetchError::Network)?;
        if !response.status().is_success() {
            return Err(FetchError::Http {
                status: response.status(),
            });
        }
        response.bytes().await.map_err(FetchError::Decode)
    }
}

async fn rejection_message(response: reqwest::Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    body.get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_paths_carry_their_role_prefix() {
        assert_eq!(
            ReportKind::EarningsVsExpenses.path(),
            "/admin-report/earnings-vs-expenses"
        );
        assert_eq!(ReportKind::Sales.path(), "/cashier/get-sales");
        assert_eq!(ReportKind::Medicines.path(), "/pharmacist/all-medicine");
        assert_eq!(ReportKind::Purchases.path(), "/stock-keeper/purchases");
    }

    #[test]
    fn query_pairs_reflect_period_and_date() {
        let query = ReportQuery::new(ReportKind::EarningsVsExpenses).with_period(Period::Week);
        assert_eq!(query.query_pairs(), vec![("period", "week".to_string())]);

        let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        let query = ReportQuery::new(ReportKind::NetProfit).on_date(Some(date));
        assert_eq!(query.query_pairs(), vec![("date", "2025-05-05".to_string())]);

        assert!(ReportQuery::new(ReportKind::Sales).query_pairs().is_empty());
    }

    #[test]
    fn base_url_loses_its_trailing_slash() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn period_parse_is_closed() {
        assert_eq!(Period::parse("day"), Some(Period::Day));
        assert_eq!(Period::parse("year"), None);
        assert_eq!(Period::default(), Period::Month);
    }
}
