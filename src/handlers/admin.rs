use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_cookies::Cookies;

use super::{report_or_banner, require_role};
use crate::{
    aggregate,
    api::{ApiClient, Period, ReportKind, ReportQuery},
    commands::RegisterUserForm,
    filters::format_amount,
    models::{FinancialSummary, InsuranceStatusReport, PurchaseExpenses},
    session::{Role, Session},
};

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    username: String,
    period: String,
    total_earnings: String,
    total_expenses: String,
    net_profit: String,
    summary_error: String,
    earnings_width: u32,
    expenses_width: u32,
    insurance_entries: Vec<InsuranceEntry>,
    insurance_total: String,
    insurance_error: String,
    total_purchases: String,
    outstanding_credits: String,
    purchases_error: String,
    reg_form: RegisterUserForm,
    reg_error: String,
    reg_success: String,
}

struct InsuranceEntry {
    status: String,
    figure: String,
    width: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminParams {
    #[serde(default)]
    period: String,
}

pub async fn dashboard(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Query(params): Query<AdminParams>,
) -> Response {
    let session = match require_role(&cookies, Role::Admin) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    render(
        &client,
        &session,
        &params,
        RegisterUserForm::default(),
        String::new(),
        String::new(),
    )
    .await
    .into_response()
}

pub async fn register_user(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<RegisterUserForm>,
) -> Response {
    let session = match require_role(&cookies, Role::Admin) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let (form, error, success) = match form.validate() {
        Ok(command) => match client.submit(command, &session.token).await {
            // Clear the form on success, keep the input on rejection.
            Ok(()) => (
                RegisterUserForm::default(),
                String::new(),
                "User registered successfully!".to_string(),
            ),
            Err(submit_error) => (form, submit_error.to_string(), String::new()),
        },
        Err(command_error) => (form, command_error.to_string(), String::new()),
    };
    render(&client, &session, &AdminParams::default(), form, error, success)
        .await
        .into_response()
}

/// CSV/PDF export pass-through: the remote body goes straight back out as an
/// attachment under a fixed filename.
pub async fn export(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Path(format): Path<String>,
) -> Response {
    let session = match require_role(&cookies, Role::Admin) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let content_type = match format.as_str() {
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    match client.export(&format, &session.token).await {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"report.{}\"", format),
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => (StatusCode::BAD_GATEWAY, error.to_string()).into_response(),
    }
}

async fn render(
    client: &ApiClient,
    session: &Session,
    params: &AdminParams,
    reg_form: RegisterUserForm,
    reg_error: String,
    reg_success: String,
) -> Html<String> {
    let period = Period::parse(&params.period).unwrap_or_default();

    let (summary, summary_error) = report_or_banner(
        client
            .fetch_report::<FinancialSummary>(
                &ReportQuery::new(ReportKind::EarningsVsExpenses).with_period(period),
                &session.token,
            )
            .await,
    );
    let (insurance, insurance_error) = report_or_banner(
        client
            .fetch_report::<InsuranceStatusReport>(
                &ReportQuery::new(ReportKind::InsuranceStatus),
                &session.token,
            )
            .await,
    );
    let (purchases, purchases_error) = report_or_banner(
        client
            .fetch_report::<PurchaseExpenses>(
                &ReportQuery::new(ReportKind::PurchaseExpenses),
                &session.token,
            )
            .await,
    );

    let net_profit = aggregate::derive_net_profit(&summary);
    let (earnings_width, expenses_width) = bar_widths(summary.earnings, summary.expenses);

    let entries = insurance.entries();
    let max_figure = entries.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let insurance_entries = entries
        .into_iter()
        .map(|(status, figure)| InsuranceEntry {
            status,
            figure: format_amount(figure),
            width: scaled_width(figure, max_figure),
        })
        .collect();

    let template = AdminTemplate {
        username: session.username.clone(),
        period: period.as_str().to_string(),
        total_earnings: format_amount(summary.earnings),
        total_expenses: format_amount(summary.expenses),
        net_profit: format_amount(net_profit),
        summary_error,
        earnings_width,
        expenses_width,
        insurance_entries,
        insurance_total: format_amount(insurance.total()),
        insurance_error,
        total_purchases: format_amount(purchases.total_purchases),
        outstanding_credits: format_amount(purchases.outstanding_credits),
        purchases_error,
        reg_form,
        reg_error,
        reg_success,
    };
    Html(template.render().unwrap())
}

fn bar_widths(earnings: f64, expenses: f64) -> (u32, u32) {
    let max = earnings.max(expenses);
    (scaled_width(earnings, max), scaled_width(expenses, max))
}

fn scaled_width(value: f64, max: f64) -> u32 {
    if max > 0.0 && value >= 0.0 {
        ((value / max * 100.0).round() as u32).min(100)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_widths_scale_against_the_larger_side() {
        assert_eq!(bar_widths(200.0, 50.0), (100, 25));
        assert_eq!(bar_widths(0.0, 0.0), (0, 0));
    }

    #[test]
    fn scaled_width_is_clamped() {
        assert_eq!(scaled_width(500.0, 500.0), 100);
        assert_eq!(scaled_width(-10.0, 500.0), 0);
    }
}
