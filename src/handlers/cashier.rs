use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;
use tower_cookies::Cookies;

use super::{date_param, report_or_banner, require_role};
use crate::{
    api::{ApiClient, ReportKind, ReportQuery},
    commands::{NewEarningForm, NewExpenseForm, NewSaleForm, SaleItemInput},
    filters,
    models::{Earning, EarningRow, Expense, ExpenseRow, NetProfitReport, Sale, SaleRow},
    session::{Role, Session},
};

#[derive(Template)]
#[template(path = "cashier.html")]
struct CashierTemplate {
    username: String,
    date_filter: String,
    sales: Vec<SaleRow>,
    sales_error: String,
    earnings: Vec<EarningRow>,
    earnings_error: String,
    expenses: Vec<ExpenseRow>,
    expenses_error: String,
    profit_date: String,
    net_profit: String,
    profit_error: String,
    sale_items: Vec<SaleItemInput>,
    sale_payment_method: String,
    sale_date: String,
    sale_error: String,
    earning_form: NewEarningForm,
    earning_error: String,
    expense_form: NewExpenseForm,
    expense_error: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CashierParams {
    #[serde(default)]
    date: String,
    #[serde(default)]
    profit_date: String,
}

#[derive(Default)]
struct CashierForms {
    sale: NewSaleForm,
    sale_error: String,
    earning: NewEarningForm,
    earning_error: String,
    expense: NewExpenseForm,
    expense_error: String,
}

pub async fn dashboard(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Query(params): Query<CashierParams>,
) -> Response {
    let session = match require_role(&cookies, Role::Cashier) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    render(&client, &session, &params, CashierForms::default())
        .await
        .into_response()
}

pub async fn create_sale(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<NewSaleForm>,
) -> Response {
    let session = match require_role(&cookies, Role::Cashier) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let error = match form.validate() {
        Ok(command) => match client.submit(command, &session.token).await {
            Ok(()) => return Redirect::to("/cashier").into_response(),
            Err(error) => error.to_string(),
        },
        Err(error) => error.to_string(),
    };
    let forms = CashierForms {
        sale: form,
        sale_error: error,
        ..CashierForms::default()
    };
    render(&client, &session, &CashierParams::default(), forms)
        .await
        .into_response()
}

pub async fn create_earning(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<NewEarningForm>,
) -> Response {
    let session = match require_role(&cookies, Role::Cashier) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let error = match form.validate() {
        Ok(command) => match client.submit(command, &session.token).await {
            Ok(()) => return Redirect::to("/cashier").into_response(),
            Err(error) => error.to_string(),
        },
        Err(error) => error.to_string(),
    };
    let forms = CashierForms {
        earning: form,
        earning_error: error,
        ..CashierForms::default()
    };
    render(&client, &session, &CashierParams::default(), forms)
        .await
        .into_response()
}

pub async fn create_expense(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<NewExpenseForm>,
) -> Response {
    let session = match require_role(&cookies, Role::Cashier) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let error = match form.validate() {
        Ok(command) => match client.submit(command, &session.token).await {
            Ok(()) => return Redirect::to("/cashier").into_response(),
            Err(error) => error.to_string(),
        },
        Err(error) => error.to_string(),
    };
    let forms = CashierForms {
        expense: form,
        expense_error: error,
        ..CashierForms::default()
    };
    render(&client, &session, &CashierParams::default(), forms)
        .await
        .into_response()
}

// Each report is fetched on its own so one failure only banners its card.
async fn render(
    client: &ApiClient,
    session: &Session,
    params: &CashierParams,
    forms: CashierForms,
) -> Html<String> {
    let date = date_param(&params.date);

    let (sales, sales_error) = report_or_banner(
        client
            .fetch_report::<Vec<Sale>>(&ReportQuery::new(ReportKind::Sales), &session.token)
            .await,
    );
    let (earnings, earnings_error) = report_or_banner(
        client
            .fetch_report::<Vec<Earning>>(
                &ReportQuery::new(ReportKind::Earnings).on_date(date),
                &session.token,
            )
            .await,
    );
    let (expenses, expenses_error) = report_or_banner(
        client
            .fetch_report::<Vec<Expense>>(
                &ReportQuery::new(ReportKind::Expenses).on_date(date),
                &session.token,
            )
            .await,
    );

    // The net profit card only fires once a date has been picked.
    let (net_profit, profit_error) = match date_param(&params.profit_date) {
        None => (String::new(), String::new()),
        Some(profit_date) => {
            let result = client
                .fetch_report::<serde_json::Value>(
                    &ReportQuery::new(ReportKind::NetProfit).on_date(Some(profit_date)),
                    &session.token,
                )
                .await;
            match result {
                Ok(value) => (
                    filters::format_amount(NetProfitReport(value).value()),
                    String::new(),
                ),
                Err(error) => (String::new(), error.to_string()),
            }
        }
    };

    let template = CashierTemplate {
        username: session.username.clone(),
        date_filter: params.date.clone(),
        sales: sales.iter().map(SaleRow::from).collect(),
        sales_error,
        earnings: earnings.iter().map(EarningRow::from).collect(),
        earnings_error,
        expenses: expenses.iter().map(ExpenseRow::from).collect(),
        expenses_error,
        profit_date: params.profit_date.clone(),
        net_profit,
        profit_error,
        sale_items: forms.sale.rows(),
        sale_payment_method: forms.sale.payment_method.clone(),
        sale_date: forms.sale.date.clone(),
        sale_error: forms.sale_error,
        earning_form: forms.earning,
        earning_error: forms.earning_error,
        expense_form: forms.expense,
        expense_error: forms.expense_error,
    };
    Html(template.render().unwrap())
}
