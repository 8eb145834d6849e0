use askama::Template;
use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_cookies::Cookies;

use super::{report_or_banner, require_role};
use crate::{
    aggregate::{self, Direction, SortSpec},
    api::{ApiClient, ReportKind, ReportQuery},
    commands::NewPurchaseForm,
    filters::format_amount,
    models::{Purchase, PurchaseRow, PurchaseStatus},
    session::{Role, Session},
};

const SORT_COLUMNS: [&str; 4] = ["date", "supplier", "amount", "status"];

#[derive(Template)]
#[template(path = "stock_keeper.html")]
struct StockKeeperTemplate {
    username: String,
    search: String,
    purchases: Vec<PurchaseRow>,
    purchases_error: String,
    total_purchases: String,
    outstanding_credits: String,
    supplier_count: usize,
    by_date: Vec<Bar>,
    by_supplier: Vec<Bar>,
    headers: Vec<SortHeader>,
    purchase_form: NewPurchaseForm,
    purchase_error: String,
}

struct Bar {
    label: String,
    amount: String,
    width: u32,
}

struct SortHeader {
    label: String,
    href: String,
    marker: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockKeeperParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    sort: String,
    #[serde(default)]
    dir: String,
}

impl StockKeeperParams {
    fn sort_spec(&self) -> Option<SortSpec> {
        if SORT_COLUMNS.contains(&self.sort.as_str()) {
            Some(SortSpec {
                key: self.sort.clone(),
                direction: Direction::parse(&self.dir),
            })
        } else {
            None
        }
    }
}

pub async fn dashboard(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Query(params): Query<StockKeeperParams>,
) -> Response {
    let session = match require_role(&cookies, Role::StockKeeper) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    render(&client, &session, &params, NewPurchaseForm::default(), String::new())
        .await
        .into_response()
}

pub async fn create_purchase(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<NewPurchaseForm>,
) -> Response {
    let session = match require_role(&cookies, Role::StockKeeper) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let error = match form.validate() {
        Ok(command) => match client.submit(command, &session.token).await {
            Ok(()) => return Redirect::to("/stock-keeper").into_response(),
            Err(error) => error.to_string(),
        },
        Err(error) => error.to_string(),
    };
    render(&client, &session, &StockKeeperParams::default(), form, error)
        .await
        .into_response()
}

async fn render(
    client: &ApiClient,
    session: &Session,
    params: &StockKeeperParams,
    purchase_form: NewPurchaseForm,
    purchase_error: String,
) -> Html<String> {
    let (purchases, purchases_error) = report_or_banner(
        client
            .fetch_report::<Vec<Purchase>>(&ReportQuery::new(ReportKind::Purchases), &session.token)
            .await,
    );

    // Stat cards and chart series come from the full record set; the search
    // box only narrows the table.
    let total_purchases: f64 = purchases.iter().map(|p| p.total_amount).sum();
    let outstanding_credits: f64 = purchases
        .iter()
        .filter(|p| p.status == PurchaseStatus::Credit)
        .map(|p| p.total_amount)
        .sum();

    let by_date = aggregate::group_sum(
        &purchases,
        |p| p.purchase_date.map(|d| d.date_naive().to_string()),
        |p| p.total_amount,
    );
    let by_supplier = aggregate::group_sum(
        &purchases,
        |p| (!p.supplier.is_empty()).then(|| p.supplier.clone()),
        |p| p.total_amount,
    );
    let supplier_count = by_supplier.len();

    let mut table = aggregate::filter_records(purchases, &params.q);
    let sort_spec = params.sort_spec();
    if let Some(spec) = &sort_spec {
        aggregate::sort_records(&mut table, spec);
    }

    let template = StockKeeperTemplate {
        username: session.username.clone(),
        search: params.q.clone(),
        purchases: table.iter().map(PurchaseRow::from).collect(),
        purchases_error,
        total_purchases: format_amount(total_purchases),
        outstanding_credits: format_amount(outstanding_credits),
        supplier_count,
        by_date: bars(by_date),
        by_supplier: bars(by_supplier),
        headers: sort_headers(&params.q, sort_spec.as_ref()),
        purchase_form,
        purchase_error,
    };
    Html(template.render().unwrap())
}

fn bars(groups: std::collections::BTreeMap<String, f64>) -> Vec<Bar> {
    let max = groups.values().cloned().fold(0.0_f64, f64::max);
    groups
        .into_iter()
        .map(|(label, amount)| {
            let width = if max > 0.0 {
                ((amount / max * 100.0).round() as u32).max(2)
            } else {
                0
            };
            Bar {
                label,
                amount: format_amount(amount),
                width,
            }
        })
        .collect()
}

// Column headers link to the toggled sort for their key, keeping the current
// search term in the query string.
fn sort_headers(search: &str, current: Option<&SortSpec>) -> Vec<SortHeader> {
    let labels = [
        ("date", "Purchase Date"),
        ("supplier", "Supplier"),
        ("amount", "Total Amount"),
        ("status", "Status"),
    ];
    labels
        .iter()
        .map(|(key, label)| {
            let next = SortSpec::toggle(current, key);
            let marker = match current {
                Some(spec) if spec.key == *key => match spec.direction {
                    Direction::Asc => " ▲".to_string(),
                    Direction::Desc => " ▼".to_string(),
                },
                _ => String::new(),
            };
            SortHeader {
                label: label.to_string(),
                href: format!(
                    "/stock-keeper?q={}&sort={}&dir={}",
                    urlencoding::encode(search),
                    next.key,
                    next.direction.as_str()
                ),
                marker,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_spec_rejects_unknown_columns() {
        let params = StockKeeperParams {
            sort: "notes".into(),
            ..StockKeeperParams::default()
        };
        assert!(params.sort_spec().is_none());

        let params = StockKeeperParams {
            sort: "supplier".into(),
            dir: "desc".into(),
            ..StockKeeperParams::default()
        };
        let spec = params.sort_spec().unwrap();
        assert_eq!(spec.direction, Direction::Desc);
    }

    #[test]
    fn header_links_toggle_the_active_column() {
        let current = SortSpec {
            key: "supplier".into(),
            direction: Direction::Asc,
        };
        let headers = sort_headers("kigali", Some(&current));
        let supplier = &headers[1];
        assert!(supplier.href.contains("sort=supplier&dir=desc"));
        assert!(supplier.href.contains("q=kigali"));
        // A different column starts over ascending.
        assert!(headers[2].href.contains("sort=amount&dir=asc"));
    }

    #[test]
    fn bars_scale_to_the_largest_group() {
        let mut groups = std::collections::BTreeMap::new();
        groups.insert("A".to_string(), 200.0);
        groups.insert("B".to_string(), 50.0);
        let bars = bars(groups);
        assert_eq!(bars[0].width, 100);
        assert_eq!(bars[1].width, 25);
    }
}
