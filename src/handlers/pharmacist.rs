use askama::Template;
use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_cookies::Cookies;

use super::{report_or_banner, require_role};
use crate::{
    aggregate::{self, PayStatus, StatusTotals},
    api::{ApiClient, ReportKind, ReportQuery},
    commands::{
        NewInsurancePaymentForm, NewInsuranceRecordForm, NewMedicineForm, UpdateStockForm,
    },
    filters::format_amount,
    models::{
        InsurancePayment, InsurancePaymentRow, InsuranceRecord, InsuranceRecordRow, Medicine,
        MedicineRow,
    },
    session::{Role, Session},
};

#[derive(Template)]
#[template(path = "pharmacist.html")]
struct PharmacistTemplate {
    username: String,
    search: String,
    medicines: Vec<MedicineRow>,
    medicines_error: String,
    records: Vec<InsuranceRecordRow>,
    records_error: String,
    payments: Vec<InsurancePaymentRow>,
    payments_error: String,
    status_rows: Vec<StatusRow>,
    totals_error: String,
    medicine_form: NewMedicineForm,
    medicine_error: String,
    stock_form: UpdateStockForm,
    stock_error: String,
    record_form: NewInsuranceRecordForm,
    record_error: String,
    payment_form: NewInsurancePaymentForm,
    payment_error: String,
}

struct StatusRow {
    status: String,
    count: u32,
    amount: String,
}

fn status_rows(totals: &StatusTotals) -> Vec<StatusRow> {
    PayStatus::ALL
        .iter()
        .map(|status| {
            let bucket = totals.bucket(*status);
            StatusRow {
                status: status.as_str().to_string(),
                count: bucket.count,
                amount: format_amount(bucket.amount),
            }
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct PharmacistParams {
    #[serde(default)]
    q: String,
}

#[derive(Default)]
struct PharmacistForms {
    medicine: NewMedicineForm,
    medicine_error: String,
    stock: UpdateStockForm,
    stock_error: String,
    record: NewInsuranceRecordForm,
    record_error: String,
    payment: NewInsurancePaymentForm,
    payment_error: String,
}

pub async fn dashboard(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Query(params): Query<PharmacistParams>,
) -> Response {
    let session = match require_role(&cookies, Role::Pharmacist) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    render(&client, &session, &params, PharmacistForms::default())
        .await
        .into_response()
}

pub async fn create_medicine(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<NewMedicineForm>,
) -> Response {
    let session = match require_role(&cookies, Role::Pharmacist) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let error = match form.validate() {
        Ok(command) => match client.submit(command, &session.token).await {
            Ok(()) => return Redirect::to("/pharmacist").into_response(),
            Err(error) => error.to_string(),
        },
        Err(error) => error.to_string(),
    };
    let forms = PharmacistForms {
        medicine: form,
        medicine_error: error,
        ..PharmacistForms::default()
    };
    render(&client, &session, &PharmacistParams::default(), forms)
        .await
        .into_response()
}

pub async fn update_stock(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<UpdateStockForm>,
) -> Response {
    let session = match require_role(&cookies, Role::Pharmacist) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let error = match form.validate() {
        Ok(command) => match client.submit(command, &session.token).await {
            Ok(()) => return Redirect::to("/pharmacist").into_response(),
            Err(error) => error.to_string(),
        },
        Err(error) => error.to_string(),
    };
    let forms = PharmacistForms {
        stock: form,
        stock_error: error,
        ..PharmacistForms::default()
    };
    render(&client, &session, &PharmacistParams::default(), forms)
        .await
        .into_response()
}

pub async fn create_insurance_record(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<NewInsuranceRecordForm>,
) -> Response {
    let session = match require_role(&cookies, Role::Pharmacist) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let error = match form.validate() {
        Ok(command) => match client.submit(command, &session.token).await {
            Ok(()) => return Redirect::to("/pharmacist").into_response(),
            Err(error) => error.to_string(),
        },
        Err(error) => error.to_string(),
    };
    let forms = PharmacistForms {
        record: form,
        record_error: error,
        ..PharmacistForms::default()
    };
    render(&client, &session, &PharmacistParams::default(), forms)
        .await
        .into_response()
}

pub async fn create_insurance_payment(
    State(client): State<ApiClient>,
    cookies: Cookies,
    Form(form): Form<NewInsurancePaymentForm>,
) -> Response {
    let session = match require_role(&cookies, Role::Pharmacist) {
        Ok(session) => session,
        Err(redirect) => return redirect.into_response(),
    };
    let error = match form.validate() {
        Ok(command) => match client.submit(command, &session.token).await {
            Ok(()) => return Redirect::to("/pharmacist").into_response(),
            Err(error) => error.to_string(),
        },
        Err(error) => error.to_string(),
    };
    let forms = PharmacistForms {
        payment: form,
        payment_error: error,
        ..PharmacistForms::default()
    };
    render(&client, &session, &PharmacistParams::default(), forms)
        .await
        .into_response()
}

async fn render(
    client: &ApiClient,
    session: &Session,
    params: &PharmacistParams,
    forms: PharmacistForms,
) -> Html<String> {
    let (medicines, medicines_error) = report_or_banner(
        client
            .fetch_report::<Vec<Medicine>>(&ReportQuery::new(ReportKind::Medicines), &session.token)
            .await,
    );
    let (records, records_error) = report_or_banner(
        client
            .fetch_report::<Vec<InsuranceRecord>>(
                &ReportQuery::new(ReportKind::InsuranceRecords),
                &session.token,
            )
            .await,
    );
    let (payments, payments_error) = report_or_banner(
        client
            .fetch_report::<Vec<InsurancePayment>>(
                &ReportQuery::new(ReportKind::InsurancePayments),
                &session.token,
            )
            .await,
    );

    // A status outside the closed set fails the totals strip loudly; the raw
    // payments table still renders underneath.
    let (status_totals, totals_error) = match aggregate::status_totals(&payments) {
        Ok(totals) => (totals, String::new()),
        Err(error) => (StatusTotals::default(), error.to_string()),
    };

    let medicines = aggregate::filter_records(medicines, &params.q);

    let template = PharmacistTemplate {
        username: session.username.clone(),
        search: params.q.clone(),
        medicines: medicines.iter().map(MedicineRow::from).collect(),
        medicines_error,
        records: records.iter().map(InsuranceRecordRow::from).collect(),
        records_error,
        payments: payments.iter().map(InsurancePaymentRow::from).collect(),
        payments_error,
        status_rows: status_rows(&status_totals),
        totals_error,
        medicine_form: forms.medicine,
        medicine_error: forms.medicine_error,
        stock_form: forms.stock,
        stock_error: forms.stock_error,
        record_form: forms.record,
        record_error: forms.record_error,
        payment_form: forms.payment,
        payment_error: forms.payment_error,
    };
    Html(template.render().unwrap())
}
