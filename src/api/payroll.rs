use actix_web::{HttpResponse, Responder, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::payroll::{NewPayroll, Payroll};
use crate::payroll::service::{self, PayrollRequest};
use crate::store::MySqlStores;

#[derive(Serialize, ToSchema)]
pub struct PayrollPreviewResponse {
    pub employee_id: u64,
    pub month: u32,
    pub year: i32,

    #[schema(example = "2200.00", value_type = String)]
    pub base_salary: Decimal,
    #[schema(example = "100.00", value_type = String)]
    pub bonuses: Decimal,
    #[schema(example = "50.00", value_type = String)]
    pub manual_deductions: Decimal,

    pub working_days: u32,
    pub present_days: u32,
    pub late_days: u32,
    pub absent_days: u32,

    #[schema(example = "100.0000", value_type = String)]
    pub per_diem_rate: Decimal,
    #[schema(example = "200.00", value_type = String)]
    pub absence_deduction: Decimal,
    #[schema(example = "250.00", value_type = String)]
    pub total_deductions: Decimal,
    #[schema(example = "2050.00", value_type = String)]
    pub net_pay: Decimal,
}

/// Compute a salary slip without persisting it. Backs the live
/// preview panel on the HR payroll form.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/preview",
    request_body = PayrollRequest,
    responses(
        (status = 200, body = PayrollPreviewResponse),
        (status = 400, description = "Invalid period or amounts"),
        (status = 401),
        (status = 403),
        (status = 404, description = "No salary profile for employee")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn preview_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<PayrollRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    let stores = MySqlStores::new(pool.get_ref().clone());
    let quote = service::preview(&stores, &payload).await?;
    let b = quote.breakdown;

    Ok(HttpResponse::Ok().json(PayrollPreviewResponse {
        employee_id: payload.employee_id,
        month: payload.month,
        year: payload.year,
        base_salary: quote.base_salary,
        bonuses: payload.bonuses,
        manual_deductions: payload.manual_deductions,
        working_days: quote.working_days,
        present_days: b.present_days,
        late_days: b.late_days,
        absent_days: b.absent_days,
        per_diem_rate: b.per_diem_rate,
        absence_deduction: b.absence_deduction,
        total_deductions: b.total_deductions,
        net_pay: b.net_pay,
    }))
}

/// Generate a salary slip for one employee and one month.
///
/// Repeat generation for the same (employee, month, year) replaces
/// the stored slip. The employee is notified best-effort.
#[utoipa::path(
    post,
    path = "/api/v1/payroll",
    request_body = PayrollRequest,
    responses(
        (status = 201, description = "Payroll generated", body = NewPayroll),
        (status = 400, description = "Invalid period or amounts"),
        (status = 401),
        (status = 403),
        (status = 404, description = "No salary profile for employee")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<PayrollRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    let stores = MySqlStores::new(pool.get_ref().clone());
    let record = service::generate(&stores, auth.user_id, &payload).await?;

    Ok(HttpResponse::Created().json(record))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    /// Ignored for employees, who always see their own slips
    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<Payroll>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Payroll records, role-scoped: HR sees every slip and may filter by
/// employee, employees only ever see their own.
#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let employee_filter = if auth.is_employee() {
        Some(auth.require_employee_profile()?)
    } else {
        query.employee_id
    };

    let (total, data) = match employee_filter {
        Some(employee_id) => {
            let total =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payroll WHERE employee_id = ?")
                    .bind(employee_id)
                    .fetch_one(pool.get_ref())
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "Failed to count payrolls");
                        actix_web::error::ErrorInternalServerError("Internal Server Error")
                    })?;

            let data = sqlx::query_as::<_, Payroll>(
                r#"
                SELECT *
                FROM payroll
                WHERE employee_id = ?
                ORDER BY year DESC, month DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(employee_id)
            .bind(per_page as i64)
            .bind(offset as i64)
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch payroll list");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            (total, data)
        }
        None => {
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payroll")
                .fetch_one(pool.get_ref())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to count payrolls");
                    actix_web::error::ErrorInternalServerError("Internal Server Error")
                })?;

            let data = sqlx::query_as::<_, Payroll>(
                r#"
                SELECT *
                FROM payroll
                ORDER BY year DESC, month DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(per_page as i64)
            .bind(offset as i64)
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch payroll list");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            (total, data)
        }
    };

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Delete a payroll record. Slips have no update path; a wrong slip
/// is deleted or simply regenerated for the same period.
#[utoipa::path(
    delete,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll deleted"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn delete_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    let payroll_id = path.into_inner();

    let result = sqlx::query("DELETE FROM payroll WHERE id = ?")
        .bind(payroll_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to delete payroll");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll record not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Payroll record deleted successfully"
    })))
}
