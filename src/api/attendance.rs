use crate::auth::auth::AuthUser;
use crate::model::attendance::Attendance;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in",
    responses(
        (status = 200, description = "Clocked in successfully", body = Object, example = json!({
            "message": "Clocked in successfully"
        })),
        (status = 400, description = "Already clocked in today", body = Object, example = json!({
            "message": "Already clocked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, clock_in)
        VALUES (?, CURDATE(), NOW())
        "#,
    )
    .bind(employee_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Clocked in successfully"
        }))),

        Err(e) => {
            // Duplicate clock-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already clocked in today"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id, "Clock-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Clock-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/clock-out",
    responses(
        (status = 200, description = "Clocked out successfully", body = Object, example = json!({
            "message": "Clocked out successfully"
        })),
        (status = 400, description = "No active clock-in found for today", body = Object, example = json!({
            "message": "No active clock-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_profile()?;

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET clock_out = NOW()
        WHERE employee_id = ?
        AND date = CURDATE()
        AND clock_out IS NULL
        "#,
    )
    .bind(employee_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Clock-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active clock-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Clocked out successfully"
    })))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    /// Ignored for employees, who always see their own records
    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<Attendance>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Attendance history, role-scoped: HR sees every employee and may
/// filter, employees only ever see their own rows.
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, body = AttendanceListResponse),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
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
            let total = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM attendance WHERE employee_id = ?",
            )
            .bind(employee_id)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to count attendance");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            let data = sqlx::query_as::<_, Attendance>(
                r#"
                SELECT id, employee_id, date, clock_in, clock_out
                FROM attendance
                WHERE employee_id = ?
                ORDER BY date DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(employee_id)
            .bind(per_page as i64)
            .bind(offset as i64)
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch attendance list");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            (total, data)
        }
        None => {
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
                .fetch_one(pool.get_ref())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to count attendance");
                    actix_web::error::ErrorInternalServerError("Internal Server Error")
                })?;

            let data = sqlx::query_as::<_, Attendance>(
                r#"
                SELECT id, employee_id, date, clock_in, clock_out
                FROM attendance
                ORDER BY date DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(per_page as i64)
            .bind(offset as i64)
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch attendance list");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

            (total, data)
        }
    };

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        page,
        per_page,
        total,
    }))
}
