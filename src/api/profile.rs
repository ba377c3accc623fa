use crate::auth::auth::AuthUser;
use crate::model::profile::Profile;
use actix_web::{HttpResponse, Responder, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateProfile {
    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "john@company.com", format = "email")]
    pub email: String,

    #[schema(example = "2200.00", value_type = String)]
    pub base_salary: Decimal,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfile {
    #[schema(example = "John Doe")]
    pub full_name: Option<String>,

    #[schema(example = "john@company.com", format = "email")]
    pub email: Option<String>,

    /// Base-salary edits here feed the next payroll generation
    #[schema(example = "2400.00", value_type = String)]
    pub base_salary: Option<Decimal>,

    #[schema(example = "inactive")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ProfileQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileListResponse {
    pub data: Vec<Profile>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// Create salary profile
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    request_body = CreateProfile,
    responses(
        (status = 201, description = "Profile created", body = Object, example = json!({
            "message": "Profile created successfully"
        })),
        (status = 401),
        (status = 403),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn create_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateProfile>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    if payload.base_salary < Decimal::ZERO {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "base_salary must not be negative"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO profiles (full_name, email, base_salary)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&payload.full_name)
    .bind(&payload.email)
    .bind(payload.base_salary)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Profile created successfully"
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "A profile with this email already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to create profile");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List salary profiles
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Paginated profile list", body = ProfileListResponse),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn list_profiles(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ProfileQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // build WHERE clause dynamically
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone());
    }

    if let Some(search) = &query.search {
        conditions.push("(full_name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone());
        bindings.push(like);
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM profiles {}", where_clause);

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count profiles");
        actix_web::error::ErrorInternalServerError("Database error")
    })?;

    let data_sql = format!(
        "SELECT id, full_name, email, base_salary, status FROM profiles {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, Profile>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let profiles = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch profiles");
        actix_web::error::ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(ProfileListResponse {
        data: profiles,
        page,
        per_page,
        total,
    }))
}

/// Get salary profile by ID
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{profile_id}",
    params(
        ("profile_id", description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Profile found", body = Profile),
        (status = 401),
        (status = 403),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let profile_id = path.into_inner();

    // Employees may only read their own profile
    if auth.is_employee() && auth.require_employee_profile()? != profile_id {
        return Err(actix_web::error::ErrorForbidden("Forbidden"));
    }

    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, full_name, email, base_salary, status
        FROM profiles
        WHERE id = ?
        "#,
    )
    .bind(profile_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, profile_id, "Failed to fetch profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match profile {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Profile not found"
        }))),
    }
}

/// Update salary profile
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{profile_id}",
    params(
        ("profile_id", description = "Profile ID")
    ),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateProfile>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    let profile_id = path.into_inner();

    if let Some(base_salary) = body.base_salary {
        if base_salary < Decimal::ZERO {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "base_salary must not be negative"
            })));
        }
    }

    let current = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, full_name, email, base_salary, status
        FROM profiles
        WHERE id = ?
        "#,
    )
    .bind(profile_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, profile_id, "Failed to fetch profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let current = match current {
        Some(c) => c,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Profile not found"
            })));
        }
    };

    let full_name = body.full_name.clone().unwrap_or(current.full_name);
    let email = body.email.clone().unwrap_or(current.email);
    let base_salary = body.base_salary.unwrap_or(current.base_salary);
    let status = body.status.clone().unwrap_or(current.status);

    sqlx::query(
        r#"
        UPDATE profiles
        SET full_name = ?, email = ?, base_salary = ?, status = ?
        WHERE id = ?
        "#,
    )
    .bind(&full_name)
    .bind(&email)
    .bind(base_salary)
    .bind(&status)
    .bind(profile_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, profile_id, "Failed to update profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully"
    })))
}

/// Delete salary profile
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{profile_id}",
    params(
        ("profile_id", description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn delete_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr()?;

    let profile_id = path.into_inner();

    let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
        .bind(profile_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Profile not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, profile_id, "Failed to delete profile");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}
