use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::loans::{CreateLoanRequest, CreatedLoan, LoanList},
    error::{AppError, AppResult},
    models::Loan,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_loan))
        .route("/farmer/{farmer_id}", get(list_farmer_loans))
}

#[utoipa::path(
    post,
    path = "/api/loans",
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Loan request recorded", body = ApiResponse<CreatedLoan>),
        (status = 400, description = "Bad request"),
    ),
    tag = "Loans"
)]
pub async fn create_loan(
    State(state): State<AppState>,
    Json(payload): Json<CreateLoanRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedLoan>>)> {
    if payload.amount <= 0 {
        return Err(AppError::BadRequest("amount must be positive".to_string()));
    }
    if payload.purpose.trim().is_empty() {
        return Err(AppError::BadRequest("purpose is required".to_string()));
    }
    if payload.repayment_months <= 0 {
        return Err(AppError::BadRequest(
            "repayment period must be positive".to_string(),
        ));
    }

    let loan: Loan = sqlx::query_as(
        r#"
        INSERT INTO loans (id, farmer_id, amount, purpose, repayment_months, preferred_start_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.farmer_id)
    .bind(payload.amount)
    .bind(payload.purpose.trim())
    .bind(payload.repayment_months)
    .bind(payload.preferred_start_date)
    .fetch_one(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Loan request submitted",
            CreatedLoan { loan_id: loan.id },
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/loans/farmer/{farmer_id}",
    params(
        ("farmer_id" = Uuid, Path, description = "Farmer ID")
    ),
    responses(
        (status = 200, description = "Loan requests for a farmer", body = ApiResponse<LoanList>)
    ),
    tag = "Loans"
)]
pub async fn list_farmer_loans(
    State(state): State<AppState>,
    Path(farmer_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LoanList>>> {
    let items = sqlx::query_as::<_, Loan>(
        "SELECT * FROM loans WHERE farmer_id = $1 ORDER BY created_at DESC",
    )
    .bind(farmer_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ApiResponse::success(
        "OK",
        LoanList { items },
        Some(Meta::empty()),
    )))
}
