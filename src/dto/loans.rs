use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Loan;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoanRequest {
    pub farmer_id: Uuid,
    pub amount: i64,
    pub purpose: String,
    pub repayment_months: i32,
    pub preferred_start_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedLoan {
    pub loan_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoanList {
    pub items: Vec<Loan>,
}
