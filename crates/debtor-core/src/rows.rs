//! Result rows and their JSON shape.
//!
//! Field names match the SQL aliases in [`crate::sql`]; the serialized keys
//! are the labels consumers of the endpoint already depend on. Amounts are
//! `numeric` decoded without float rounding and serialized as decimal strings.

use bigdecimal::BigDecimal;
use serde::Serialize;

/// Aggregated single-mode row: one per debtor-status record, borrower and
/// position.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct DebtorStatusRow {
    pub wfri_id_card: Option<String>,
    pub wfri_full_name: Option<String>,
    pub dpd_province: Option<String>,
    pub ddd_district: Option<String>,
    pub dsdd_sub_district: Option<String>,
    pub ds_name_year: Option<String>,
    pub ds_number_promise: Option<String>,
    /// Group representative or project participant.
    #[serde(rename = "สถานะผู้กู้")]
    pub borrower_role: String,
    pub ds_project: Option<String>,
    pub ds_status_project: Option<String>,
    pub ds_rev_money: Option<String>,
    #[serde(rename = "เงินต้นคงเหลือ")]
    pub remaining_principal: BigDecimal,
    #[serde(rename = "หนี้ยังไม่ถึงกำหนด")]
    pub debt_not_due: BigDecimal,
    #[serde(rename = "ดอกเบี้ยคงเหลือ")]
    pub remaining_interest: BigDecimal,
    #[serde(rename = "เบี้ยปรับคงเหลือ")]
    pub remaining_fine: BigDecimal,
    #[serde(rename = "ดอกเบี้ยผิดนัดคงเหลือ")]
    pub remaining_penalty_interest: BigDecimal,
    #[serde(rename = "รวมคงเหลือ")]
    pub remaining_total: BigDecimal,
}

/// Unaggregated batch-mode row.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PromiseBalanceRow {
    pub ds_number_promise: Option<String>,
    /// Raw column value; `null` when the record has none.
    #[serde(rename = "เงินต้นคงเหลือ")]
    pub remaining_principal: Option<BigDecimal>,
    #[serde(rename = "หนี้ยังไม่ถึงกำหนด")]
    pub debt_not_due: BigDecimal,
}
