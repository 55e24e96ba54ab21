//! SQL statements for both lookup modes.
//!
//! Column aliases here are the field names of the row types in
//! [`crate::rows`]; the JSON labels are applied at serialization.

use crate::predicate::{Predicate, quote_literal};
use crate::{CANCELED_PAYMENT_STATUS, NOT_DUE_GRACE_DAYS, REPRESENTATIVE_POSITION};

/// Per payment reference, the principal that is not yet due: payments whose
/// end date plus the grace period has not passed, less any amount already
/// received.
pub fn not_due_subquery() -> String {
    format!(
        "SELECT
            tpm_ref,
            SUM(
                CASE
                    WHEN (tpm_end_paid + INTERVAL '{grace} day') >= CURRENT_DATE
                        AND COALESCE(tpm_re_money, 0) = 0
                    THEN tpm_paid_principle
                    WHEN (tpm_end_paid + INTERVAL '{grace} day') >= CURRENT_DATE
                        AND tpm_paid_principle > COALESCE(tpm_re_money, 0)
                    THEN tpm_paid_principle - tpm_re_money
                    ELSE 0
                END
            ) AS debt_not_due
        FROM table_paid_money
        WHERE tmp_paystatus IS DISTINCT FROM {canceled}
        GROUP BY tpm_ref",
        grace = NOT_DUE_GRACE_DAYS,
        canceled = quote_literal(CANCELED_PAYMENT_STATUS),
    )
}

/// Batch statement. Binds `$1` as `text[]` of promise numbers.
pub fn batch_query() -> String {
    format!(
        "SELECT
            ds.ds_number_promise::text AS ds_number_promise,
            ds.remaining_principal::numeric AS remaining_principal,
            COALESCE(vp.debt_not_due, 0)::numeric AS debt_not_due
        FROM debtor_status_info ds
        LEFT JOIN ({not_due}) vp ON vp.tpm_ref = ds.id
        WHERE ds.ds_number_promise = ANY($1::text[])
        ORDER BY ds.ds_number_promise, ds.id",
        not_due = not_due_subquery(),
    )
}

/// Single-mode statement for the given predicate. Binds the predicate's
/// values as `$1..$n`.
///
/// Remainder columns use `MAX` over the rows of one group: the membership
/// joins repeat a debtor-status row once per matching project record, so
/// summing would count the same balance several times. `ds.id` is part of the
/// grouping key so distinct debtor-status records never merge, and the
/// not-yet-due amount is computed per `ds.id` in its own CTE and carried
/// through the grouping untouched.
pub fn single_query(predicate: &Predicate) -> String {
    format!(
        "WITH valid_payment AS ({not_due})
        SELECT
            w.wfri_id_card::text AS wfri_id_card,
            w.wfri_full_name::text AS wfri_full_name,
            p.dpd_province::text AS dpd_province,
            ddd.ddd_district::text AS ddd_district,
            sdd.dsdd_sub_district::text AS dsdd_sub_district,
            ds.ds_name_year::text AS ds_name_year,
            ds.ds_number_promise::text AS ds_number_promise,
            CASE WHEN r.mrpr_tb_position = {representative}
                THEN 'ผู้แทนกลุ่ม เสนอโครงการ'
                ELSE 'ผู้ร่วมโครงการ'
            END AS borrower_role,
            ds.ds_project::text AS ds_project,
            ds.ds_status_project::text AS ds_status_project,
            ds.ds_rev_money::text AS ds_rev_money,
            MAX(COALESCE(ds.remaining_principal, 0))::numeric AS remaining_principal,
            COALESCE(pm.debt_not_due, 0)::numeric AS debt_not_due,
            MAX(COALESCE(ds.remaining_interest, 0))::numeric AS remaining_interest,
            MAX(COALESCE(ds.remaining_fine, 0))::numeric AS remaining_fine,
            MAX(COALESCE(ds.remaining_interest_old_new, 0))::numeric AS remaining_penalty_interest,
            MAX(COALESCE(ds.remaining_sum, 0))::numeric AS remaining_total
        FROM debtor_status_info ds
        LEFT JOIN money_revolving_project_record_info m ON m.id = ds.ds_number_request
        LEFT JOIN money_revolving_project_record_table r ON r.mrpr_tb_m2o_ref = m.id
        LEFT JOIN women_fund_register_info w ON w.id = r.mrpr_tb_id_card
        LEFT JOIN define_sub_district_data sdd ON sdd.id = ds.ds_tambon::INTEGER
        LEFT JOIN define_district_data ddd ON ddd.id = sdd.dsdd_district_ref
        LEFT JOIN define_province_data p ON ds.ds_code_province = p.id
        LEFT JOIN valid_payment pm ON pm.tpm_ref = ds.id
        {where_clause}
        GROUP BY
            w.wfri_id_card, w.wfri_full_name,
            p.dpd_province,
            ddd.ddd_district, sdd.dsdd_sub_district,
            ds.ds_name_year, ds.ds_number_promise,
            ds.ds_project, ds.ds_status_project,
            ds.ds_rev_money,
            r.mrpr_tb_position,
            pm.debt_not_due,
            ds.id
        ORDER BY ds.ds_number_promise, r.mrpr_tb_position",
        not_due = not_due_subquery(),
        representative = quote_literal(REPRESENTATIVE_POSITION),
        where_clause = predicate.where_clause(),
    )
}
