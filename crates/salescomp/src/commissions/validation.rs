//! Field-level checks run by the HTTP layer before drafts reach the engine
//! or the ingestion processor. The processor itself only performs the
//! semantic checks (user existence, duplication) that need store access.

use chrono::{DateTime, Months, Utc};
use serde::Serialize;

use super::domain::SaleDraft;

/// A single rejected field with the reason, surfaced verbatim over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

fn field_error(field: &'static str, message: impl Into<String>) -> FieldError {
    FieldError {
        field,
        message: message.into(),
    }
}

/// Positive, finite, and at most two fractional digits.
pub fn valid_amount(amount: f64) -> bool {
    amount > 0.0 && amount.is_finite() && (amount * 100.0).round() / 100.0 == amount
}

/// Permissive local@domain.tld shape; no whitespace, exactly one `@`, and a
/// dot with non-empty pieces around it in the domain.
pub fn valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let clean = |part: &str| !part.is_empty() && !part.chars().any(char::is_whitespace);
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    clean(local) && clean(host) && clean(tld)
}

/// Validate a sale draft against the field rules: required user id, positive
/// two-decimal amount, a date no more than one year ahead of `now`, and a
/// commission rate within 0..=20 when present.
pub fn validate_sale_draft(draft: &SaleDraft, now: DateTime<Utc>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.user_id.0.trim().is_empty() {
        errors.push(field_error("user_id", "User ID is required"));
    }

    if !(draft.amount > 0.0) {
        errors.push(field_error("amount", "Amount must be positive"));
    } else if !valid_amount(draft.amount) {
        errors.push(field_error(
            "amount",
            "Amount must have at most 2 decimal places",
        ));
    }

    let one_year_ahead = now.checked_add_months(Months::new(12)).unwrap_or(now);
    if draft.date > one_year_ahead {
        errors.push(field_error(
            "date",
            "Date cannot be more than 1 year in the future",
        ));
    }

    if let Some(rate) = draft.commission_rate {
        if !(0.0..=20.0).contains(&rate) {
            errors.push(field_error(
                "commission_rate",
                "Commission rate must be between 0 and 20",
            ));
        }
    }

    errors
}

/// Year no earlier than 2020.
pub fn validate_year(year: i32) -> Vec<FieldError> {
    if year < 2020 {
        vec![field_error("year", "Year must be 2020 or later")]
    } else {
        Vec::new()
    }
}

/// Month within 1..=12 and year no earlier than 2020.
pub fn validate_period(month: u32, year: i32) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !(1..=12).contains(&month) {
        errors.push(field_error("month", "Month must be a number between 1 and 12"));
    }
    errors.extend(validate_year(year));
    errors
}

/// Period rules plus a non-negative target amount.
pub fn validate_target(month: u32, year: i32, target_amount: f64) -> Vec<FieldError> {
    let mut errors = validate_period(month, year);
    if !(target_amount >= 0.0) {
        errors.push(field_error("target_amount", "Target amount must be positive"));
    }
    errors
}

/// Name length and email shape for directory intake.
pub fn validate_user_profile(name: &str, email: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if name.len() < 2 || name.len() > 50 {
        errors.push(field_error(
            "name",
            "Name must be between 2 and 50 characters",
        ));
    }
    if !valid_email(email) {
        errors.push(field_error("email", "Email format is invalid"));
    }
    errors
}

/// Per-index field errors for a rejected bulk item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFieldErrors {
    pub index: usize,
    pub errors: Vec<FieldError>,
}

/// Partition a bulk batch into valid drafts and per-index field errors.
/// Valid drafts keep their relative order; the processor's own item indices
/// then refer to positions within the valid subset.
pub fn validate_bulk(
    drafts: Vec<SaleDraft>,
    now: DateTime<Utc>,
) -> (Vec<SaleDraft>, Vec<BatchFieldErrors>) {
    let mut valid = Vec::with_capacity(drafts.len());
    let mut rejected = Vec::new();

    for (index, draft) in drafts.into_iter().enumerate() {
        let errors = validate_sale_draft(&draft, now);
        if errors.is_empty() {
            valid.push(draft);
        } else {
            rejected.push(BatchFieldErrors { index, errors });
        }
    }

    (valid, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commissions::domain::{SaleCategory, UserId};
    use chrono::TimeZone;

    fn draft(amount: f64) -> SaleDraft {
        SaleDraft {
            user_id: UserId("user-000001".to_string()),
            amount,
            date: Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
            category: SaleCategory::Software,
            commission_rate: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 31, 12, 0, 0).unwrap()
    }

    #[test]
    fn accepts_a_well_formed_draft() {
        assert!(validate_sale_draft(&draft(125.5), now()).is_empty());
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let errors = validate_sale_draft(&draft(0.0), now());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "amount");
    }

    #[test]
    fn rejects_amounts_with_more_than_two_decimals() {
        let errors = validate_sale_draft(&draft(10.999), now());
        assert_eq!(errors[0].message, "Amount must have at most 2 decimal places");
    }

    #[test]
    fn rejects_dates_more_than_a_year_out() {
        let mut future = draft(100.0);
        future.date = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let errors = validate_sale_draft(&future, now());
        assert_eq!(errors[0].field, "date");
    }

    #[test]
    fn rejects_out_of_range_commission_rates() {
        let mut rated = draft(100.0);
        rated.commission_rate = Some(25.0);
        let errors = validate_sale_draft(&rated, now());
        assert_eq!(errors[0].field, "commission_rate");
    }

    #[test]
    fn validates_period_bounds() {
        assert!(validate_period(12, 2024).is_empty());
        assert_eq!(validate_period(0, 2024).len(), 1);
        assert_eq!(validate_period(13, 2019).len(), 2);
    }

    #[test]
    fn email_shape_is_enforced_without_a_regex_engine() {
        assert!(valid_email("alice@company.com"));
        assert!(valid_email("alice@mail.company.com"));
        assert!(!valid_email("alice"));
        assert!(!valid_email("alice@company"));
        assert!(!valid_email("alice smith@company.com"));
        assert!(!valid_email("alice@@company.com"));
        assert!(!valid_email("alice@.com"));
    }

    #[test]
    fn bulk_partition_keeps_original_indices_for_rejects() {
        let drafts = vec![draft(100.0), draft(-5.0), draft(200.0)];
        let (valid, rejected) = validate_bulk(drafts, now());
        assert_eq!(valid.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].index, 1);
    }
}
