//! Raw loan application input
//!
//! Form fields reach the store either as JSON numbers or as the strings a
//! user typed. `NumericInput` accepts both; anything that does not parse is
//! treated like a missing value and fails the matching validation rule.

use serde::{Deserialize, Serialize};

use loandesk_core::domain::{DomainError, LoanApplication};

/// A numeric form field given as a number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// The finite value of this field, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumericInput::Number(n) => *n,
            NumericInput::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// The value as a whole, non-negative number (`"12"` and `12.0` both give 12)
    pub fn as_whole_number(&self) -> Option<u32> {
        let value = self.as_f64()?;
        if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
            return None;
        }
        Some(value as u32)
    }
}

impl From<f64> for NumericInput {
    fn from(n: f64) -> Self {
        NumericInput::Number(n)
    }
}

impl From<u32> for NumericInput {
    fn from(n: u32) -> Self {
        NumericInput::Number(f64::from(n))
    }
}

impl From<&str> for NumericInput {
    fn from(text: &str) -> Self {
        NumericInput::Text(text.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(text: String) -> Self {
        NumericInput::Text(text)
    }
}

/// Fields of a new loan application as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplicationInput {
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub amount: Option<NumericInput>,
    #[serde(default)]
    pub term_months: Option<NumericInput>,
    #[serde(default)]
    pub interest_rate: Option<NumericInput>,
}

impl LoanApplicationInput {
    pub fn new(
        applicant_name: impl Into<String>,
        amount: impl Into<NumericInput>,
        term_months: impl Into<NumericInput>,
        interest_rate: impl Into<NumericInput>,
    ) -> Self {
        Self {
            applicant_name: applicant_name.into(),
            amount: Some(amount.into()),
            term_months: Some(term_months.into()),
            interest_rate: Some(interest_rate.into()),
        }
    }

    /// Validates the input and builds a pending application
    ///
    /// Rules are checked in the order name, amount, term, interest rate;
    /// only the first failure is reported.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` carrying one of `name required`,
    /// `amount required`, `term required` or `interest rate required`.
    pub fn validate(&self) -> Result<LoanApplication, DomainError> {
        let name = self.applicant_name.trim();
        if name.is_empty() {
            return Err(required("name"));
        }

        let amount = self
            .amount
            .as_ref()
            .and_then(NumericInput::as_f64)
            .filter(|amount| *amount > 0.0)
            .ok_or_else(|| required("amount"))?;

        let term_months = self
            .term_months
            .as_ref()
            .and_then(NumericInput::as_whole_number)
            .filter(|term| *term > 0)
            .ok_or_else(|| required("term"))?;

        let interest_rate = self
            .interest_rate
            .as_ref()
            .and_then(NumericInput::as_f64)
            .filter(|rate| *rate >= 0.0)
            .ok_or_else(|| required("interest rate"))?;

        LoanApplication::new(name, amount, term_months, interest_rate)
    }
}

fn required(field: &str) -> DomainError {
    DomainError::Validation(format!("{field} required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(input: &LoanApplicationInput) -> String {
        input.validate().unwrap_err().to_string()
    }

    #[test]
    fn test_numeric_input_parses_text() {
        assert_eq!(NumericInput::from(" 2500.5 ").as_f64(), Some(2500.5));
        assert_eq!(NumericInput::from("abc").as_f64(), None);
        assert_eq!(NumericInput::from("").as_f64(), None);
        assert_eq!(NumericInput::from(f64::INFINITY).as_f64(), None);
    }

    #[test]
    fn test_whole_number() {
        assert_eq!(NumericInput::from("36").as_whole_number(), Some(36));
        assert_eq!(NumericInput::from(12.0).as_whole_number(), Some(12));
        assert_eq!(NumericInput::from("12.5").as_whole_number(), None);
        assert_eq!(NumericInput::from(-3.0).as_whole_number(), None);
    }

    #[test]
    fn test_valid_input_from_strings() {
        let input = LoanApplicationInput::new(" John Smith ", "50000", "24", "0.08");
        let loan = input.validate().unwrap();

        assert_eq!(loan.applicant_name(), "John Smith");
        assert_eq!(loan.amount(), 50_000.0);
        assert_eq!(loan.term_months(), 24);
        assert_eq!(loan.interest_rate(), 0.08);
    }

    #[test]
    fn test_all_invalid_reports_name_first() {
        let input = LoanApplicationInput::default();
        assert_eq!(message(&input), "name required");

        let input = LoanApplicationInput::new("  ", "", "", "");
        assert_eq!(message(&input), "name required");
    }

    #[test]
    fn test_validation_order() {
        let input = LoanApplicationInput::new("Jane", 0.0, 0u32, -1.0);
        assert_eq!(message(&input), "amount required");

        let input = LoanApplicationInput::new("Jane", "not a number", 12u32, 0.1);
        assert_eq!(message(&input), "amount required");

        let input = LoanApplicationInput::new("Jane", 1000.0, 0u32, -1.0);
        assert_eq!(message(&input), "term required");

        let input = LoanApplicationInput::new("Jane", 1000.0, "6.5", 0.1);
        assert_eq!(message(&input), "term required");

        let input = LoanApplicationInput::new("Jane", 1000.0, 12u32, -0.5);
        assert_eq!(message(&input), "interest rate required");
    }

    #[test]
    fn test_missing_interest_rate() {
        let input = LoanApplicationInput {
            interest_rate: None,
            ..LoanApplicationInput::new("Jane", 1000.0, 12u32, 0.0)
        };
        assert_eq!(message(&input), "interest rate required");
    }

    #[test]
    fn test_zero_interest_rate_is_valid() {
        let input = LoanApplicationInput::new("Jane", 1000.0, 12u32, "0");
        assert_eq!(input.validate().unwrap().interest_rate(), 0.0);
    }

    #[test]
    fn test_deserialize_mixed_json() {
        let json = r#"{"applicantName":"Jane","amount":"15000","termMonths":48,"interestRate":"0.05"}"#;
        let input: LoanApplicationInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.amount, Some(NumericInput::Text("15000".into())));
        assert_eq!(input.term_months, Some(NumericInput::Number(48.0)));
        assert_eq!(input.validate().unwrap().term_months(), 48);
    }
}
