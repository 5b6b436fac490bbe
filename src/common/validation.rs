// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// Validadores customizados para campos Decimal e de competência,
// usados nos payloads via #[validate(custom(...))].

pub fn decimal_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut error = ValidationError::new("decimal_positive");
        error.message = Some("O valor deve ser maior que zero.".into());
        Err(error)
    }
}

pub fn decimal_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        let mut error = ValidationError::new("decimal_non_negative");
        error.message = Some("O valor não pode ser negativo.".into());
        Err(error)
    }
}

// Competência no formato YYYY-MM (ex: "2025-08")
pub fn month_key(value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == 7
        && value.as_bytes()[4] == b'-'
        && value[..4].parse::<i32>().is_ok()
        && value[5..].parse::<u32>().is_ok_and(|m| (1..=12).contains(&m));

    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("month_key");
        error.message = Some("A competência deve estar no formato YYYY-MM.".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competencia_aceita_apenas_yyyy_mm() {
        assert!(month_key("2025-08").is_ok());
        assert!(month_key("1999-12").is_ok());
        assert!(month_key("2025-13").is_err());
        assert!(month_key("2025-00").is_err());
        assert!(month_key("2025/08").is_err());
        assert!(month_key("25-08").is_err());
        assert!(month_key("2025-8").is_err());
    }
}
