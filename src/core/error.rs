use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Please enter valid numerical values.")]
    NotNumeric,
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be >= 0")]
    Negative { field: &'static str },
    #[error("annual rate must be above -100% and at most 100%, got {:.2}%", .rate * 100.0)]
    RateOutOfRange { rate: f64 },
    #[error("years must be at most {max}, got {years}")]
    HorizonTooLong { years: u32, max: u32 },
    #[error("capital would grow past the largest representable amount")]
    Overflow,
}
