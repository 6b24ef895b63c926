//! Validation errors for tunable options.

use thiserror::Error;

/// Error returned when a detector option or classifier threshold is set to an unsupported value.
///
/// The rejected value is never applied: the object it was meant for keeps its previous state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidOption {
    #[error("`{name}` must be in range {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("`{name}` must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },
}

impl InvalidOption {
    /// Returns the name of the rejected option.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OutOfRange { name, .. } | Self::NotFinite { name, .. } => name,
        }
    }
}

pub(crate) fn check_f32(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<f32, InvalidOption> {
    if !value.is_finite() {
        return Err(InvalidOption::NotFinite {
            name,
            value: value.into(),
        });
    }
    if value < min || value > max {
        return Err(InvalidOption::OutOfRange {
            name,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        });
    }
    Ok(value)
}

pub(crate) fn check_count(
    name: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<usize, InvalidOption> {
    if value < min || value > max {
        return Err(InvalidOption::OutOfRange {
            name,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        assert_eq!(check_f32("a", 0.5, 0.0, 1.0), Ok(0.5));
        assert_eq!(check_f32("a", 1.0, 0.0, 1.0), Ok(1.0));
        assert_eq!(
            check_f32("a", 1.5, 0.0, 1.0),
            Err(InvalidOption::OutOfRange {
                name: "a",
                value: 1.5,
                min: 0.0,
                max: 1.0,
            })
        );
        assert!(matches!(
            check_f32("a", f32::NAN, 0.0, 1.0),
            Err(InvalidOption::NotFinite { name: "a", .. })
        ));
        assert_eq!(check_count("n", 4, 1, 4), Ok(4));
        assert_eq!(check_count("n", 0, 1, 4).unwrap_err().name(), "n");
    }

    #[test]
    fn message() {
        let err = check_count("max_num_hands", 9, 1, 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`max_num_hands` must be in range 1..=4, got 9"
        );
    }
}
