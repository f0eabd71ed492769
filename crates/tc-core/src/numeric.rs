use crate::TcError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TcError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TcError::NonFinite { what, value: v })
    }
}

pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, TcError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        Err(TcError::Negative { what, value: v })
    } else {
        Ok(v)
    }
}

/// Clamp a requested amount to `[0, ∞)`, mapping NaN to zero.
pub fn non_negative_or_zero(v: Real) -> Real {
    if v > 0.0 { v } else { 0.0 }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clamped_amount_is_never_negative(v in prop::num::f64::ANY) {
            let c = non_negative_or_zero(v);
            prop_assert!(c >= 0.0 || c.is_infinite());
        }
    }
}
