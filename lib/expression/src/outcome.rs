use log::debug;
use serde::Serialize;

/// Result of an evaluation, projected onto both numeric outputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub int: i64,
    pub float: f64,
}

/// Projects a raw result onto `(int, float)`
///
/// NaN becomes `0.0`. Infinities are kept, with `int` saturating to the
/// `i64` bound of the same sign, as it does for finite values beyond the
/// `i64` range.
pub fn finalize(raw: f64) -> Evaluation {
    let float = if raw.is_nan() {
        debug!("Sanitizing NaN result to 0.0");
        0.0
    } else {
        raw
    };

    Evaluation {
        int: float.round_ties_even() as i64,
        float,
    }
}
