//! Verdict policy.

use crate::domain::{ClarityResult, ContrastResult, Status, Verdict};

/// Reason given when every check passed.
pub const PASS_MESSAGE: &str = "Pass: image is visually clear and readable.";

/// Combines the contrast and clarity outcomes.
///
/// Failing checks are listed contrast first, then clarity, joined by `"; "`.
#[must_use]
pub fn verdict(contrast: &ContrastResult, clarity: &ClarityResult) -> Verdict {
    let mut reasons = Vec::with_capacity(2);
    if !contrast.status.is_pass() {
        reasons.push(format!("Low contrast (Lc={:?})", contrast.signed_contrast));
    }
    if !clarity.status.is_pass() {
        reasons.push(format!("Low clarity (score={:?})", clarity.clarity_score));
    }

    if reasons.is_empty() {
        Verdict {
            overall: Status::Pass,
            reason: String::from(PASS_MESSAGE),
        }
    } else {
        Verdict {
            overall: Status::Fail,
            reason: reasons.join("; "),
        }
    }
}
