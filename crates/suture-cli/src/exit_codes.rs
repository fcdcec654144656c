//! Exit codes. Part of the CLI contract.

use suture_core::EvalError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1; // Anything not classified below
pub const CONFIG_ERROR: i32 = 2; // Missing key, bad flags, unreadable config
pub const PROVIDER_FAILURE: i32 = 3; // Unreachable provider or unusable response
pub const NO_MEASUREMENTS: i32 = 4; // Provider found no sutures

pub fn for_error(err: &anyhow::Error) -> i32 {
    match err
        .chain()
        .find_map(|cause| cause.downcast_ref::<EvalError>())
    {
        Some(EvalError::Config { .. }) => CONFIG_ERROR,
        Some(EvalError::NoMeasurements) => NO_MEASUREMENTS,
        Some(e) if e.is_provider_failure() => PROVIDER_FAILURE,
        _ => FAILURE,
    }
}
