//! CLI Exit Code Registry
//!
//! Single source of truth for `sfms` exit codes. Exit codes are part of
//! the shell contract: wrapper scripts key off them the way the old
//! HTTP frontend keyed off 400/404/500.
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! | 0    | Success                                      |
//! | 1    | General error (unspecified)                  |
//! | 2    | Usage error (bad args, unknown stage)        |
//! | 3    | Local I/O error (fixture/batch file)         |
//! | 10   | Validation error (missing required field)    |
//! | 11   | Not found (key absent, sheet empty)          |
//! | 12   | Gateway error (spreadsheet API failure)      |
//! | 13   | Upload error (photo store failure)           |

use sheetfms_workflow::FmsError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Local I/O error - unreadable fixture, batch, or photo file.
pub const EXIT_IO: u8 = 3;

/// Validation error - the old HTTP 400.
pub const EXIT_VALIDATION: u8 = 10;

/// Not found - the old HTTP 404 (key absent or sheet empty).
pub const EXIT_NOT_FOUND: u8 = 11;

/// Gateway error - the old HTTP 500 (remote spreadsheet failure).
pub const EXIT_GATEWAY: u8 = 12;

/// Upload error - photo store failure.
pub const EXIT_UPLOAD: u8 = 13;

/// Map a service error onto its exit code.
pub fn fms_exit_code(err: &FmsError) -> u8 {
    match err {
        FmsError::Validation(_) => EXIT_VALIDATION,
        FmsError::Config(_) => EXIT_USAGE,
        FmsError::UnknownWorkflow(_) | FmsError::UnknownStage { .. } => EXIT_USAGE,
        FmsError::KeyNotFound { .. } | FmsError::NoData { .. } => EXIT_NOT_FOUND,
        FmsError::Gateway(_) => EXIT_GATEWAY,
        FmsError::Upload(_) => EXIT_UPLOAD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_maps_like_the_old_status_codes() {
        assert_eq!(fms_exit_code(&FmsError::Validation("x".into())), 10);
        assert_eq!(
            fms_exit_code(&FmsError::KeyNotFound { sheet: "FMS".into(), key: "7".into() }),
            11
        );
        assert_eq!(fms_exit_code(&FmsError::NoData { sheet: "FMS".into() }), 11);
        assert_eq!(fms_exit_code(&FmsError::UnknownWorkflow("x".into())), 2);
        assert_eq!(fms_exit_code(&FmsError::Upload("x".into())), 13);
    }
}
