//! Assertion macros for testing decouple operations.
//!
//! - [`crate::assert_result_ok!`] - Assert Result is Ok and extract value
//! - [`crate::assert_result_err!`] - Assert Result is Err and extract error
//! - [`crate::assert_contains_error!`] - Assert error message contains pattern
//! - [`crate::assert_eligible!`] - Assert a parameter is eligible with exactly these methods
//! - [`crate::assert_ineligible!`] - Assert a parameter must keep its type
//!
//! # Example
//!
//! ```rust,ignore
//! use decouple::{assert_eligible, assert_result_ok};
//!
//! let eligibility = assert_result_ok!(analyze_param(param, func, &oracle));
//! assert_eligible!(eligibility, ["Close", "Read"]);
//! ```

/// Assert that a Result is Ok and extract the value.
///
/// If the Result is Err, panics with a message showing the error.
#[macro_export]
macro_rules! assert_result_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "Expected Ok, got Err: {:?}\n  at {}:{}:{}",
                e,
                file!(),
                line!(),
                column!()
            ),
        }
    };
    ($result:expr, $($msg:tt)+) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "{}: Expected Ok, got Err: {:?}\n  at {}:{}:{}",
                format!($($msg)+),
                e,
                file!(),
                line!(),
                column!()
            ),
        }
    };
}

/// Assert that a Result is Err and extract the error.
///
/// If the Result is Ok, panics with a message showing the value.
#[macro_export]
macro_rules! assert_result_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err, got Ok: {:?}\n  at {}:{}:{}",
                value,
                file!(),
                line!(),
                column!()
            ),
            Err(e) => e,
        }
    };
}

/// Assert that an error message contains a specific pattern.
///
/// This macro first asserts the Result is Err, then checks if the
/// error's Display representation contains the pattern.
#[macro_export]
macro_rules! assert_contains_error {
    ($result:expr, $pattern:expr) => {{
        let err = $crate::assert_result_err!($result);
        let err_str = err.to_string();
        assert!(
            err_str.contains($pattern),
            "Error '{}' does not contain '{}'\n  at {}:{}:{}",
            err_str,
            $pattern,
            file!(),
            line!(),
            column!()
        );
        err
    }};
}

/// Assert that an [`Eligibility`](crate::analyzers::usage::Eligibility) is
/// eligible with exactly the named methods, and extract the method map.
#[macro_export]
macro_rules! assert_eligible {
    ($eligibility:expr, [$($method:expr),* $(,)?]) => {
        match $eligibility {
            $crate::analyzers::usage::Eligibility::Eligible(methods) => {
                let mut want: Vec<&str> = vec![$($method),*];
                want.sort_unstable();
                let got: Vec<&str> = methods.names().collect();
                assert_eq!(
                    got, want,
                    "method names differ\n  at {}:{}:{}",
                    file!(),
                    line!(),
                    column!()
                );
                methods
            }
            $crate::analyzers::usage::Eligibility::Ineligible => panic!(
                "Expected eligible parameter, got ineligible\n  at {}:{}:{}",
                file!(),
                line!(),
                column!()
            ),
        }
    };
}

/// Assert that an [`Eligibility`](crate::analyzers::usage::Eligibility) is
/// ineligible.
#[macro_export]
macro_rules! assert_ineligible {
    ($eligibility:expr) => {
        match $eligibility {
            $crate::analyzers::usage::Eligibility::Ineligible => {}
            $crate::analyzers::usage::Eligibility::Eligible(methods) => panic!(
                "Expected ineligible parameter, got eligible with {:?}\n  at {}:{}:{}",
                methods.names().collect::<Vec<_>>(),
                file!(),
                line!(),
                column!()
            ),
        }
    };
}
