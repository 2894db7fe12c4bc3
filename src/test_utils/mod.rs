//! Shared test utilities and fixtures
//!
//! This module provides common test helpers to reduce duplication
//! and make tests more robust against implementation changes.


/// Helper assertions for tests
#[cfg(test)]
pub mod assertions {
    use crate::domain::models::ScanResult;

    /// Checks if a scan reported a specific issue
    pub fn has_issue(result: &ScanResult, issue: &str) -> bool {
        result.issues.iter().any(|i| i == issue)
    }

    /// Asserts that a result contains the expected issue
    #[macro_export]
    macro_rules! assert_has_issue {
        ($result:expr, $issue:expr) => {
            assert!(
                $crate::test_utils::assertions::has_issue($result, $issue),
                "Expected to find issue '{}' but it was not present",
                $issue
            );
        };
    }

    /// Asserts that a result does NOT contain the specified issue
    #[macro_export]
    macro_rules! assert_no_issue {
        ($result:expr, $issue:expr) => {
            assert!(
                !$crate::test_utils::assertions::has_issue($result, $issue),
                "Expected NOT to find issue '{}' but it was present",
                $issue
            );
        };
    }
}
