//! Authentication and authorization tests
//!
//! Role semantics and request plumbing:
//! - Property 11: Role Round-Trip Through Claims
//! - Property 12: Pagination Clamping

use proptest::prelude::*;

use shared::{Pagination, UserRole};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Staff accounts cannot mutate stock or the catalog
    #[test]
    fn test_inventory_permission_by_role() {
        assert!(UserRole::Admin.can_manage_inventory());
        assert!(UserRole::Manager.can_manage_inventory());
        assert!(!UserRole::Staff.can_manage_inventory());
    }

    /// Role strings embedded in JWT claims parse back to the same role
    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Manager, UserRole::Staff] {
            let parsed: UserRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    /// Unknown role strings are rejected, not defaulted
    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("owner".parse::<UserRole>().is_err());
        assert!("".parse::<UserRole>().is_err());
    }

    /// Pagination defaults apply when the query string is empty
    #[test]
    fn test_pagination_defaults() {
        let pagination: Pagination = serde_json::from_str("{}").unwrap();
        let clamped = pagination.clamped();
        assert_eq!(clamped.offset(), 0);
        assert_eq!(clamped.limit(), 20);
    }

    /// Hostile page sizes are clamped to the allowed window
    #[test]
    fn test_pagination_clamps_extremes() {
        let pagination = Pagination {
            page: 0,
            limit: 100_000,
        };
        let clamped = pagination.clamped();
        assert_eq!(clamped.offset(), 0);
        assert_eq!(clamped.limit(), 100);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property 12: clamped pagination always yields a sane window
    #[test]
    fn prop_pagination_window_is_sane(page in 0u32..100_000, limit in 0u32..100_000) {
        let clamped = Pagination { page, limit }.clamped();
        prop_assert!(clamped.offset() >= 0);
        prop_assert!((1..=100).contains(&clamped.limit()));
    }
}
