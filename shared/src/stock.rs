//! Pure stock ledger math.
//!
//! Every mutation path (stock movements, product create/update) derives stock
//! levels and status through these functions so the rules cannot drift apart
//! between call sites.

use crate::models::{MovementType, ProductStatus};

/// Apply one movement to a current stock level and return the new level.
///
/// - `In` adds the quantity.
/// - `Out` and `Transfer` subtract, clamped at zero. Excess outbound
///   quantity is silently clamped, not rejected; this is a documented
///   limitation of the ledger, not an error.
/// - `Adjustment` sets the stock to the quantity (absolute set, not delta).
///
/// `quantity` must already be validated as positive.
pub fn apply_movement(current_stock: i32, movement_type: MovementType, quantity: i32) -> i32 {
    match movement_type {
        MovementType::In => current_stock.saturating_add(quantity),
        MovementType::Out | MovementType::Transfer => (current_stock - quantity).max(0),
        MovementType::Adjustment => quantity,
    }
}

/// Derive the stock status for a product after a stock change.
///
/// `Discontinued` is an explicit manual state and is never overwritten by
/// this derivation; for any other previous status the result is a pure
/// function of `new_stock` vs `min_stock`.
pub fn derive_status(
    new_stock: i32,
    min_stock: i32,
    previous_status: ProductStatus,
) -> ProductStatus {
    if previous_status == ProductStatus::Discontinued {
        return ProductStatus::Discontinued;
    }
    if new_stock == 0 {
        ProductStatus::OutOfStock
    } else if new_stock <= min_stock {
        ProductStatus::LowStock
    } else {
        ProductStatus::InStock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn in_movement_adds() {
        assert_eq!(apply_movement(10, MovementType::In, 5), 15);
    }

    #[test]
    fn out_movement_subtracts_clamped() {
        assert_eq!(apply_movement(12, MovementType::Out, 20), 0);
        assert_eq!(apply_movement(12, MovementType::Out, 5), 7);
    }

    #[test]
    fn transfer_behaves_like_out() {
        assert_eq!(apply_movement(8, MovementType::Transfer, 3), 5);
        assert_eq!(apply_movement(2, MovementType::Transfer, 9), 0);
    }

    #[test]
    fn adjustment_is_absolute_set() {
        assert_eq!(apply_movement(100, MovementType::Adjustment, 42), 42);
        assert_eq!(apply_movement(0, MovementType::Adjustment, 7), 7);
    }

    #[test]
    fn status_boundaries() {
        assert_eq!(
            derive_status(0, 5, ProductStatus::InStock),
            ProductStatus::OutOfStock
        );
        assert_eq!(
            derive_status(5, 5, ProductStatus::InStock),
            ProductStatus::LowStock
        );
        assert_eq!(
            derive_status(6, 5, ProductStatus::OutOfStock),
            ProductStatus::InStock
        );
    }

    #[test]
    fn discontinued_is_sticky() {
        assert_eq!(
            derive_status(0, 5, ProductStatus::Discontinued),
            ProductStatus::Discontinued
        );
        assert_eq!(
            derive_status(50, 5, ProductStatus::Discontinued),
            ProductStatus::Discontinued
        );
    }

    proptest! {
        /// Stock never goes negative, whatever the movement sequence.
        #[test]
        fn stock_never_negative(
            movements in proptest::collection::vec(
                (0..4usize, 1..1000i32), 0..50
            )
        ) {
            let mut stock = 0i32;
            for (kind, qty) in movements {
                let movement_type = match kind {
                    0 => MovementType::In,
                    1 => MovementType::Out,
                    2 => MovementType::Adjustment,
                    _ => MovementType::Transfer,
                };
                stock = apply_movement(stock, movement_type, qty);
                prop_assert!(stock >= 0);
            }
        }

        /// Status is a total function consistent with the thresholds.
        #[test]
        fn status_matches_thresholds(stock in 0..10_000i32, min in 0..10_000i32) {
            let status = derive_status(stock, min, ProductStatus::InStock);
            if stock == 0 {
                prop_assert_eq!(status, ProductStatus::OutOfStock);
            } else if stock <= min {
                prop_assert_eq!(status, ProductStatus::LowStock);
            } else {
                prop_assert_eq!(status, ProductStatus::InStock);
            }
        }
    }
}
