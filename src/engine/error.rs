//! Error types for vending operations.

use thiserror::Error;

use crate::Amount;
use crate::inventory::InvariantViolation;
use crate::model::ProductKey;

/// Error returned by the engine operations. State is left as it was before the call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VendError {
    #[error("Wrong product selected")]
    ProductNotFound(String),

    #[error("Product out of stock")]
    ProductOutOfStock(ProductKey),

    #[error("Please select product first")]
    ProductNotSelected,

    #[error("Coin is not valid")]
    CoinNotValid(String),

    #[error("Change can't be returned. Please try again with different coins")]
    ChangeCantBeProvided { owed: Amount },

    #[error("invariant violated: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}
