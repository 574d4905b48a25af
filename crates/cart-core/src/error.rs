//! Cart error types.

use crate::ids::ProductId;
use cart_storage::StorageError;
use thiserror::Error;

/// Failure kinds a cart operation can surface to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfStock,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl ErrorKind {
    /// One-line, user-facing message for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::OutOfStock => "Requested quantity is out of stock",
            ErrorKind::AddFailed => "Error adding product",
            ErrorKind::RemoveFailed => "Error removing product",
            ErrorKind::UpdateFailed => "Error changing product quantity",
        }
    }
}

/// Errors returned by [`CartStore`](crate::CartStore) operations.
///
/// Whenever one of these is returned the cart, in memory and in storage, is
/// exactly what it was before the call.
#[derive(Error, Debug)]
pub enum CartError {
    /// Requested or incremented quantity exceeds available stock.
    #[error("Product {product_id} is out of stock: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Unexpected failure while adding a product.
    #[error("Failed to add product {product_id}: {reason}")]
    AddFailed { product_id: ProductId, reason: String },

    /// Target product is not in the cart, or the removal could not be saved.
    #[error("Failed to remove product {product_id}: {reason}")]
    RemoveFailed { product_id: ProductId, reason: String },

    /// Stock lookup failed during a quantity update, or it could not be saved.
    #[error("Failed to update quantity of product {product_id}: {reason}")]
    UpdateFailed { product_id: ProductId, reason: String },
}

impl CartError {
    /// The failure kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::OutOfStock { .. } => ErrorKind::OutOfStock,
            CartError::AddFailed { .. } => ErrorKind::AddFailed,
            CartError::RemoveFailed { .. } => ErrorKind::RemoveFailed,
            CartError::UpdateFailed { .. } => ErrorKind::UpdateFailed,
        }
    }

    /// Product the failed operation targeted.
    pub fn product_id(&self) -> ProductId {
        match self {
            CartError::OutOfStock { product_id, .. }
            | CartError::AddFailed { product_id, .. }
            | CartError::RemoveFailed { product_id, .. }
            | CartError::UpdateFailed { product_id, .. } => *product_id,
        }
    }

    /// The user-facing notice for this error.
    pub fn notice(&self) -> Notice {
        Notice {
            kind: self.kind(),
            product_id: self.product_id(),
            message: self.kind().message(),
        }
    }

    pub(crate) fn add_failed(product_id: ProductId, reason: impl ToString) -> Self {
        CartError::AddFailed {
            product_id,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn remove_failed(product_id: ProductId, reason: impl ToString) -> Self {
        CartError::RemoveFailed {
            product_id,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn update_failed(product_id: ProductId, reason: impl ToString) -> Self {
        CartError::UpdateFailed {
            product_id,
            reason: reason.to_string(),
        }
    }
}

/// A user-visible failure notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub kind: ErrorKind,
    pub product_id: ProductId,
    pub message: &'static str,
}

/// Errors reported by the stock oracle or the product catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The service could not be reached or answered with a failure status.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something that isn't the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::Malformed(e.to_string())
    }
}

/// Errors computing cart totals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// A unit price that cannot be expressed in the display currency.
    #[error("Price of product {0} is out of range")]
    InvalidPrice(ProductId),
}

/// Persistence failures are folded into the operation's own error kind.
pub(crate) fn describe_storage(e: &StorageError) -> String {
    format!("could not persist cart: {}", e)
}
