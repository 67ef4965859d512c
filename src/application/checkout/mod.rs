mod checkout_service;
pub mod documents;
mod errors;
mod in_flight;
mod transaction;

pub use checkout_service::{
    ReturnOutcome, ServiceDependencies, adjust_book_count, cancel_checkout, list_checkouts,
    return_checkout,
};
pub use errors::{CheckoutApplicationError, Result};
pub use in_flight::{InFlightGuard, InFlightReturns};
pub use transaction::{MAX_TRANSACTION_ATTEMPTS, Snapshot, run_transaction};
