//! Testing helpers and mock utilities.
//!
//! Provides convenient constructors for mocked session stores.

use crate::card::{Batch, CardRecord};
use crate::error::CardGenError;
use crate::session::MockSessionStore;
use std::sync::Arc;

/// Create a mock store that has nothing cached and accepts any write.
///
/// # Example
///
/// ```rust,ignore
/// use cardgen_core::testing::mock_store_empty;
///
/// let store = mock_store_empty();
/// // Exports through this store always report no data
/// ```
#[must_use]
pub fn mock_store_empty() -> MockSessionStore {
    let mut mock = MockSessionStore::new();
    mock.expect_get().returning(|_| None);
    mock.expect_put().returning(|_, _| ());
    mock
}

/// Create a mock store that returns a batch of the given canonical lines for
/// every conversation.
///
/// # Errors
///
/// Returns `CardGenError::InvalidInput` if a line is not a valid record.
pub fn mock_store_with(lines: &[&str]) -> Result<MockSessionStore, CardGenError> {
    let records = lines
        .iter()
        .map(|line| CardRecord::parse_canonical(line))
        .collect::<Result<Vec<_>, _>>()?;
    let batch = Arc::new(Batch::new(records));

    let mut mock = MockSessionStore::new();
    mock.expect_get().returning(move |_| Some(batch.clone()));
    mock.expect_put().returning(|_, _| ());
    Ok(mock)
}
