//! The window in which a transaction may still be changed.

use std::fmt::Display;

use time::{Duration, OffsetDateTime};

use crate::{Error, transaction::Transaction};

/// How long after its date a transaction can be edited or deleted.
pub const EDIT_WINDOW: Duration = Duration::hours(12);

/// A change that the edit window guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockedAction {
    /// Updating the transaction.
    Edit,
    /// Deleting the transaction.
    Delete,
}

impl Display for LockedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockedAction::Edit => f.write_str("edit"),
            LockedAction::Delete => f.write_str("delete"),
        }
    }
}

/// Whether a transaction dated `date` has left the edit window at `now`.
///
/// A transaction exactly [EDIT_WINDOW] old is still editable. A transaction
/// dated in the future is never locked.
pub fn is_locked(date: OffsetDateTime, now: OffsetDateTime) -> bool {
    now - date > EDIT_WINDOW
}

/// Fail with [Error::TransactionLocked] if `transaction` can no longer be changed.
pub fn ensure_editable(
    transaction: &Transaction,
    action: LockedAction,
    now: OffsetDateTime,
) -> Result<(), Error> {
    if is_locked(transaction.date, now) {
        tracing::debug!(
            "Refusing to {action} transaction {}: dated {} but now is {now}",
            transaction.id,
            transaction.date
        );
        return Err(Error::TransactionLocked(action));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::{EDIT_WINDOW, is_locked};

    #[test]
    fn exactly_twelve_hours_is_editable() {
        let date = datetime!(2025-01-01 00:00:00 UTC);

        assert!(!is_locked(date, date + EDIT_WINDOW));
    }

    #[test]
    fn one_second_past_the_window_is_locked() {
        let date = datetime!(2025-01-01 00:00:00 UTC);

        assert!(is_locked(date, date + EDIT_WINDOW + Duration::seconds(1)));
    }

    #[test]
    fn twelve_hours_and_one_minute_is_locked() {
        let date = datetime!(2025-01-01 00:00:00 UTC);

        assert!(is_locked(date, datetime!(2025-01-01 12:01:00 UTC)));
    }

    #[test]
    fn future_dates_are_editable() {
        let now = datetime!(2025-01-01 00:00:00 UTC);

        assert!(!is_locked(now + Duration::days(30), now));
    }

    #[test]
    fn compares_instants_across_offsets() {
        let date = datetime!(2025-01-01 12:00:00 +12:00);

        assert!(!is_locked(date, datetime!(2025-01-01 12:00:00 UTC)));
        assert!(is_locked(date, datetime!(2025-01-01 12:00:01 UTC)));
    }
}
