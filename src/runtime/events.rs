//! Runtime event stream payloads.

use crate::types::ContactId;

/// Events emitted after a contact write commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogbookEvent {
    /// A new contact was logged.
    ContactCreated {
        /// Created contact id.
        id: ContactId,
    },
    /// An existing contact was corrected.
    ContactUpdated {
        /// Updated contact id.
        id: ContactId,
    },
    /// A contact was removed.
    ContactDeleted {
        /// Deleted contact id.
        id: ContactId,
    },
}
