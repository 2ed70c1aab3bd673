pub mod clock;
pub mod error;
pub mod migrations;
pub mod records;
pub mod snapshot;

pub use clock::{Clock, DefaultClock, ManualClock};
pub use error::{Result, StoreError};
pub use records::RecordStore;
pub use snapshot::{SessionSnapshot, SnapshotStore};
