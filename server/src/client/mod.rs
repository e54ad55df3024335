mod client_key;
mod client_liaison;
mod tick_record;

pub use client_key::{ClientKey, LiaisonState, OccupantStatus};
pub use client_liaison::{diff_snapshots, ClientLiaison};
pub use tick_record::{TickRecord, TickRecordList};
