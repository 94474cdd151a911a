pub mod entry;
pub mod fingerprint;
pub mod seen;

pub use entry::Entry;
pub use fingerprint::Fingerprint;
pub use seen::{DuplicateSignal, SeenState};
