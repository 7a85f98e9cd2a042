pub mod observers;
pub mod store;

pub use observers::SubscriptionId;
pub use store::ProgressLedger;
