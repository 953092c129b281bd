pub mod activities;

pub use activities::{ActivityListing, Activity};
