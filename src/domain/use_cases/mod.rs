pub mod lead;
pub mod notify;
