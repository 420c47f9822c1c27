pub mod lead;
pub mod notification;
