pub mod cd;
pub mod exit;
