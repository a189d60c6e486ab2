pub mod echo;
pub mod history;
pub mod pwd;
