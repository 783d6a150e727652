pub mod contact;
pub mod notice;
