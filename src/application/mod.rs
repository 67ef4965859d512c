pub mod checkout;
pub mod mail;
