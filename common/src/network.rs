pub mod address_set;
pub mod compiler;
pub mod interface;
pub mod mac;
pub mod range;
