pub mod constants;
pub mod devcaps;
pub mod proto;
pub mod sorted_set;
pub mod transport;
pub mod xml;
