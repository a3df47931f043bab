//! Distinguished names and general names.

pub mod general_name;
pub mod rdn;

pub use general_name::{GeneralName, GeneralNameType, GeneralNames};
pub use rdn::{RdnEntryType, RdnSequence};
