pub mod duas;
pub mod radios;
pub mod surahs;
