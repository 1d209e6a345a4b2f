pub mod duas;
pub mod header;
pub mod next_prayer;
pub mod prayers;
pub mod radio;
pub mod reader;
pub mod statusbar;
pub mod surahs;
pub mod upcoming;
