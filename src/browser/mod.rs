pub mod frames;
pub mod layout;
pub mod locator;
pub mod page;
