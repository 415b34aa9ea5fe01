pub mod classifier;
pub mod dispatcher;
pub mod locator;
pub mod page;
pub mod poll;
pub mod review;
