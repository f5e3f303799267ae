pub mod driver;
pub mod observer;
pub mod timing;
