pub mod delay;
pub mod driver;
pub mod rwlock;
pub mod worker;
