pub mod achievement;
pub mod attempt;
pub mod balance;
pub mod catalog;
pub mod dispatch;
pub mod run;
pub mod shared;
