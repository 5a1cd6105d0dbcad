mod achievement;
mod attempt;
mod catalog;

pub use achievement::AchievementCommands;
pub use attempt::AttemptCommands;
pub use catalog::CatalogCommands;
