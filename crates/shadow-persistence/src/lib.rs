pub mod board_store;
pub mod keys;
pub mod pomodoro_store;
pub mod serialization;
pub mod store;
pub mod time_stats;
pub mod title_store;
pub mod traits;

pub use board_store::{BoardObserver, BoardStore};
pub use keys::StorageKeys;
pub use pomodoro_store::PomodoroStore;
pub use serialization::JsonSerializer;
pub use store::*;
pub use time_stats::collect_time_stats;
pub use title_store::TitleStore;
pub use traits::*;
