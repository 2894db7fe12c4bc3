pub mod sqlite;

pub use sqlite::HistoryRepository;
