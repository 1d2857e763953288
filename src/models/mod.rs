pub mod checkpoint_record;
pub mod cursor;
pub mod item;

// Re-export models for easy access
pub use checkpoint_record::CheckpointRecord;
pub use cursor::Cursor;
pub use item::{Item, Page};
