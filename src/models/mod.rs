pub mod clip;
pub mod search_index;

pub use clip::{ClipContent, ClipEntry, ClipKind, ClipboardHistory, ContentError};
pub use search_index::{KindFilter, SearchIndex, SearchMode};
