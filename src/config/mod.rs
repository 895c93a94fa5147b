pub mod load;
pub mod save;
pub mod types;

pub use types::{
    Config, ConflictPolicy, IMAGE_EXTENSIONS, Language, MAX_RECENT_PATHS, OperationMode,
    UserSettings, is_image_file,
};
