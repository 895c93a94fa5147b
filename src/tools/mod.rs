mod file_transfer;
mod folder_opener;
mod image_scanner;
mod path_validator;

pub use file_transfer::{copy_preserving_times, move_file};
pub use folder_opener::{file_browser_command, open_in_file_browser};
pub use image_scanner::{ImageFile, scan_image_files};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
