pub mod file_operations;
pub mod sampling;

pub use file_operations::{
    copy_file_preserving, create_symlink, ensure_directory, hash_file, list_files_with_extensions,
    same_contents, FileListing,
};
pub use sampling::{create_rng, sample_without_replacement};
