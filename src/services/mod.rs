pub mod archive;
pub mod file_selector;
pub mod table_io;

pub use archive::create_archive;
pub use file_selector::{DirectorySelector, FileSelector, PathListSelector};
pub use table_io::{read_table, to_csv_bytes, write_table};
