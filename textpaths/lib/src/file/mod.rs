mod source_file;
mod source_set;

pub use source_file::SourceFile;
pub use source_set::SourceSet;
