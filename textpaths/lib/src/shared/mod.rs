mod language;
mod summary;

pub use language::SourceLanguage;
pub use summary::{CodeRange, DeclarationSummary, FileSummary, PackageSummary, SyntaxDiagnostic};
