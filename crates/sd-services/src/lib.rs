pub mod analyzer;
pub mod config;
pub mod context;
pub mod extractor;
pub mod service;

pub use analyzer::{parse_smells_response, HttpAnalyzer, SmellAnalyzer};
pub use config::*;
pub use context::RequestContext;
pub use extractor::{ArchiveExtractor, DirectoryScanner, SourceArchive, ZipExtractor};
pub use service::{NewProject, ProjectService};
