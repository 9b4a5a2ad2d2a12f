pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod load;
pub mod report;

pub use config::ReportLayoutConfig;
pub use document::{CellValue, MemorySheet, TabularDocument, WorkbookSheet};
pub use error::ReportError;
pub use report::{DataBounds, HeaderSchema, Layout, Record, ReportIdentity, TitleMasterReport};
