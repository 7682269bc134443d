mod fetcher;
mod service;

pub use fetcher::Fetcher;
pub use service::{DocumentService, HttpDocumentService, ServiceError, ServiceResult};
