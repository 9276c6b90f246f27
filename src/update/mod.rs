mod add_document;
mod clear_documents;

pub use self::clear_documents::ClearDocuments;
