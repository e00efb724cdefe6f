//! Document retrieval: the `Retriever` seam, a directory-backed
//! implementation, and the tool resolver that turns a model's
//! `search_documents` call into formatted passages.

pub mod resolver;
pub mod retriever;

pub use resolver::{resolve, search_documents_tool, NO_RESULTS, SEARCH_TOOL};
pub use retriever::{list_documents, DirectoryRetriever, DocumentInfo, Passage, Retriever};
