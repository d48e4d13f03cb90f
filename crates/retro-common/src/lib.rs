pub mod completion;
pub mod corpus;
pub mod document;
pub mod error;
