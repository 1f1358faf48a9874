pub mod metadata;
pub mod phraser;

pub use metadata::MetadataSource;
pub use phraser::{AdvisoryPhraser, PhrasingRequest};
