pub mod rdf_store;
pub mod util;

pub use rdf_store::RdfStore;
pub use util::StoreConfig;
