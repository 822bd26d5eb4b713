pub mod similarity_table;

pub use similarity_table::SimilarityTable;
