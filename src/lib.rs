pub mod errors;
pub mod scoring;
pub mod aligner;
pub mod similarity;
pub mod guide_tree;
pub mod io;
