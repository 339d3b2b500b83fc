mod index_reader;
mod leaf_reader;
mod memory_segment;
mod term;
mod term_dictionary;
mod terms;

pub use {index_reader::*, leaf_reader::*, memory_segment::*, term::*, term_dictionary::*, terms::*};
