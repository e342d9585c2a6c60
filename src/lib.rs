//! # huffsqueeze
//!
//! A character-level Huffman compressor for text.
//!
//! The pipeline has four stages, each feeding the next: a
//! [`FrequencyTable`] counts character occurrences, a [`HuffmanTree`] is
//! built from the counts by greedy min-weight merging, a [`CodeTable`]
//! assigns each character its prefix-free bit code, and [`codec`] packs the
//! coded input into a self-contained artifact (and reverses all of it).
//!
//! ## Quick start
//!
//! ```
//! use huffsqueeze::codec;
//!
//! let artifact = codec::encode("abracadabra")?;
//! let text = codec::decode(&artifact)?;
//! assert_eq!(text, "abracadabra");
//! # Ok::<(), huffsqueeze::HuffError>(())
//! ```

pub mod artifact;
pub mod code;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod logger;
pub mod tree;

// Re-export main types for convenience
pub use code::CodeTable;
pub use error::HuffError;
pub use frequency::FrequencyTable;
pub use tree::{HuffNode, HuffmanTree};
