//! Dictionary conversion between lexicon term banks, the tab-separated
//! interchange format, and Mobipocket key files.

pub mod export;
pub mod hooks;
pub mod import;
pub mod settings;
pub mod tabfile;
pub mod unicode;
