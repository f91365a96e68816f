/* 📖 # Why have r3_base as a core library?
r3_base provides the error type, the tracing setup and the filesystem abstraction used by the
engine and the command line front end. Keeping them here lets the engine be tested against an
in-memory filesystem without depending on the binary crate.
*/

pub mod error;
pub mod pal;
mod pal_tests;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, R3Error, R3Result, ResultExt};
pub use pal::{DirectoryListing, FilePath, MockPal, Pal, PalHandle, RealPal};
