/* 📖 # What is the Platform Abstraction Layer?

The PAL is the only way r3 touches the filesystem: listing directories, testing for existence
and renaming. RealPal maps these onto std::fs below the search root; MockPal keeps an
in-memory tree so the engine can be tested deterministically.
*/

mod file_path;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{DirectoryListing, Pal, PalHandle};
