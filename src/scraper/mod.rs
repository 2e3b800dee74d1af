pub mod probgate;
pub mod traits;
pub mod usaco;

pub use probgate::{ProbgateClient, download_archives, sync_contests};
pub use traits::ProblemArchive;
pub use usaco::{Discovery, UsacoScraper};
