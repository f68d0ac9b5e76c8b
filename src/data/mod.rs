pub mod ci;
pub mod git;
pub mod version;

pub use ci::CiNotifier;
pub use git::{GitCli, SourceControl};
pub use version::VersionInfo;
