pub mod configure;
pub mod dub;
pub mod help;
pub mod like;
pub mod result;
pub mod share;
pub mod status;
pub mod subtitles;
pub mod upload;

pub use result::CommandResult;
