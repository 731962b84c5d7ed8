//! Job board clients for LinkedIn, Indeed and ZipRecruiter, plus the
//! option types and logging setup shared by the binaries.

pub mod boards;
pub mod config;
pub mod logging;
pub mod salary;

mod html;

pub use boards::{Board, Boards};
pub use config::{HttpOpts, SearchOpts};
