//! datetidy - sort photos and videos into date folders
//!
//! Camera apps encode the capture date in the file name (`IMG_20210222_213525.jpg`,
//! `C360_2019-07-17-04-02-45-169.jpg`, ...). This library recognises those names,
//! derives a `YYYY-MM-DD` folder from them and moves each file into its folder
//! without ever overwriting anything.

pub mod cli;
pub mod config;
pub mod file_organizer;
pub mod matcher;
pub mod output;

pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use file_organizer::{DateOrganizer, OrganizeError, RunReport};
pub use matcher::{CaptureDate, ClassifyError, MatcherDefinition, Registry, classify};

pub use cli::{Cli, run_cli};
