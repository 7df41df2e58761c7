pub mod batch;
pub mod config;
pub mod error;
pub mod letterbox;
pub mod processing {
    pub mod decode;
    pub mod layout;
    pub mod resample;
}

pub use batch::{BatchReport, Outcome, run_batch};
pub use config::{Configuration, Job};
pub use error::{ConfigError, LetterboxError};
pub use letterbox::{LetterboxSettings, letterbox_file};
