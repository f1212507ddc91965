//! Speaking-test submissions.
//!
//! ## Flow
//!
//! ```text
//! JSON body → SubmissionRequest → Submission (defaults applied) → message / audio attachment
//! ```

pub mod compose;
pub mod types;

pub use compose::{audio_caption, audio_filename, compose_message};
pub use types::{Submission, SubmissionRequest};
