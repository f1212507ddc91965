//! Text composed from a submission: the chat message, the audio caption
//! and the attachment filename.

use super::types::Submission;

/// Extension of every uploaded recording.
pub const AUDIO_EXTENSION: &str = "webm";

/// Build the notification posted to the chat before the recording.
///
/// All five labelled fields are always present, even when empty.
pub fn compose_message(submission: &Submission) -> String {
    format!(
        "\n📝 New Speaking Test Completed!\n\
         \n\
         👤 Student: {} {}\n\
         👥 Group: {}\n\
         📚 Set: {}\n\
         📅 Date: {}\n\
         ⏰ Time: {}\n",
        submission.first_name,
        submission.surname,
        submission.group,
        submission.set_name,
        submission.date,
        submission.time,
    )
}

/// Caption attached to the uploaded recording.
pub fn audio_caption(submission: &Submission) -> String {
    format!(
        "🎤 Recording from {} {} ({})",
        submission.first_name, submission.surname, submission.group
    )
}

/// Attachment filename, e.g. `Ana_Li_Set_1.webm`.
///
/// Name parts are trimmed and joined with `_`; any remaining run of
/// whitespace becomes a single `_`.
pub fn audio_filename(submission: &Submission) -> String {
    let stem = [
        submission.first_name.trim(),
        submission.surname.trim(),
        submission.set_name.trim(),
    ]
    .join("_");

    format!("{}.{}", collapse_whitespace(&stem), AUDIO_EXTENSION)
}

fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;

    for c in input.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}
