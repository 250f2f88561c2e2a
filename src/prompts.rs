//! Instruction text sent to the completion model.
//!
//! The preamble lives here rather than inside the HTTP client so the client
//! stays a plain transport and the wording can be inspected in tests.

/// Fixed preamble prepended to the extracted document text.
pub const SUMMARY_PROMPT: &str = "Read the following legal case document and summarize it in clear, factual bullet points. \
Use plain language that can be understood by a common person. \
Do not include legal jargon, interpretations, or formatting like asterisks or emojis. \
Give final output no prompt from your side. Just provide the facts clearly, section by section:\n\n";

/// Build the single user message: preamble followed by the text verbatim.
pub fn summary_message(document_text: &str) -> String {
    let mut message = String::with_capacity(SUMMARY_PROMPT.len() + document_text.len());
    message.push_str(SUMMARY_PROMPT);
    message.push_str(document_text);
    message
}
