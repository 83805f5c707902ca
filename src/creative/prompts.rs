//! Fixed instruction templates for the text generator.

/// Instruction asking the generator to turn a free-text description into
/// a music-generation prompt.
pub fn prompt_instruction(description: &str) -> String {
    format!(
        "You are a music prompt engineer. Rewrite the following song description \
         as a single concise prompt for a text-to-music model. Describe genre, \
         mood, instrumentation and tempo as comma-separated phrases. \
         Respond with the prompt only, no explanations.\n\n\
         Description: {description}"
    )
}

/// Instruction asking the generator for full song lyrics.
pub fn lyrics_instruction(description: &str) -> String {
    format!(
        "Write complete song lyrics for the following description. Structure the \
         song with [verse], [chorus] and [bridge] tags on their own lines. \
         Respond with the lyrics only, no explanations.\n\n\
         Description: {description}"
    )
}

/// Instruction asking the generator for genre labels.
pub fn genre_instruction(description: &str) -> String {
    format!("List 3-5 Musical Genre (comma separated) for the following description: {description}")
}
