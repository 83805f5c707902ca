//! Prompt derivation.
//!
//! Turns a free-text description into the creative inputs for media
//! synthesis: a refined music prompt, lyrics and a list of genre tags.
//! Each sub-call is an independent, stateless round trip to the text
//! generator; responses are taken verbatim with no validation, so a
//! degenerate model response propagates to the caller unchanged.

mod prompts;

use crate::engines::{CompletionOptions, LlmError, TextGenerator};
use std::time::Duration;
use tracing::debug;

/// Literal used in place of generated lyrics for instrumental tracks.
pub const INSTRUMENTAL_PLACEHOLDER: &str = "[Instrumental]";

/// Fixed generation parameters for all derivation calls; not
/// configurable per request.
const DERIVATION_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.7,
    max_tokens: Some(1024),
    timeout: Duration::from_secs(120),
};

/// Creative inputs derived from a request description.
///
/// Produced once per request and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct DerivedCreative {
    pub prompt: String,
    pub lyrics: String,
    pub genre_tags: Vec<String>,
}

/// Derive the creative inputs for a description.
///
/// When `instrumental` is true the lyrics call is skipped entirely and
/// [`INSTRUMENTAL_PLACEHOLDER`] is used instead.
pub async fn derive(
    generator: &dyn TextGenerator,
    description: &str,
    instrumental: bool,
) -> Result<DerivedCreative, LlmError> {
    let prompt = generator
        .complete(&prompts::prompt_instruction(description), &DERIVATION_OPTIONS)
        .await?;

    let lyrics = if instrumental {
        INSTRUMENTAL_PLACEHOLDER.to_string()
    } else {
        generator
            .complete(&prompts::lyrics_instruction(description), &DERIVATION_OPTIONS)
            .await?
    };

    let genre_response = generator
        .complete(&prompts::genre_instruction(description), &DERIVATION_OPTIONS)
        .await?;
    let genre_tags = split_genre_tags(&genre_response);

    debug!(
        prompt_len = prompt.len(),
        lyrics_len = lyrics.len(),
        genres = genre_tags.len(),
        "Derived creative inputs"
    );

    Ok(DerivedCreative {
        prompt,
        lyrics,
        genre_tags,
    })
}

/// Split a genre response on commas.
///
/// Entries are trimmed and empty or whitespace-only entries discarded;
/// order is preserved as returned by the model. No deduplication.
pub fn split_genre_tags(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Generator that replays canned responses and records instructions.
    struct ScriptedGenerator {
        responses: Mutex<VecDeque<String>>,
        instructions: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                instructions: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.instructions.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            instruction: &str,
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            self.instructions
                .lock()
                .unwrap()
                .push(instruction.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::InvalidResponse("Out of scripted responses".to_string()))
        }

        async fn health_check(&self) -> Result<(), LlmError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn instrumental_skips_lyrics_call() {
        let generator = ScriptedGenerator::new(&["dreamy synthwave", "pop, synthwave"]);

        let creative = derive(&generator, "sad piano ballad", true).await.unwrap();

        assert_eq!(creative.lyrics, INSTRUMENTAL_PLACEHOLDER);
        // Only the prompt and genre calls went to the generator.
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn non_instrumental_lyrics_come_from_generator() {
        let generator = ScriptedGenerator::new(&[
            "upbeat pop, major key",
            "[verse]\nwalking down the street",
            "pop, dance",
        ]);

        let creative = derive(&generator, "happy pop song", false).await.unwrap();

        assert_eq!(creative.prompt, "upbeat pop, major key");
        assert_eq!(creative.lyrics, "[verse]\nwalking down the street");
        assert_ne!(creative.lyrics, INSTRUMENTAL_PLACEHOLDER);
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn degenerate_lyrics_response_propagates() {
        // No validation layer: an empty lyrics completion is kept as-is.
        let generator = ScriptedGenerator::new(&["some prompt", "", "pop"]);

        let creative = derive(&generator, "happy pop song", false).await.unwrap();

        assert_eq!(creative.lyrics, "");
    }

    #[tokio::test]
    async fn generator_failure_propagates() {
        let generator = ScriptedGenerator::new(&[]);

        let result = derive(&generator, "happy pop song", false).await;

        assert!(result.is_err());
    }

    #[test]
    fn genre_tags_are_trimmed_and_filtered() {
        let tags = split_genre_tags(" pop,  , rock , jazz,");
        assert_eq!(tags, vec!["pop", "rock", "jazz"]);
    }

    #[test]
    fn genre_tag_order_is_preserved() {
        let tags = split_genre_tags("synthwave, electronic, pop");
        assert_eq!(tags, vec!["synthwave", "electronic", "pop"]);
    }

    #[test]
    fn empty_genre_response_yields_empty_list() {
        // Known gap: a degenerate response produces zero tags rather
        // than an error.
        assert!(split_genre_tags("").is_empty());
        assert!(split_genre_tags("  ,  ,").is_empty());
    }
}
