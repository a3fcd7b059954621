//! Star-story rules: the constraints a submitted story must satisfy.
//!
//! A story is limited to 250 space-delimited words, 500 bytes, and 7-bit
//! ASCII. Each clause has its own error variant so rejections name the rule
//! that was broken.

use thiserror::Error;

/// Maximum number of space-delimited words in a story.
pub const MAX_STORY_WORDS: usize = 250;

/// Maximum story length in bytes.
pub const MAX_STORY_BYTES: usize = 500;

/// A story rule violation. Surfaced verbatim to the caller, never coerced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryError {
    #[error("story has {count} words, maximum is {max}")]
    TooManyWords { count: usize, max: usize },

    #[error("story is {bytes} bytes, maximum is {max}")]
    TooLong { bytes: usize, max: usize },

    #[error("story contains a non-ASCII character at byte {position}")]
    NonAscii { position: usize },
}

/// Check a story against all three clauses.
pub fn validate_story(story: &str) -> Result<(), StoryError> {
    let count = story.split_whitespace().count();
    if count > MAX_STORY_WORDS {
        return Err(StoryError::TooManyWords {
            count,
            max: MAX_STORY_WORDS,
        });
    }

    let bytes = story.len();
    if bytes > MAX_STORY_BYTES {
        return Err(StoryError::TooLong {
            bytes,
            max: MAX_STORY_BYTES,
        });
    }

    if let Some(position) = story.bytes().position(|b| !b.is_ascii()) {
        return Err(StoryError::NonAscii { position });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_story() {
        assert_eq!(validate_story("Found star using a telescope"), Ok(()));
        assert_eq!(validate_story(""), Ok(()));
    }

    #[test]
    fn test_exactly_250_words_ok() {
        let story = vec!["w"; 250].join(" ");
        assert_eq!(validate_story(&story), Ok(()));
    }

    #[test]
    fn test_251_words_rejected() {
        let story = vec!["w"; 251].join(" ");
        assert_eq!(
            validate_story(&story),
            Err(StoryError::TooManyWords {
                count: 251,
                max: 250
            })
        );
    }

    #[test]
    fn test_over_500_bytes_rejected() {
        // One word so only the byte clause can trip.
        let story = "x".repeat(501);
        assert_eq!(
            validate_story(&story),
            Err(StoryError::TooLong {
                bytes: 501,
                max: 500
            })
        );
    }

    #[test]
    fn test_exactly_500_bytes_ok() {
        let story = "x".repeat(500);
        assert_eq!(validate_story(&story), Ok(()));
    }

    #[test]
    fn test_non_ascii_rejected_even_when_short() {
        let result = validate_story("a café story");
        assert!(matches!(result, Err(StoryError::NonAscii { .. })));
    }

    #[test]
    fn test_non_ascii_position_reported() {
        assert_eq!(
            validate_story("ab\u{00e9}"),
            Err(StoryError::NonAscii { position: 2 })
        );
    }
}
