//! Reshaping of free-text provider output into structured records.

use serde::Serialize;

/// Source label attached to every question extracted from an upload.
pub const UPLOADED_DOCUMENT_SOURCE: &str = "Uploaded Document";

const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";
const LIST_MARKERS: &[char] = &['-', '•', '*', ' '];

/// Question record returned to the front-end.
///
/// `frequency` is not computed: every record carries `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    /// Question text with list markers removed.
    pub question: String,
    /// Always `1`.
    pub frequency: u32,
    /// Always `["Uploaded Document"]`.
    pub sources: Vec<String>,
}

/// Placeholder image for a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordImage {
    /// Keyword the image stands for.
    pub alt: String,
    /// Placeholder image URL rendering the keyword.
    pub url: String,
}

/// Strip list markers (`-`, `•`, `*`, spaces) from both ends, then surrounding whitespace.
///
/// Markdown emphasis around a whole item (`* **ATP**`) goes too; interior text is untouched.
pub fn strip_list_marker(line: &str) -> &str {
    line.trim().trim_matches(LIST_MARKERS).trim()
}

/// Split provider text into lines, strip list markers, and drop blank lines.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Wrap each non-blank line of a question list as a [`QuestionRecord`].
pub fn wrap_questions(text: &str) -> Vec<QuestionRecord> {
    normalize_lines(text)
        .into_iter()
        .map(|question| QuestionRecord {
            question,
            frequency: 1,
            sources: vec![UPLOADED_DOCUMENT_SOURCE.to_string()],
        })
        .collect()
}

/// Extract keywords from a provider list. The requested 3-5 bound is not enforced.
pub fn parse_keywords(text: &str) -> Vec<String> {
    normalize_lines(text)
}

/// Build a placeholder image record for every keyword.
pub fn keyword_images(keywords: &[String]) -> Vec<KeywordImage> {
    keywords
        .iter()
        .map(|keyword| KeywordImage {
            alt: keyword.clone(),
            url: format!(
                "{PLACEHOLDER_IMAGE_URL}?text={}",
                urlencoding::encode(keyword).replace("%20", "+")
            ),
        })
        .collect()
}
