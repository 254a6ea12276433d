//! Question answering over a built [`DocIndex`].
//!
//! Retrieval is plain case-insensitive substring containment. The first
//! matching page in crawl order wins; nothing is ranked.

use cdpdocs_crawler::CrawledPage;
use cdpdocs_shared::Platform;

use crate::index::DocIndex;

/// Reply when a question names no known platform.
pub const SPECIFY_PLATFORM: &str =
    "Please specify which CDP you are asking about (Segment, mParticle, Lytics, or Zeotap).";

/// Driver reply for input unrelated to any platform.
pub const OUT_OF_SCOPE: &str =
    "I can only answer questions about Segment, mParticle, Lytics, or Zeotap.";

/// Reply when [`QueryEngine::compare`] is called without the `compare` keyword.
pub const NOT_A_COMPARISON: &str = "This is not a comparison question";

/// Placeholder for a platform with no match in a comparison.
pub const NO_INFORMATION: &str = "No information found.";

/// Characters of context returned by [`QueryEngine::answer`].
pub const ANSWER_WINDOW: usize = 500;

/// Characters of each platform's snippet in [`QueryEngine::compare`].
pub const COMPARE_SNIPPET: usize = 200;

const COMPARE_KEYWORD: &str = "compare";

/// Read-only query interface over an index.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    index: &'a DocIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a DocIndex) -> Self {
        Self { index }
    }

    /// Every page of `platform`, in stored order, whose text contains `query`
    /// ignoring case.
    pub fn search(&self, platform: Platform, query: &str) -> Vec<&'a CrawledPage> {
        let needle = fold_case(query);
        self.index
            .pages(platform)
            .filter(|page| fold_case(&page.text).contains(&needle))
            .collect()
    }

    /// Answer a question about the single platform it names.
    ///
    /// Returns up to [`ANSWER_WINDOW`] characters of the first matching page,
    /// starting at the first occurrence of the question, followed by the
    /// page URL.
    pub fn answer(&self, question: &str) -> String {
        let question = fold_case(question);

        let Some(platform) = Platform::detect(&question) else {
            return SPECIFY_PLATFORM.to_string();
        };

        let results = self.search(platform, &question);
        let Some(first) = results.first() else {
            return format!(
                "Sorry, I couldn't find information related to your question in {platform} documentation."
            );
        };

        let start = find_ignore_case(&first.text, &question).unwrap_or(0);
        let context = take_chars(&first.text[start..], ANSWER_WINDOW);

        format!(
            "Here's some information from {platform} documentation:\n\n{context}...\n\n\
             For more details, please visit: {}",
            first.url
        )
    }

    /// Side-by-side report with one section per platform, always in
    /// [`Platform::ALL`] order regardless of which platforms the question names.
    pub fn compare(&self, question: &str) -> String {
        if !fold_case(question).contains(COMPARE_KEYWORD) {
            return NOT_A_COMPARISON.to_string();
        }

        let mut report = String::from("Here's a comparison:\n\n");
        for platform in Platform::ALL {
            let section = match self.search(platform, question).first() {
                Some(page) => format!("{}...", take_chars(&page.text, COMPARE_SNIPPET)),
                None => NO_INFORMATION.to_string(),
            };
            report.push_str(&format!("{platform}: {section}\n\n"));
        }
        report
    }

    /// Route one line of user input the way the interactive driver does.
    ///
    /// Input naming no platform is refused, even if it asks for a comparison.
    pub fn respond(&self, input: &str) -> String {
        if !Platform::mentioned_in(input) {
            OUT_OF_SCOPE.to_string()
        } else if fold_case(input).contains(COMPARE_KEYWORD) {
            self.compare(input)
        } else {
            self.answer(input)
        }
    }
}

// ---------------------------------------------------------------------------
// Case-insensitive helpers
// ---------------------------------------------------------------------------

/// Lowercase `text` one character at a time.
fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Byte offset in `haystack` where `needle_folded` first occurs, comparing
/// against [`fold_case`] of `haystack`.
///
/// Lowercasing can change a character's encoded length, so the match position
/// is mapped back to the original character that produced it.
fn find_ignore_case(haystack: &str, needle_folded: &str) -> Option<usize> {
    let mut folded = String::with_capacity(haystack.len());
    let mut origin = Vec::with_capacity(haystack.len());

    for (offset, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            let before = folded.len();
            folded.push(lower);
            origin.extend(std::iter::repeat_n(offset, folded.len() - before));
        }
    }

    let pos = folded.find(needle_folded)?;
    Some(origin.get(pos).copied().unwrap_or(haystack.len()))
}

/// At most `n` characters from the start of `text`.
fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
