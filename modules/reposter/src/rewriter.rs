use std::sync::Arc;

use tracing::{debug, warn};

use ai_client::truncate_to_char_boundary;

use crate::traits::CaptionModel;

/// Hard cap on a post's text length on the publishing service.
pub const MAX_POST_CHARS: usize = 280;

const CAPTION_INSTRUCTION: &str = "\
You rewrite Reddit post titles into captions for an X (Twitter) post.

The caption must:
1. Be attention-grabbing and engaging
2. Use SEO-friendly keywords
3. Be brief; casual language and mild profanity are fine
4. Be under 200 characters
5. Keep the original meaning while making it more compelling
6. Avoid clickbait and sensationalism
7. Read in a natural, conversational tone

Respond with only the caption.";

/// Turns a raw title into a publish-ready caption. Never fails: any problem yields the title.
pub struct CaptionRewriter {
    model: Arc<dyn CaptionModel>,
}

impl CaptionRewriter {
    pub fn new(model: Arc<dyn CaptionModel>) -> Self {
        Self { model }
    }

    pub async fn rewrite(&self, original_title: &str) -> String {
        match self.model.complete(CAPTION_INSTRUCTION, original_title).await {
            Ok(raw) => match clean_caption(&raw) {
                Some(caption) => {
                    debug!(original = original_title, caption = caption.as_str(), "Caption rewritten");
                    caption
                }
                None => {
                    warn!(original = original_title, "Model returned an empty caption, using original title");
                    original_title.to_string()
                }
            },
            Err(e) => {
                warn!(error = %e, "Error rewriting caption, using original title");
                original_title.to_string()
            }
        }
    }
}

/// Trim whitespace and wrapping quotes, then cap at the post length. `None` if nothing is left.
fn clean_caption(raw: &str) -> Option<String> {
    let mut text = raw.trim();
    for (open, close) in [('"', '"'), ('“', '”')] {
        if text.chars().count() >= 2 && text.starts_with(open) && text.ends_with(close) {
            text = text[open.len_utf8()..text.len() - close.len_utf8()].trim();
        }
    }
    if text.is_empty() {
        return None;
    }
    Some(truncate_to_char_boundary(text, MAX_POST_CHARS).trim_end().to_string())
}
