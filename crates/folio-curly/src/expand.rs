//! The curly expansion algorithm.
//!
//! The scanner finds the first top-level block in a string, tracking
//! open/close balance so nested blocks (including nested blocks of the same
//! name) stay attached to the right close tag. Expansion then resolves the
//! matched block's content, hands it to the handler, and recurses over the
//! rest of the string.
//!
//! A malformed open tag (no name, or no matching close, or a close tag that
//! does not match the innermost open) is not treated as a block; the scanner
//! resumes at the next open tag, and text that never forms a block passes
//! through literally.

use folio_core::{CurlyError, PageId};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::registry::CurlyRegistry;

const OPEN_MARK: &str = "{{#";
const CLOSE_MARK: &str = "{{/";
const TAG_END: &str = "}}";

/// The first top-level block in a string, as byte offsets into it.
struct Block<'a> {
    name: &'a str,
    /// Offset of the open tag.
    start: usize,
    content_start: usize,
    content_end: usize,
    /// Offset just past the close tag.
    end: usize,
}

fn find_from(input: &str, pos: usize, pattern: &str) -> Option<usize> {
    input[pos..].find(pattern).map(|index| index + pos)
}

/// Reads the tag starting at `tag_start` (which must point at `mark`);
/// returns the block name and the offset just past the tag's `}}`.
fn read_tag<'a>(input: &'a str, tag_start: usize, mark: &str) -> Option<(&'a str, usize)> {
    let name_start = tag_start + mark.len();
    let name_end = find_from(input, name_start, TAG_END)?;
    let name = &input[name_start..name_end];
    if name.is_empty() || name.contains("{{") {
        return None;
    }
    Some((name, name_end + TAG_END.len()))
}

/// Finds the first top-level block, or `None` when the string contains no
/// well-formed block. A malformed open-mark occurrence does not hide later
/// blocks; the search resumes past it.
fn first_block(input: &str) -> Option<Block<'_>> {
    let mut search = 0;
    while let Some(start) = find_from(input, search, OPEN_MARK) {
        if let Some(block) = block_at(input, start) {
            return Some(block);
        }
        search = start + OPEN_MARK.len();
    }
    None
}

/// Reads the block whose open tag sits at `start`, or `None` when what sits
/// there is not a complete, balanced block.
fn block_at(input: &str, start: usize) -> Option<Block<'_>> {
    let (name, content_start) = read_tag(input, start, OPEN_MARK)?;

    // Walk the remaining tags keeping an open-block stack; the close that
    // empties the stack is ours.
    let mut stack = vec![name];
    let mut pos = content_start;
    loop {
        let next_close = find_from(input, pos, CLOSE_MARK)?;
        let next_open = find_from(input, pos, OPEN_MARK);
        if next_open.is_some_and(|open| open < next_close) {
            let (inner_name, after) = read_tag(input, next_open?, OPEN_MARK)?;
            stack.push(inner_name);
            pos = after;
        } else {
            let (close_name, after) = read_tag(input, next_close, CLOSE_MARK)?;
            if stack.pop() != Some(close_name) {
                return None;
            }
            if stack.is_empty() {
                return Some(Block {
                    name,
                    start,
                    content_start,
                    content_end: next_close,
                    end: after,
                });
            }
            pos = after;
        }
    }
}

/// Expands every curly block in `input` against `registry`.
///
/// Inner blocks resolve before their enclosing handler runs; handler output
/// is spliced in verbatim and never re-scanned, so fully resolved strings
/// are fixpoints. Any handler error aborts the whole expansion; no
/// partially substituted string is returned.
pub async fn expand(
    registry: &CurlyRegistry,
    page_id: &PageId,
    input: &str,
) -> Result<String, CurlyError> {
    expand_string(registry, page_id, input.to_string()).await
}

fn expand_string<'a>(
    registry: &'a CurlyRegistry,
    page_id: &'a PageId,
    input: String,
) -> BoxFuture<'a, Result<String, CurlyError>> {
    async move {
        let Some(block) = first_block(&input) else {
            return Ok(input);
        };
        let name = block.name.to_string();
        let (start, content_start, content_end, end) =
            (block.start, block.content_start, block.content_end, block.end);

        let handler = registry.get(&name).cloned().ok_or_else(|| {
            let error = CurlyError::UndefinedBlock { name: name.clone() };
            tracing::error!(%error, "curly expansion failed");
            error
        })?;

        // Inner blocks first, then the handler, then the rest of the string.
        let content =
            expand_string(registry, page_id, input[content_start..content_end].to_string())
                .await?;
        let rendered = handler.render(page_id, &content).await?;
        let suffix = expand_string(registry, page_id, input[end..].to_string()).await?;

        let mut out = String::with_capacity(start + rendered.len() + suffix.len());
        out.push_str(&input[..start]);
        out.push_str(&rendered);
        out.push_str(&suffix);
        Ok(out)
    }
    .boxed()
}
