//! Surgical XML attribute edits for AndroidManifest.xml
//!
//! These are deliberately text-level transforms, not DOM operations: the
//! generated manifest must keep its exact original formatting and comments
//! so the diff against what Capacitor scaffolded stays minimal. A full XML
//! parse-and-reserialize would reformat unrelated content.

use crate::{HookError, HookResult};

/// Columns per nesting level when inferring the depth of an opening tag
const INDENT_COLUMNS: usize = 4;

/// Indentation unit for an inserted attribute line
const ATTRIBUTE_INDENT: &str = "\t\t";

/// Insert an attribute into the opening tag of the first `<element` in the
/// document, one indentation level deeper than the tag itself.
///
/// Idempotent by raw substring match: if `attribute` already occurs anywhere
/// in `xml`, the input is returned byte-for-byte. Any attribute that was
/// written inline on the tag line is reflowed onto its own line at the same
/// indentation, below the inserted one; a bare `>` closing the tag stays
/// where it is.
///
/// Fails with [`HookError::ElementNotFound`] when the element is absent.
pub fn insert_attribute(element: &str, attribute: &str, xml: &str) -> HookResult<String> {
    if xml.contains(attribute) {
        return Ok(xml.to_string());
    }

    let open_tag = format!("<{element}");
    let tag_start = xml
        .find(&open_tag)
        .ok_or_else(|| HookError::ElementNotFound {
            element: element.to_string(),
        })?;
    let name_end = tag_start + open_tag.len();

    let line_end = xml[name_end..]
        .find('\n')
        .map(|i| name_end + i)
        .unwrap_or(xml.len());
    let trailing_inline = &xml[name_end..line_end];

    // Column offset of the '<' since the preceding newline, -1 when the tag
    // opens the document
    let preceding_newline = xml[..tag_start].rfind('\n').map(|i| i as isize).unwrap_or(-1);
    let depth = ((tag_start as isize - preceding_newline) as usize) / INDENT_COLUMNS;
    let indentation = ATTRIBUTE_INDENT.repeat(depth + 1);

    let trimmed = trailing_inline.trim();
    let mut out = String::with_capacity(xml.len() + attribute.len() + indentation.len() * 2 + 4);

    if trimmed.is_empty() || trimmed == ">" {
        // Nothing shares the tag line; keep it intact and add the attribute
        // on its own line below
        out.push_str(&xml[..line_end]);
        out.push('\n');
        out.push_str(&indentation);
        out.push_str(attribute);
        out.push_str(&xml[line_end..]);
    } else {
        // Reflow the inline attribute(s) onto their own line below the
        // inserted one
        out.push_str(&xml[..name_end]);
        out.push('\n');
        out.push_str(&indentation);
        out.push_str(attribute);
        out.push('\n');
        out.push_str(&indentation);
        out.push_str(trimmed);
        out.push_str(&xml[line_end..]);
    }

    Ok(out)
}

/// Remove a whole attribute line (tabs, the attribute, the newline) from the
/// document, undoing a prior [`insert_attribute`].
///
/// Leaves the document untouched when no such line exists.
pub fn remove_attribute_line(attribute: &str, xml: &str) -> String {
    let mut search_from = 0;
    while let Some(found) = xml[search_from..].find(attribute) {
        let attr_start = search_from + found;
        let line_start = xml[..attr_start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let attr_end = attr_start + attribute.len();

        // The line must hold only tab indentation before the attribute and
        // end right after it
        let only_tabs_before = xml[line_start..attr_start].bytes().all(|b| b == b'\t');
        let ends_with_newline = xml[attr_end..].starts_with('\n');

        if only_tabs_before && ends_with_newline {
            let mut out = String::with_capacity(xml.len());
            out.push_str(&xml[..line_start]);
            out.push_str(&xml[attr_end + 1..]);
            return out;
        }

        search_from = attr_end;
    }

    xml.to_string()
}
