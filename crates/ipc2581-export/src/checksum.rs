use base64::{Engine as _, engine::general_purpose::STANDARD};
use md5::{Digest, Md5};

use crate::{ExportError, Result};

const OPEN_TAG: &str = "<IPC-2581";
const CLOSE_TAG: &str = "</IPC-2581>";

/// Base64 MD5 digest of the document from `<IPC-2581` through `</IPC-2581>`
pub fn document_checksum(xml: &str) -> Result<String> {
    let (start, end) = document_span(xml)?;
    let mut hasher = Md5::new();
    hasher.update(xml[start..end].as_bytes());
    Ok(STANDARD.encode(hasher.finalize()))
}

/// Append the checksum on the line after the closing tag
///
/// Anything already following the closing tag is replaced.
pub fn append_checksum(xml: &mut String) -> Result<()> {
    let checksum = document_checksum(xml)?;
    let (_, end) = document_span(xml)?;
    xml.truncate(end);
    xml.push('\n');
    xml.push_str(&checksum);
    xml.push('\n');
    Ok(())
}

fn document_span(xml: &str) -> Result<(usize, usize)> {
    let start = xml
        .find(OPEN_TAG)
        .ok_or(ExportError::MissingTag(OPEN_TAG))?;
    let end = xml
        .rfind(CLOSE_TAG)
        .ok_or(ExportError::MissingTag(CLOSE_TAG))?
        + CLOSE_TAG.len();
    Ok((start, end))
}
