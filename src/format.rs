use chrono::Local;
use std::panic::Location;

use crate::error::FormatError;
use crate::payload::Payload;
use crate::render::render;

const SECTION_RULE: &str = "========================";
const DATA_RULE: &str = "--------------";

/// Build the DEBUG description for an entry.
///
/// The header names `call_site` (the public logging call) and the local
/// time, followed by the original description. Each payload is rendered
/// under a `==> Data <index>` label. On failure the error carries the text
/// built up to the failing payload.
pub fn format_debug(
    description: &str,
    array_threshold: usize,
    payloads: Vec<Payload>,
    call_site: &Location<'_>,
) -> Result<String, FormatError> {
    let mut out = format!(
        "{} {}:{}: ===> {}\n{}",
        Local::now().format("%Y/%m/%d %H:%M:%S"),
        call_site.file(),
        call_site.line(),
        description,
        SECTION_RULE,
    );

    if payloads.is_empty() {
        return Ok(out);
    }
    out.push('\n');

    for (index, payload) in payloads.into_iter().enumerate() {
        let rendered = match render(payload, array_threshold) {
            Ok(rendered) => rendered,
            Err(source) => {
                return Err(FormatError {
                    index,
                    partial: out,
                    source,
                })
            }
        };
        out.push_str(DATA_RULE);
        out.push('\n');
        out.push_str(&format!("==> Data {}: {}\n", index, rendered));
    }

    out.push_str(DATA_RULE);
    out.push('\n');
    out.push_str(SECTION_RULE);
    Ok(out)
}
