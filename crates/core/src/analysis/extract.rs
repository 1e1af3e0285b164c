use serde_json::Value;

use super::validate::ClassificationError;

/// The JSON container a prompt asked the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Object => ('{', '}'),
            JsonShape::Array => ('[', ']'),
        }
    }

    fn name(self) -> &'static str {
        match self {
            JsonShape::Object => "object",
            JsonShape::Array => "array",
        }
    }
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` fence and its closing fence.
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let rest = rest.strip_prefix('\n').unwrap_or(rest);

    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.strip_suffix('\n').unwrap_or(rest)
}

/// Pull a JSON value out of a free-form model response.
///
/// The fenced body is parsed first; failing that, the outermost
/// `{...}` or `[...]` span (first opener to last closer) is tried.
pub fn extract_json(response: &str, shape: JsonShape) -> Result<Value, ClassificationError> {
    let body = strip_code_fence(response);
    if let Ok(value) = serde_json::from_str(body) {
        return Ok(value);
    }

    let (open, close) = shape.delimiters();
    let embedded = match (body.find(open), body.rfind(close)) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => return Err(ClassificationError::UnparsableResponse(shape.name())),
    };

    log::debug!("parsing embedded JSON {} from model response", shape.name());
    serde_json::from_str(embedded).map_err(|_| ClassificationError::UnparsableResponse(shape.name()))
}
