use serde::{Deserialize, Serialize};

/// One run of decoded text at a fixed baseline, in page space (origin
/// bottom-left, Y upward). `width` approximates the run's horizontal extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedTextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: usize,
    pub creator: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_json_shape() {
        let item: PositionedTextItem =
            serde_json::from_str(r#"{"text":"Cover","x":1.5,"y":700,"width":30}"#).unwrap();
        assert_eq!(item.text, "Cover");
        assert_eq!(item.y, 700.0);
    }
}
