// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flex Message payload checks.
//!
//! Structural only: the container and block types are checked, component
//! properties are passed through untouched.

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumString};

use lineoa_core::LineOaError;

/// Upper bound on bubbles in one carousel.
pub const MAX_CAROUSEL_BUBBLES: usize = 12;

/// Starting payload for the editor.
pub const SAMPLE_BUBBLE: &str = r##"{
  "type": "bubble",
  "hero": {
    "type": "image",
    "url": "https://picsum.photos/700/400",
    "size": "full",
    "aspectRatio": "20:13",
    "aspectMode": "cover"
  },
  "body": {
    "type": "box",
    "layout": "vertical",
    "contents": [
      {
        "type": "text",
        "text": "Brown Cafe",
        "weight": "bold",
        "size": "xl"
      },
      {
        "type": "box",
        "layout": "vertical",
        "margin": "lg",
        "spacing": "sm",
        "contents": [
          {
            "type": "box",
            "layout": "baseline",
            "spacing": "sm",
            "contents": [
              {
                "type": "text",
                "text": "Place",
                "color": "#aaaaaa",
                "size": "sm",
                "flex": 1
              },
              {
                "type": "text",
                "text": "Miraina Tower, 4-1-6 Shinjuku, Tokyo",
                "wrap": true,
                "color": "#666666",
                "size": "sm",
                "flex": 5
              }
            ]
          }
        ]
      }
    ]
  }
}"##;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FlexContainer {
    Bubble,
    Carousel,
}

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlexReport {
    pub container: FlexContainer,
    pub bubbles: usize,
    pub pretty: String,
}

const BUBBLE_BLOCKS: [&str; 4] = ["header", "hero", "body", "footer"];
const COMPONENT_TYPES: [&str; 9] = [
    "box", "button", "image", "video", "icon", "text", "span", "separator", "filler",
];

/// Parses and checks `input`, returning the pretty-printed payload.
pub fn validate(input: &str) -> Result<FlexReport, LineOaError> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| LineOaError::Validation(format!("invalid JSON: {e}")))?;

    let mut issues = Vec::new();
    let (container, bubbles) = match value.get("type").and_then(Value::as_str) {
        Some("bubble") => {
            check_bubble(&value, "$", &mut issues);
            (FlexContainer::Bubble, 1)
        }
        Some("carousel") => (FlexContainer::Carousel, check_carousel(&value, &mut issues)),
        Some(other) => {
            return Err(LineOaError::Validation(format!(
                "root type must be 'bubble' or 'carousel', got '{other}'"
            )));
        }
        None => {
            return Err(LineOaError::Validation(
                "root must be an object with a 'type' field".to_string(),
            ));
        }
    };

    if !issues.is_empty() {
        return Err(LineOaError::Validation(issues.join("; ")));
    }
    Ok(FlexReport {
        container,
        bubbles,
        pretty: serde_json::to_string_pretty(&value)?,
    })
}

/// Re-indents valid JSON without checking Flex structure.
pub fn pretty_print(input: &str) -> Result<String, LineOaError> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| LineOaError::Validation(format!("invalid JSON: {e}")))?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn check_carousel(value: &Value, issues: &mut Vec<String>) -> usize {
    let Some(contents) = value.get("contents").and_then(Value::as_array) else {
        issues.push("$.contents: carousel needs a 'contents' array".to_string());
        return 0;
    };
    if contents.is_empty() {
        issues.push("$.contents: carousel needs at least one bubble".to_string());
    }
    if contents.len() > MAX_CAROUSEL_BUBBLES {
        issues.push(format!(
            "$.contents: carousel holds at most {MAX_CAROUSEL_BUBBLES} bubbles, got {}",
            contents.len()
        ));
    }
    for (i, bubble) in contents.iter().enumerate() {
        let path = format!("$.contents[{i}]");
        if bubble.get("type").and_then(Value::as_str) == Some("bubble") {
            check_bubble(bubble, &path, issues);
        } else {
            issues.push(format!("{path}: carousel contents must be bubbles"));
        }
    }
    contents.len()
}

fn check_bubble(bubble: &Value, path: &str, issues: &mut Vec<String>) {
    let present: Vec<_> = BUBBLE_BLOCKS
        .iter()
        .filter_map(|name| bubble.get(*name).map(|b| (*name, b)))
        .collect();
    if present.is_empty() {
        issues.push(format!("{path}: bubble has no header, hero, body or footer"));
    }
    for (name, block) in present {
        let block_path = format!("{path}.{name}");
        // Only the hero may be something other than a box.
        if name != "hero" && block.get("type").and_then(Value::as_str) != Some("box") {
            issues.push(format!("{block_path}: must be a box"));
            continue;
        }
        check_component(block, &block_path, issues);
    }
}

fn check_component(component: &Value, path: &str, issues: &mut Vec<String>) {
    let Some(kind) = component.get("type").and_then(Value::as_str) else {
        issues.push(format!("{path}: component has no type"));
        return;
    };
    if !COMPONENT_TYPES.contains(&kind) {
        issues.push(format!("{path}: unknown component type '{kind}'"));
        return;
    }
    match kind {
        "box" => {
            if component.get("layout").and_then(Value::as_str).is_none() {
                issues.push(format!("{path}: box needs a layout"));
            }
            match component.get("contents").and_then(Value::as_array) {
                Some(children) => {
                    for (i, child) in children.iter().enumerate() {
                        check_component(child, &format!("{path}.contents[{i}]"), issues);
                    }
                }
                None => issues.push(format!("{path}: box needs a 'contents' array")),
            }
        }
        "text" if component.get("text").is_none() && component.get("contents").is_none() => {
            issues.push(format!("{path}: text needs 'text' or 'contents'"));
        }
        "image" | "icon" if component.get("url").and_then(Value::as_str).is_none() => {
            issues.push(format!("{path}: {kind} needs a url"));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_bubble_is_valid() {
        let report = validate(SAMPLE_BUBBLE).unwrap();
        assert_eq!(report.container, FlexContainer::Bubble);
        assert_eq!(report.bubbles, 1);
        assert!(report.pretty.contains("Brown Cafe"));
    }

    #[test]
    fn carousel_of_bubbles_is_valid() {
        let payload = format!(r#"{{"type":"carousel","contents":[{SAMPLE_BUBBLE},{SAMPLE_BUBBLE}]}}"#);
        let report = validate(&payload).unwrap();
        assert_eq!(report.container, FlexContainer::Carousel);
        assert_eq!(report.bubbles, 2);
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let err = validate("{\"type\": ").unwrap_err();
        assert!(matches!(err, LineOaError::Validation(m) if m.starts_with("invalid JSON")));
    }

    #[test]
    fn unknown_root_type_is_rejected() {
        let err = validate(r#"{"type":"box","layout":"vertical","contents":[]}"#).unwrap_err();
        assert!(err.to_string().contains("'box'"));
    }

    #[test]
    fn carousel_rejects_non_bubbles_and_empty_contents() {
        assert!(validate(r#"{"type":"carousel","contents":[]}"#).is_err());
        let err = validate(r#"{"type":"carousel","contents":[{"type":"text","text":"x"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("$.contents[0]"));
    }

    #[test]
    fn nested_problems_are_all_reported() {
        let payload = r#"{
            "type": "bubble",
            "body": {"type": "box", "layout": "vertical", "contents": [
                {"type": "text"},
                {"type": "sticker"}
            ]},
            "footer": {"type": "text", "text": "x"}
        }"#;
        let msg = validate(payload).unwrap_err().to_string();
        assert!(msg.contains("$.body.contents[0]"));
        assert!(msg.contains("'sticker'"));
        assert!(msg.contains("$.footer: must be a box"));
    }

    #[test]
    fn pretty_print_reindents() {
        let out = pretty_print(r#"{"a":[1,2]}"#).unwrap();
        assert_eq!(out, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }
}
