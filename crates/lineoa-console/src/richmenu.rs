// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rich menu templates and draft validation.
//!
//! Drafts are checked locally and can be rendered into the Messaging API's
//! rich menu object. Nothing here uploads or links a menu.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::{Display, EnumString};

use lineoa_core::LineOaError;

pub const DEFAULT_MENU_NAME: &str = "Menu A";
pub const DEFAULT_CHAT_BAR_TEXT: &str = "เมนูหลัก";

/// LINE limits.
pub const MAX_NAME_CHARS: usize = 300;
pub const MAX_CHAT_BAR_CHARS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MenuSize {
    Large,
    Compact,
}

impl MenuSize {
    /// Required background image size in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Large => (2500, 1686),
            Self::Compact => (2500, 843),
        }
    }
}

/// A fixed area layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub size: MenuSize,
    pub columns: u32,
    pub rows: u32,
}

impl MenuTemplate {
    pub fn areas(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// `A`, `B`, … in row-major order.
    pub fn area_labels(&self) -> Vec<char> {
        (0..self.areas()).map(area_label).collect()
    }

    /// Pixel bounds `(x, y, width, height)` of area `index`.
    fn bounds(&self, index: usize) -> (u32, u32, u32, u32) {
        let (w, h) = self.size.dimensions();
        let cell_w = w / self.columns;
        let cell_h = h / self.rows;
        let col = index as u32 % self.columns;
        let row = index as u32 / self.columns;
        // Last column/row absorbs the rounding remainder.
        let width = if col + 1 == self.columns { w - cell_w * col } else { cell_w };
        let height = if row + 1 == self.rows { h - cell_h * row } else { cell_h };
        (cell_w * col, cell_h * row, width, height)
    }
}

pub const TEMPLATES: [MenuTemplate; 4] = [
    MenuTemplate {
        id: "compact-2",
        name: "Compact (2 Areas)",
        size: MenuSize::Compact,
        columns: 2,
        rows: 1,
    },
    MenuTemplate {
        id: "large-6",
        name: "Large (6 Areas)",
        size: MenuSize::Large,
        columns: 3,
        rows: 2,
    },
    MenuTemplate {
        id: "large-4",
        name: "Large (4 Areas)",
        size: MenuSize::Large,
        columns: 2,
        rows: 2,
    },
    MenuTemplate {
        id: "large-1",
        name: "Large (1 Area)",
        size: MenuSize::Large,
        columns: 1,
        rows: 1,
    },
];

pub fn templates() -> &'static [MenuTemplate] {
    &TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static MenuTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

fn area_label(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// What tapping an area does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AreaAction {
    /// Sends `text` as if the user typed it.
    Message { text: String },
    Link { uri: String },
    /// Sends the coupon code as a message.
    Coupon { code: String },
}

impl AreaAction {
    fn issue(&self) -> Option<&'static str> {
        match self {
            Self::Message { text } if text.trim().is_empty() => Some("message text is empty"),
            Self::Link { uri } if !(uri.starts_with("https://") || uri.starts_with("http://")) => {
                Some("link must be an http(s) URL")
            }
            Self::Coupon { code } if code.trim().is_empty() => Some("coupon code is empty"),
            _ => None,
        }
    }

    fn to_line_action(&self, label: char) -> Value {
        match self {
            Self::Message { text } => json!({"type": "message", "label": label.to_string(), "text": text}),
            Self::Link { uri } => json!({"type": "uri", "label": label.to_string(), "uri": uri}),
            Self::Coupon { code } => json!({"type": "message", "label": label.to_string(), "text": code}),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichMenuDraft {
    pub name: String,
    pub chat_bar_text: String,
    pub template_id: String,
    /// One per area, in label order.
    #[serde(default)]
    pub actions: Vec<AreaAction>,
}

impl Default for RichMenuDraft {
    fn default() -> Self {
        Self {
            name: DEFAULT_MENU_NAME.to_string(),
            chat_bar_text: DEFAULT_CHAT_BAR_TEXT.to_string(),
            template_id: "large-6".to_string(),
            actions: Vec::new(),
        }
    }
}

impl RichMenuDraft {
    /// Every problem with the draft. Empty means valid.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len == 0 {
            issues.push("menu name must not be empty".to_string());
        } else if name_len > MAX_NAME_CHARS {
            issues.push(format!("menu name exceeds {MAX_NAME_CHARS} characters"));
        }

        let bar_len = self.chat_bar_text.trim().chars().count();
        if bar_len == 0 {
            issues.push("chat bar text must not be empty".to_string());
        } else if bar_len > MAX_CHAT_BAR_CHARS {
            issues.push(format!(
                "chat bar text exceeds {MAX_CHAT_BAR_CHARS} characters"
            ));
        }

        let Some(template) = find_template(&self.template_id) else {
            issues.push(format!("unknown template '{}'", self.template_id));
            return issues;
        };

        if self.actions.len() != template.areas() {
            issues.push(format!(
                "template '{}' has {} areas but {} actions were given",
                template.id,
                template.areas(),
                self.actions.len()
            ));
        }
        for (i, action) in self.actions.iter().enumerate() {
            if let Some(problem) = action.issue() {
                issues.push(format!("area {}: {problem}", area_label(i)));
            }
        }
        issues
    }

    pub fn validate(&self) -> Result<&'static MenuTemplate, LineOaError> {
        let issues = self.issues();
        if !issues.is_empty() {
            return Err(LineOaError::Validation(issues.join("; ")));
        }
        find_template(&self.template_id)
            .ok_or_else(|| LineOaError::Validation(format!("unknown template '{}'", self.template_id)))
    }

    /// The Messaging API rich menu object for a valid draft.
    pub fn to_line_json(&self) -> Result<Value, LineOaError> {
        let template = self.validate()?;
        let (width, height) = template.size.dimensions();
        let areas: Vec<Value> = self
            .actions
            .iter()
            .enumerate()
            .map(|(i, action)| {
                let (x, y, w, h) = template.bounds(i);
                json!({
                    "bounds": {"x": x, "y": y, "width": w, "height": h},
                    "action": action.to_line_action(area_label(i)),
                })
            })
            .collect();
        Ok(json!({
            "size": {"width": width, "height": height},
            "selected": false,
            "name": self.name.trim(),
            "chatBarText": self.chat_bar_text.trim(),
            "areas": areas,
        }))
    }
}
