// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Initial record values written on first read or after a corrupt record.

use chrono::{DateTime, Duration, Utc};
use lineoa_core::{Contact, KeywordRule, Message, Sender, SystemSettings};

fn message(id: &str, sender: Sender, text: &str, timestamp: DateTime<Utc>) -> Message {
    Message {
        id: id.to_string(),
        sender,
        text: text.to_string(),
        timestamp,
    }
}

/// Two demo contacts. Timestamps are relative to `now`.
pub fn contacts(now: DateTime<Utc>) -> Vec<Contact> {
    let somchai_at = now - Duration::milliseconds(1_000_000);
    let jane_at = now - Duration::milliseconds(50_000);
    vec![
        Contact {
            id: "1".to_string(),
            user_id: "U123456789".to_string(),
            display_name: "Somchai Jaidee".to_string(),
            picture_url: "https://picsum.photos/seed/1/200".to_string(),
            messages: vec![
                message("m1", Sender::User, "สวัสดีครับ", somchai_at),
                message(
                    "m2",
                    Sender::Bot,
                    "สวัสดีครับ มีอะไรให้ช่วยไหมครับ",
                    now - Duration::milliseconds(900_000),
                ),
            ],
            unread_count: 0,
            last_active: somchai_at,
        },
        Contact {
            id: "2".to_string(),
            user_id: "U987654321".to_string(),
            display_name: "Jane Doe".to_string(),
            picture_url: "https://picsum.photos/seed/2/200".to_string(),
            messages: vec![message("m4", Sender::User, "ขอเลขพัสดุหน่อยค่ะ", jane_at)],
            unread_count: 1,
            last_active: jane_at,
        },
    ]
}

fn rule(id: &str, keywords: &[&str], response: &str) -> KeywordRule {
    KeywordRule {
        id: id.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        response: response.to_string(),
        is_active: true,
    }
}

/// Price, contact and location rules.
pub fn rules() -> Vec<KeywordRule> {
    vec![
        rule(
            "1",
            &["ราคา", "price", "เท่าไหร่"],
            "สินค้าเริ่มต้นที่ 500 บาทค่ะ สนใจดูแคตตาล็อกไหมคะ?",
        ),
        rule(
            "2",
            &["ติดต่อ", "โทร", "เบอร์"],
            "ติดต่อเราได้ที่ 02-123-4567 หรือกดปุ่ม Call Center ในเมนูได้เลยค่ะ",
        ),
        rule(
            "3",
            &["ที่อยู่", "location", "แผนที่"],
            "ร้านตั้งอยู่ที่ชั้น 1 ห้าง Siam Paragon ค่ะ",
        ),
    ]
}

/// AI on, empty credentials, shop-admin persona.
pub fn settings() -> SystemSettings {
    SystemSettings {
        channel_token: String::new(),
        channel_secret: String::new(),
        is_ai_enabled: true,
        ai_system_instruction: "คุณคือแอดมินร้านค้า LINE OA ที่เป็นมิตรและช่วยเหลือลูกค้าอย่างเต็มที่"
            .to_string(),
        save_logs: true,
    }
}
