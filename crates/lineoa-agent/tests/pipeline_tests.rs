// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end behaviour of the message resolution pipeline.

use std::sync::Arc;
use std::time::Duration;

use lineoa_agent::pipeline::PIPELINE_FAILURE_REPLY;
use lineoa_agent::{PipelineOptions, ReplySource};
use lineoa_config::model::PipelineMode;
use lineoa_core::{Contact, KeywordRule, Message, Sender};
use lineoa_test_utils::{MockResponder, TestHarness};

const PRICE_REPLY: &str = "สินค้าเริ่มต้นที่ 500 บาทค่ะ สนใจดูแคตตาล็อกไหมคะ?";

fn rule(id: &str, keywords: &[&str], response: &str, active: bool) -> KeywordRule {
    KeywordRule {
        id: id.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        response: response.to_string(),
        is_active: active,
    }
}

fn senders(contact: &Contact) -> Vec<Sender> {
    contact.messages.iter().map(|m| m.sender).collect()
}

#[tokio::test]
async fn empty_store_price_question_creates_contact_and_rule_reply() {
    let h = TestHarness::builder().with_empty_inbox().build().await.unwrap();

    let res = h.pipeline.resolve_detailed("ราคาเท่าไหร่", None).await.unwrap();
    assert!(res.handled());
    assert!(res.new_contact);
    assert!(res.delivered);
    assert_eq!(res.source, Some(ReplySource::Rule { rule_id: "1".into() }));

    let contacts = h.store.get_contacts().await.unwrap();
    assert_eq!(contacts.len(), 1);
    let c = &contacts[0];
    assert_eq!(c.display_name, "New Customer");
    assert_eq!(senders(c), vec![Sender::User, Sender::Bot]);
    assert_eq!(c.messages[0].text, "ราคาเท่าไหร่");
    assert_eq!(c.messages[1].text, PRICE_REPLY);
    assert_eq!(c.unread_count, 1);
    assert_eq!(h.responder.call_count().await, 0);
}

#[tokio::test]
async fn focused_contact_does_not_accumulate_unread() {
    let h = TestHarness::new().await.unwrap();
    h.store.set_focus(Some("1".to_string()));

    h.pipeline.resolve("ราคา", Some("1")).await.unwrap();
    assert_eq!(h.contact("1").await.unwrap().unread_count, 0);

    h.store.set_focus(None);
    h.pipeline.resolve("ราคา", Some("1")).await.unwrap();
    assert_eq!(h.contact("1").await.unwrap().unread_count, 1);
}

#[tokio::test]
async fn no_rule_and_ai_disabled_stores_only_inbound() {
    let h = TestHarness::builder().with_ai_enabled(false).build().await.unwrap();
    let before = h.contact("1").await.unwrap().messages.len();

    let handled = h.pipeline.resolve("สวัสดีครับ", Some("1")).await.unwrap();
    assert!(!handled);

    let c = h.contact("1").await.unwrap();
    assert_eq!(c.messages.len(), before + 1);
    assert_eq!(c.last_message().unwrap().sender, Sender::User);
    assert_eq!(h.responder.call_count().await, 0);
}

#[tokio::test]
async fn no_rule_and_ai_enabled_stores_responder_output() {
    let h = TestHarness::builder()
        .with_responses(["AI says hi"])
        .build()
        .await
        .unwrap();

    let res = h.pipeline.resolve_detailed("hello there", Some("2")).await.unwrap();
    assert_eq!(res.source, Some(ReplySource::Ai));

    let c = h.contact("2").await.unwrap();
    let bots: Vec<&Message> = c.messages.iter().filter(|m| m.sender == Sender::Bot).collect();
    assert_eq!(bots.len(), 1);
    assert_eq!(bots[0].text, "AI says hi");

    let calls = h.responder.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "hello there");
    assert!(calls[0].1.contains("LINE OA"), "persona comes from settings");
}

#[tokio::test]
async fn responder_fallback_text_is_stored_as_reply() {
    let fallback = "เกิดข้อผิดพลาดในการเชื่อมต่อกับ AI";
    let h = TestHarness::builder().with_responses([fallback]).build().await.unwrap();
    assert!(h.pipeline.resolve("hmm", None).await.unwrap());
    let first = &h.store.get_contacts().await.unwrap()[0];
    assert_eq!(first.last_message().unwrap().text, fallback);
}

#[tokio::test]
async fn empty_responder_output_counts_as_no_reply() {
    let h = TestHarness::builder().with_responses([""]).build().await.unwrap();
    let res = h.pipeline.resolve_detailed("hmm", Some("1")).await.unwrap();
    assert!(!res.handled());
    assert_eq!(h.contact("1").await.unwrap().last_message().unwrap().sender, Sender::User);
}

#[tokio::test]
async fn panicking_responder_degrades_to_fixed_reply() {
    let h = TestHarness::builder()
        .with_responder(MockResponder::new().panicking())
        .build()
        .await
        .unwrap();
    assert!(h.pipeline.resolve("hmm", Some("1")).await.unwrap());
    assert_eq!(
        h.contact("1").await.unwrap().last_message().unwrap().text,
        PIPELINE_FAILURE_REPLY
    );
}

#[tokio::test]
async fn first_active_matching_rule_wins() {
    let h = TestHarness::builder()
        .with_rules(vec![
            rule("off", &["ship"], "inactive", false),
            rule("a", &["SHIP"], "first", true),
            rule("b", &["shipping"], "second", true),
        ])
        .build()
        .await
        .unwrap();

    h.pipeline.resolve("When is shipping?", Some("1")).await.unwrap();
    assert_eq!(h.contact("1").await.unwrap().last_message().unwrap().text, "first");
}

#[tokio::test]
async fn unknown_explicit_target_synthesizes_new_contact() {
    let h = TestHarness::new().await.unwrap();
    let res = h.pipeline.resolve_detailed("ราคา", Some("nobody")).await.unwrap();
    assert!(res.new_contact);
    assert_ne!(res.contact_id, "nobody");
    assert_eq!(h.store.get_contacts().await.unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn focus_taken_mid_turn_suppresses_unread() {
    let h = TestHarness::builder()
        .with_read_latency(Duration::from_millis(10))
        .build()
        .await
        .unwrap();
    let before = h.contact("2").await.unwrap().unread_count;

    let pipeline = Arc::clone(&h.pipeline);
    let turn = tokio::spawn(async move { pipeline.resolve("ราคา", Some("2")).await });
    // Three record reads have finished; the inbound write is re-reading
    // contacts under the lock.
    tokio::time::sleep(Duration::from_millis(35)).await;
    h.store.set_focus(Some("2".to_string()));
    assert!(turn.await.unwrap().unwrap());

    assert_eq!(h.contact("2").await.unwrap().unread_count, before);
}

#[tokio::test]
async fn default_target_is_most_recent_contact() {
    let h = TestHarness::new().await.unwrap();
    let res = h.pipeline.resolve_detailed("ราคา", None).await.unwrap();
    // Jane Doe is the most recently active seed contact.
    assert_eq!(res.contact_id, "2");
}

#[tokio::test]
async fn back_to_back_ai_turns_stay_paired() {
    let h = TestHarness::builder()
        .with_responses(["reply one", "reply two"])
        .build()
        .await
        .unwrap();

    h.pipeline.resolve("first question", Some("1")).await.unwrap();
    h.pipeline.resolve("second question", Some("1")).await.unwrap();

    let c = h.contact("1").await.unwrap();
    let tail: Vec<&str> = c.messages.iter().rev().take(4).rev().map(|m| m.text.as_str()).collect();
    assert_eq!(
        tail,
        vec!["first question", "reply one", "second question", "reply two"]
    );
}

#[tokio::test]
async fn back_to_back_turns_on_empty_store_share_one_contact() {
    let h = TestHarness::builder()
        .with_empty_inbox()
        .with_responses(["reply one", "reply two"])
        .build()
        .await
        .unwrap();

    let first = h.pipeline.resolve_detailed("first question", None).await.unwrap();
    let second = h.pipeline.resolve_detailed("second question", None).await.unwrap();
    assert!(first.new_contact);
    assert!(!second.new_contact);
    assert_eq!(first.contact_id, second.contact_id);

    let contacts = h.store.get_contacts().await.unwrap();
    assert_eq!(contacts.len(), 1);
    let c = &contacts[0];
    assert_eq!(
        senders(c),
        vec![Sender::User, Sender::Bot, Sender::User, Sender::Bot]
    );
    let texts: Vec<&str> = c.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["first question", "reply one", "second question", "reply two"]
    );
    assert_eq!(c.unread_count, 2);
}

#[tokio::test(start_paused = true)]
async fn serialized_mode_never_interleaves_overlapping_turns() {
    let h = TestHarness::builder()
        .with_responses(["reply one", "reply two"])
        .with_options(PipelineOptions {
            rule_reply_delay: Duration::from_millis(500),
            ai_reply_delay: Duration::from_millis(1500),
            mode: PipelineMode::Serialized,
        })
        .build()
        .await
        .unwrap();

    let p1 = Arc::clone(&h.pipeline);
    let p2 = Arc::clone(&h.pipeline);
    let first = tokio::spawn(async move { p1.resolve("first", Some("1")).await });
    tokio::task::yield_now().await;
    let second = tokio::spawn(async move { p2.resolve("second", Some("1")).await });
    assert!(first.await.unwrap().unwrap());
    assert!(second.await.unwrap().unwrap());

    let c = h.contact("1").await.unwrap();
    let tail: Vec<&str> = c.messages.iter().rev().take(4).rev().map(|m| m.text.as_str()).collect();
    assert_eq!(tail, vec!["first", "reply one", "second", "reply two"]);
}

#[tokio::test(start_paused = true)]
async fn concurrent_mode_interleaves_but_loses_nothing() {
    let h = TestHarness::builder()
        .with_responses(["reply one", "reply two"])
        .with_options(PipelineOptions {
            rule_reply_delay: Duration::ZERO,
            ai_reply_delay: Duration::from_millis(1500),
            mode: PipelineMode::Concurrent,
        })
        .build()
        .await
        .unwrap();
    let before = h.contact("1").await.unwrap().messages.len();

    let (a, b) = tokio::join!(
        h.pipeline.resolve("first", Some("1")),
        h.pipeline.resolve("second", Some("1")),
    );
    assert!(a.unwrap() && b.unwrap());

    let c = h.contact("1").await.unwrap();
    assert_eq!(c.messages.len(), before + 4);
    let users = c.messages.iter().filter(|m| m.sender == Sender::User).count();
    assert_eq!(users, 1 + 2, "seed history has one user message");
}

#[tokio::test(start_paused = true)]
async fn deleted_target_drops_reply_silently() {
    let h = TestHarness::builder()
        .with_options(PipelineOptions {
            rule_reply_delay: Duration::from_millis(500),
            ai_reply_delay: Duration::from_millis(1500),
            mode: PipelineMode::Concurrent,
        })
        .build()
        .await
        .unwrap();

    let pipeline = Arc::clone(&h.pipeline);
    let run = tokio::spawn(async move { pipeline.resolve_detailed("ราคา", Some("1")).await });
    // Let the inbound write land, then delete while the reply waits.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(h.store.remove_contact("1").await.unwrap());

    let res = run.await.unwrap().unwrap();
    assert!(res.handled());
    assert!(!res.delivered);
    assert!(h.contact("1").await.is_err());
}

#[tokio::test]
async fn inbound_write_publishes_change_event() {
    let h = TestHarness::builder().with_ai_enabled(false).build().await.unwrap();
    let mut sub = h.bus.subscribe("inbox");
    h.pipeline.resolve("no match here", Some("1")).await.unwrap();
    assert_eq!(
        sub.try_recv().unwrap().event,
        lineoa_bus::StoreEvent::ContactsChanged
    );
    assert!(sub.try_recv().is_none());
}

#[tokio::test]
async fn sqlite_backed_pipeline_persists_turns() {
    let h = TestHarness::builder()
        .with_sqlite()
        .with_empty_inbox()
        .build()
        .await
        .unwrap();
    assert!(h.pipeline.resolve("location?", None).await.unwrap());
    let contacts = h.store.get_contacts().await.unwrap();
    assert_eq!(contacts[0].messages.len(), 2);
    assert_eq!(
        contacts[0].messages[1].text,
        "ร้านตั้งอยู่ที่ชั้น 1 ห้าง Siam Paragon ค่ะ"
    );
}
