// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot console subcommands.

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::Serialize;

use lineoa_agent::{Broadcaster, ReplySource, Resolution};
use lineoa_console::flex::{self, FlexReport};
use lineoa_console::richmenu::{self, RichMenuDraft};
use lineoa_console::{
    ChatPlayground, DashboardStats, Inbox, RuleDraft, RulesEditor, SettingsView,
};
use lineoa_core::{KeywordRule, LineOaError, Sender};

use crate::console::Console;
use crate::{FlexCommand, InboxCommand, RichMenuCommand, RulesCommand, SettingsCommand};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), LineOaError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

fn settings_view(console: &Console) -> SettingsView {
    SettingsView::new(
        console.pipeline.clone(),
        console.config.console.webhook_origin.clone(),
    )
}

fn print_resolution(res: &Resolution) {
    let who = if res.new_contact {
        format!("{} (new)", res.contact_id)
    } else {
        res.contact_id.clone()
    };
    println!("{} {who}", "contact".dimmed());
    match (&res.reply, &res.source) {
        (Some(reply), Some(ReplySource::Rule { rule_id })) => {
            println!("{} {}", format!("[rule {rule_id}]").green(), reply.text);
        }
        (Some(reply), _) => println!("{} {}", "[ai]".cyan(), reply.text),
        (None, _) => println!("{}", "no reply".yellow()),
    }
    if res.reply.is_some() && !res.delivered {
        println!("{}", "contact was deleted before the reply landed".yellow());
    }
}

pub async fn run_simulate(
    console: &Console,
    text: &str,
    contact: Option<&str>,
    json: bool,
) -> Result<(), LineOaError> {
    let res = match contact {
        None => settings_view(console).simulate(text).await?,
        Some(id) => {
            if text.trim().is_empty() {
                return Err(LineOaError::Validation(
                    "test message must not be empty".to_string(),
                ));
            }
            console.pipeline.resolve_detailed(text, Some(id)).await?
        }
    };
    if json {
        return print_json(&res);
    }
    print_resolution(&res);
    Ok(())
}

pub async fn run_broadcast(console: &Console, text: &str, json: bool) -> Result<(), LineOaError> {
    let report = Broadcaster::new(console.store.clone()).broadcast(text).await?;
    if json {
        return print_json(&report);
    }
    println!(
        "sent to {} contact(s) at {}",
        report.recipients.to_string().bold(),
        clock(report.sent_at)
    );
    Ok(())
}

fn print_rule(rule: &KeywordRule) {
    let state = if rule.is_active {
        "on ".green()
    } else {
        "off".dimmed()
    };
    println!(
        "{:>4}  {state}  {}  {} {}",
        rule.id.chars().take(8).collect::<String>(),
        rule.keywords.join(", ").bold(),
        "->".dimmed(),
        rule.response
    );
}

pub async fn run_rules(
    console: &Console,
    action: RulesCommand,
    json: bool,
) -> Result<(), LineOaError> {
    let editor = RulesEditor::new(console.store.clone());
    let touched = match action {
        RulesCommand::List { search } => {
            let rules = match search {
                Some(q) => editor.search(&q).await?,
                None => editor.list().await?,
            };
            if json {
                return print_json(&rules);
            }
            if rules.is_empty() {
                println!("no rules");
            }
            rules.iter().for_each(print_rule);
            return Ok(());
        }
        RulesCommand::Add { keywords, response } => {
            editor.create(&RuleDraft::new(keywords, response)).await?
        }
        RulesCommand::Edit {
            id,
            keywords,
            response,
        } => editor.update(&id, &RuleDraft::new(keywords, response)).await?,
        RulesCommand::Toggle { id } => editor.toggle(&id).await?,
        RulesCommand::Delete { id } => {
            editor.delete(&id).await?;
            println!("deleted rule {id}");
            return Ok(());
        }
    };
    if json {
        return print_json(&touched);
    }
    print_rule(&touched);
    Ok(())
}

pub async fn run_inbox(
    console: &Console,
    action: InboxCommand,
    json: bool,
) -> Result<(), LineOaError> {
    let inbox = Inbox::new(console.store.clone());
    match action {
        InboxCommand::List { search } => {
            let contacts = match search {
                Some(q) => inbox.search(&q).await?,
                None => inbox.list().await?,
            };
            if json {
                return print_json(&contacts);
            }
            for c in &contacts {
                let badge = if c.unread_count > 0 {
                    format!(" ({})", c.unread_count).red().bold().to_string()
                } else {
                    String::new()
                };
                let last = c.last_message.as_deref().unwrap_or("เริ่มการสนทนา");
                let at = c.last_message_at.map(clock).unwrap_or_default();
                println!("{:<38} {}{badge}  {at}", c.id, c.display_name.bold());
                println!("    {}", last.dimmed());
            }
        }
        InboxCommand::Show { id } => {
            let contact = inbox.get(&id).await?;
            if json {
                return print_json(&contact);
            }
            println!("{} ({})", contact.display_name.bold(), contact.user_id);
            for m in &contact.messages {
                let who = match m.sender {
                    Sender::User => "user".normal(),
                    Sender::Bot => "bot ".green(),
                };
                println!("  {} {who}  {}", clock(m.timestamp).dimmed(), m.text);
            }
        }
        InboxCommand::Read { id } => {
            let contact = inbox.mark_read(&id).await?;
            if json {
                return print_json(&contact);
            }
            println!("marked {} read", contact.display_name);
        }
        InboxCommand::Reply { id, text } => {
            let message = inbox.reply(&id, &text).await?;
            if json {
                return print_json(&message);
            }
            println!("sent at {}", clock(message.timestamp));
        }
        InboxCommand::Delete { id } => {
            inbox.delete(&id).await?;
            println!("deleted contact {id}");
        }
    }
    Ok(())
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".dimmed().to_string()
    } else {
        "*".repeat(secret.chars().count().min(8))
    }
}

pub async fn run_settings(
    console: &Console,
    action: SettingsCommand,
    json: bool,
) -> Result<(), LineOaError> {
    let view = settings_view(console);
    match action {
        SettingsCommand::Show => {
            let s = view.get().await?;
            if json {
                return print_json(&s);
            }
            println!("channel token   {}", mask(&s.channel_token));
            println!("channel secret  {}", mask(&s.channel_secret));
            println!("ai replies      {}", s.is_ai_enabled);
            println!("save logs       {}", s.save_logs);
            println!("persona         {}", s.ai_system_instruction);
            println!("webhook url     {}", view.webhook_url());
        }
        SettingsCommand::Set {
            token,
            secret,
            ai,
            persona,
            save_logs,
        } => {
            let mut s = view.get().await?;
            if let Some(token) = token {
                s.channel_token = token;
            }
            if let Some(secret) = secret {
                s.channel_secret = secret;
            }
            if let Some(ai) = ai {
                s.is_ai_enabled = ai;
            }
            if let Some(persona) = persona {
                s.ai_system_instruction = persona;
            }
            if let Some(save_logs) = save_logs {
                s.save_logs = save_logs;
            }
            view.update(&s).await?;
            println!("settings saved");
        }
        SettingsCommand::Webhook { check } => {
            if !check {
                println!("{}", view.webhook_url());
                return Ok(());
            }
            let result = view.check_webhook().await?;
            if json {
                return print_json(&result);
            }
            println!("{}  {} (simulated)", result.url, result.status.to_string().green());
            if !result.credentials_present {
                println!("{}", "channel token or secret is not set".yellow());
            }
        }
    }
    Ok(())
}

pub async fn run_dashboard(console: &Console, json: bool) -> Result<(), LineOaError> {
    let stats = DashboardStats::load(&console.store).await?;
    if json {
        return print_json(&stats);
    }
    println!("contacts  {}", stats.contacts.to_string().bold());
    println!("messages  {}", stats.messages);
    println!("active    {}", stats.active);
    println!("unread    {}", stats.unread);
    Ok(())
}

/// Interactive playground. `/persona <text>` changes the persona, `/clear`
/// empties the transcript, `/quit` exits.
pub async fn run_chat(console: &Console, persona: Option<String>) -> Result<(), LineOaError> {
    let mut playground = ChatPlayground::new(console.pipeline.responder().clone());
    if let Some(persona) = persona {
        playground.set_persona(persona);
    }

    let mut rl = DefaultEditor::new()
        .map_err(|e| LineOaError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "lineoa chat".bold().green());
    println!("Type {} to exit.\n", "/quit".yellow());
    for m in playground.transcript() {
        println!("{} {}", "ai>".cyan(), m.text);
    }

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if trimmed == "/clear" {
                    playground.clear();
                    println!("{}", "transcript cleared".dimmed());
                    continue;
                }
                if let Some(persona) = trimmed.strip_prefix("/persona ") {
                    playground.set_persona(persona.trim());
                    println!("{}", "persona updated".dimmed());
                    continue;
                }

                match playground.send(trimmed).await {
                    Ok(reply) => println!("{} {}", "ai>".cyan(), reply.text),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, LineOaError> {
    std::fs::read_to_string(path)
        .map_err(|e| LineOaError::Internal(format!("failed to read {}: {e}", path.display())))
}

pub fn run_richmenu(action: RichMenuCommand, json: bool) -> Result<(), LineOaError> {
    match action {
        RichMenuCommand::Templates => {
            let templates = richmenu::templates();
            if json {
                return print_json(templates);
            }
            for t in templates {
                let (w, h) = t.size.dimensions();
                let labels: String = t.area_labels().into_iter().collect();
                println!("{:<10} {:<18} {w}x{h}  areas {labels}", t.id, t.name);
            }
        }
        RichMenuCommand::Validate { file } => {
            let draft: RichMenuDraft = serde_json::from_str(&read_file(&file)?)?;
            print_json(&draft.to_line_json()?)?;
        }
    }
    Ok(())
}

pub fn run_flex(action: FlexCommand) -> Result<(), LineOaError> {
    match action {
        FlexCommand::Sample => println!("{}", flex::SAMPLE_BUBBLE),
        FlexCommand::Validate { file } => {
            let FlexReport {
                container,
                bubbles,
                pretty,
            } = flex::validate(&read_file(&file)?)?;
            eprintln!("{} {container}, {bubbles} bubble(s)", "valid".green());
            println!("{pretty}");
        }
    }
    Ok(())
}
