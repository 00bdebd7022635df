// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive terminal chat.
//!
//! Runs the full pipeline locally under a throwaway account, so the
//! terminal session exercises exactly what a deployed client would:
//! authentication, the safety gate, extraction, and the cascade.

use std::io::{self, BufRead, Write};

use rand::distributions::{Alphanumeric, DistString};
use tracing::debug;

use solace_config::SolaceConfig;
use solace_core::{ResponseStyle, SolaceError};
use solace_engine::ChatEngine;

pub async fn run(config: SolaceConfig, once: Option<String>) -> Result<(), SolaceError> {
    let engine = ChatEngine::from_config(config)?;

    if let Some(message) = once {
        let reply = engine.chat_once(&message, ResponseStyle::Neutral).await?;
        println!("{}", reply.reply.content);
        return Ok(());
    }

    // A throwaway local account; nothing about it outlives the data dir.
    let suffix = Alphanumeric.sample_string(&mut rand::thread_rng(), 8);
    let username = format!("local-{suffix}");
    let password = Alphanumeric.sample_string(&mut rand::thread_rng(), 24);
    engine.register(&username, None, &password)?;
    let token = engine.login(&username, &password)?;
    debug!(username, "local chat account ready");

    println!("Solace is ready. Type your message, or \"quit\" to leave.");
    let stdin = io::stdin();
    let mut session_id = None;
    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| SolaceError::Internal(e.to_string()))?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| SolaceError::Internal(e.to_string()))?;
        if read == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }

        match engine.send_message(&token, session_id.as_ref(), text).await {
            Ok(reply) => {
                session_id = Some(reply.session_id.clone());
                println!("{}", reply.reply.content);
            }
            Err(SolaceError::Validation(msg)) => println!("({msg})"),
            Err(e) => return Err(e),
        }
    }
    println!("Take care of yourself.");
    Ok(())
}
