use std::io::Write;

use concierge_core::{Answer, RetrievalResult};
use concierge_rag::RagPipeline;
use tokio::io::{AsyncBufReadExt, BufReader};

fn show_help() {
    println!("🎯 Concierge Commands:");
    println!("  /help     - Show this help message");
    println!("  /status   - Show pipeline status");
    println!("  /sources  - Show passages behind the last answer");
    println!("  /quit     - Exit");
    println!("  <question> - Ask about the hotel");
    println!();
}

fn show_sources(last: &RetrievalResult) {
    if last.is_empty() {
        println!("No sources for the last answer.");
        return;
    }
    for hit in last.hits() {
        let preview: String = hit.chunk.text.chars().take(80).collect();
        println!(
            "  #{:<4} page {:<3} offset {:<6} score {:.3}  {}",
            hit.chunk.index,
            hit.chunk.page + 1,
            hit.chunk.source_offset,
            hit.score,
            preview.replace('\n', " ")
        );
    }
}

/// Interactive question loop on stdin until `/quit` or EOF.
pub async fn run(pipeline: &RagPipeline) -> anyhow::Result<()> {
    println!("🛎️  AI Concierge");
    println!("===============");
    show_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = RetrievalResult::empty();
    loop {
        print!("concierge> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else { break };
        let input = line.trim();
        if input.is_empty() { continue; }

        match input {
            "/help" | "/h" => show_help(),
            "/status" | "/s" => println!("{}", serde_json::to_string_pretty(&pipeline.status())?),
            "/sources" => show_sources(&last),
            "/quit" | "/q" | "/exit" => break,
            question => {
                let Answer { text, status, grounding } = pipeline.answer(question).await;
                let marker = if status == concierge_core::AnswerStatus::Success { "💬" } else { "⚠️ " };
                println!("{marker} {text}");
                println!();
                last = grounding;
            }
        }
    }
    println!("👋 Goodbye!");
    Ok(())
}
