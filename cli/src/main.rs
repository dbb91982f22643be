use std::sync::Arc;

use anyhow::{Context, Result};
use futures::StreamExt;
use reedline::{DefaultPrompt, Reedline, Signal};

use orchestrator::{Engine, QueryOptions};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    println!("==========================================");
    println!(" Backward-Chaining Inference Engine — REPL ");
    println!("==========================================");

    let engine = Arc::new(Engine::new(Vec::new()).context("constructing engine")?);

    if let Some(path) = std::env::args().nth(1) {
        println!("Loading knowledge base from {path}...");
        engine
            .load_from_file(std::path::Path::new(&path))
            .await
            .with_context(|| format!("loading knowledge base from {path}"))?;
        println!("Knowledge base loaded.");
    }

    println!("Type a goal, e.g. parent(david, ?X). Type ':quit' to exit.");

    let mut line_editor = Reedline::create();
    let prompt = DefaultPrompt::default();

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }
                if input == ":quit" || input == ":q" {
                    break;
                }
                run_query(&engine, input).await;
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Aborting.");
                break;
            }
            Err(err) => {
                eprintln!("[!] Input error: {err}");
                break;
            }
        }
    }

    Ok(())
}

async fn run_query(engine: &Engine, input: &str) {
    let goal = match kbfile::parse_goal(input) {
        Ok(goal) => goal,
        Err(err) => {
            eprintln!("[!] Parse error: {err}");
            return;
        }
    };

    let mut stream = engine.query(goal, QueryOptions::default()).await;
    let mut count = 0;
    while let Some(solution) = stream.next().await {
        count += 1;
        if solution.is_empty() {
            println!("true.");
        } else {
            let rendered = solution
                .iter()
                .map(|(name, value)| format!("{name} = {value}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("{rendered}");
        }
    }
    if count == 0 {
        println!("false.");
    }
}
