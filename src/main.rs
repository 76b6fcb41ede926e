use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use inbox_assist::analyzer::{EmailAnalyzer, LlmAnalyzer, RuleAnalyzer};
use inbox_assist::calendar;
use inbox_assist::chat::{QueryRouter, SessionState};
use inbox_assist::config::AgentConfig;
use inbox_assist::llm::{create_provider, LlmBackend, LlmConfig};
use inbox_assist::pipeline::IngestionPipeline;
use inbox_assist::store::InboxStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AgentConfig::from_env();

    // Pick the analyzer once at startup: LLM if a key is present, rules
    // otherwise. Nothing downstream checks which one it got.
    let analyzer: Arc<dyn EmailAnalyzer> = build_analyzer(&config);

    let mut store = InboxStore::load(&config.inbox_path, &config.prompts_path)?;

    eprintln!("📬 Inbox Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Mode: {}", analyzer.mode());
    eprintln!("   Emails loaded: {}", store.emails().len());
    eprintln!();

    // Run the ingestion pipeline over the whole inbox up front.
    let pipeline = IngestionPipeline::new(Arc::clone(&analyzer));
    let summary = pipeline.run(&mut store).await;
    eprintln!(
        "   Ingestion: {}/{} emails processed\n",
        summary.processed, summary.total
    );

    print_inbox(&store);
    print_help();

    let router = QueryRouter::new(Arc::clone(&analyzer));
    let mut session = SessionState::new();

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/help", _) => print_help(),
            ("/inbox", _) => print_inbox(&store),
            ("/select", rest) => match rest.trim().parse::<u32>() {
                Ok(id) if store.email(id).is_some() => {
                    session.select_email(id);
                    println!("Email {id} selected.");
                }
                Ok(id) => println!("No email with id {id}."),
                Err(_) => println!("Usage: /select <id>"),
            },
            ("/show", rest) => match rest.trim().parse::<u32>() {
                Ok(id) => print_email(&store, id),
                Err(_) => println!("Usage: /show <id>"),
            },
            ("/tasks", _) => print_task_dashboard(&store),
            ("/export", _) => export_tasks(&store)?,
            ("/prompts", _) => print_prompts(&store),
            ("/prompt", rest) => match rest.split_once(' ') {
                Some((key, template)) if !template.trim().is_empty() => {
                    match store.update_prompt_template(key, template.trim()) {
                        Ok(()) => println!("Prompt '{key}' updated. Rerun /ingest to apply."),
                        Err(e) => println!("Edit rejected: {e}"),
                    }
                }
                _ => println!("Usage: /prompt <key> <new template text>"),
            },
            ("/ingest", _) => {
                let summary = pipeline.run(&mut store).await;
                println!(
                    "Ingestion: {}/{} emails processed",
                    summary.processed, summary.total
                );
            }
            ("/clear", _) => {
                session.clear_history();
                println!("Chat history cleared.");
            }
            _ => {
                session.push_user(line);
                let reply = router.respond(&mut store, &session, line).await;
                println!("\n{reply}\n");
                session.push_assistant(reply);
            }
        }
        eprint!("> ");
    }

    Ok(())
}

/// Choose the analyzer implementation from the environment.
fn build_analyzer(config: &AgentConfig) -> Arc<dyn EmailAnalyzer> {
    let llm_config = if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        Some(LlmConfig {
            backend: LlmBackend::Anthropic,
            api_key: secrecy::SecretString::from(key),
            model: config.model.clone(),
            request_timeout: config.request_timeout,
        })
    } else if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        Some(LlmConfig {
            backend: LlmBackend::OpenAi,
            api_key: secrecy::SecretString::from(key),
            model: std::env::var("INBOX_ASSIST_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            request_timeout: config.request_timeout,
        })
    } else {
        None
    };

    match llm_config {
        Some(llm_config) => match create_provider(&llm_config) {
            Ok(provider) => Arc::new(LlmAnalyzer::new(provider)),
            Err(e) => {
                eprintln!("LLM not initialized: {e}");
                eprintln!("Running in mock mode; responses will be rule-based.");
                Arc::new(RuleAnalyzer)
            }
        },
        None => {
            eprintln!("No API key set; running in mock mode (rule-based responses).");
            Arc::new(RuleAnalyzer)
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /inbox               list emails");
    println!("  /select <id>         select an email for chat");
    println!("  /show <id>           show one email with its agent outputs");
    println!("  /tasks               task dashboard across all emails");
    println!("  /export              write all tasks to all_tasks.ics");
    println!("  /prompts             list prompt templates");
    println!("  /prompt <key> <text> edit a prompt template");
    println!("  /ingest              rerun the ingestion pipeline");
    println!("  /clear               clear chat history");
    println!("  /quit                exit");
    println!("  anything else        chat with the agent about the selected email");
}

fn print_inbox(store: &InboxStore) {
    println!("{:<4} {:<12} {:<28} {}", "ID", "Category", "Sender", "Subject");
    for email in store.emails() {
        let category = email
            .category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "Unprocessed".to_string());
        println!(
            "{:<4} {:<12} {:<28} {}",
            email.id, category, email.sender, email.subject
        );
    }
}

fn print_email(store: &InboxStore, id: u32) {
    let Some(email) = store.email(id) else {
        println!("No email with id {id}.");
        return;
    };
    println!("From: {} | At: {}", email.sender, email.timestamp);
    println!("Subject: {}", email.subject);
    println!("\n{}\n", email.body);
    if email.action_items.is_empty() {
        println!("No action items extracted.");
    } else {
        println!("Action items:");
        for (i, item) in email.action_items.iter().enumerate() {
            println!("  {}. {} (Deadline: {})", i + 1, item.task, item.deadline);
        }
    }
    if email.draft_reply.is_empty() {
        println!("No auto-draft generated.");
    } else {
        println!("\nDraft reply:\n{}", email.draft_reply);
    }
}

fn print_task_dashboard(store: &InboxStore) {
    let tasks = calendar::collect_tasks(store);
    if tasks.is_empty() {
        println!("No tasks found yet. Run /ingest first.");
        return;
    }
    let with_deadline = tasks.iter().filter(|t| t.item.has_deadline()).count();
    println!("{} tasks, {} with a deadline", tasks.len(), with_deadline);
    for entry in &tasks {
        println!(
            "- [{}] {} (Deadline: {}) from email {}: {}",
            entry
                .email
                .category
                .map(|c| c.to_string())
                .unwrap_or_else(|| "Unprocessed".to_string()),
            entry.item.task,
            entry.item.deadline,
            entry.email.id,
            entry.email.subject
        );
    }
}

fn export_tasks(store: &InboxStore) -> anyhow::Result<()> {
    let tasks = calendar::collect_tasks(store);
    if tasks.is_empty() {
        println!("Nothing to export.");
        return Ok(());
    }
    let ics = calendar::bulk_calendar(&tasks, chrono::Utc::now());
    std::fs::write("all_tasks.ics", ics)?;
    println!("Wrote {} tasks to all_tasks.ics", tasks.len());
    Ok(())
}

fn print_prompts(store: &InboxStore) {
    let prompts = store.prompts();
    for (key, prompt) in [
        (inbox_assist::store::CATEGORIZATION_PROMPT, &prompts.categorization),
        (inbox_assist::store::ACTION_EXTRACTION_PROMPT, &prompts.action_extraction),
        (inbox_assist::store::AUTO_REPLY_PROMPT, &prompts.auto_reply),
    ] {
        println!("{key} ({}): {}", prompt.name, prompt.description);
        println!("  {}\n", prompt.template);
    }
}
