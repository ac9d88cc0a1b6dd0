//! Example: generating a content pack against a mock agent.
//!
//! Run with: `cargo run --example mock_generation`
//! Set `RUST_LOG=storycircuit=debug` to see each extraction attempt.

use std::sync::Arc;

use storycircuit::export::{self, ExportFormat, PlatformFilter};
use storycircuit::{
    ContentService, Event, FnEventHandler, GenerationRequest, HistoryItem, MockBackend,
    ServiceConfig,
};

const REPLY: &str = "\
<think>Two platforms, keep the thread short.</think>
## A) Plan
**Hook:** Most teams get agent orchestration wrong.
**Narrative Frame:** Problem, pattern, payoff.
**Key Points:**
- Sequential vs parallel execution
- Error handling across agents
- Observability from day one
**Example:** A five-agent research pipeline that recovers from one failed step.
**CTA:** Share how your team wires agents together.

## B) Platform Outputs
### Twitter
1/ Agents need a conductor, not a crowd.
2/ Pick sequential or parallel on purpose.
**Hashtags:** #AI #Agents #Tech
**CTA:** Reply with your setup.

### LinkedIn
Orchestration is where most agent projects stall.
Here is the pattern we keep coming back to.
**Hashtags:** #AI #Engineering
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env()?;
    let service = ContentService::new(Arc::new(MockBackend::fixed(REPLY)), config)
        .with_event_handler(Arc::new(FnEventHandler(|event: Event| match event {
            Event::AgentReply {
                agent, elapsed_ms, ..
            } => println!("[event] {} answered in {}ms", agent, elapsed_ms),
            Event::Parsed { strategy, quality } => {
                println!("[event] parsed by {:?} ({})", strategy, quality)
            }
            _ => {}
        })));

    let request = GenerationRequest::new("Multi-agent orchestration", "demo-user")
        .with_platform("twitter")
        .with_platform("linkedin")
        .with_audience("Platform engineers");

    let record = service.generate(&request).await?;

    println!("Quality: {}", record.report.quality());
    println!("Platforms found: {:?}", record.report.platforms_found);

    let history = HistoryItem::from(&record);
    println!("History: {} -- {}", history.topic, history.summary);

    let filter = PlatformFilter::All;
    let document = export::export(&record, ExportFormat::Markdown, filter)?;
    println!("\n--- {} ---", export::filename(&record.id, ExportFormat::Markdown, filter));
    println!("{}", document);

    // A request carrying credentials never reaches the agent.
    let leaky = GenerationRequest::new("Rotate api_key=sk_live_abcdefghijklmnopqrstuv today", "demo-user")
        .with_platform("blog");
    if let Err(err) = service.generate(&leaky).await {
        println!("Rejected: {}", err);
    }

    Ok(())
}
