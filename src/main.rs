use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cvforge::compiler::{DocumentCompiler, PdflatexCompiler};
use cvforge::config::Config;
use cvforge::llm::{self, LlmClient};
use cvforge::pipeline::{self, PipelineOptions};
use cvforge::store::ArtifactStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvforge v{}", env!("CARGO_PKG_VERSION"));
    info!(
        output_dir = %config.output_dir.display(),
        target_pages = config.target_pages,
        max_iterations = config.max_iterations,
        "pipeline configuration"
    );

    let store = ArtifactStore::new(&config.output_dir);
    let template = match &config.template_path {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };
    let options = PipelineOptions {
        target_pages: config.target_pages,
        max_iterations: config.max_iterations,
        template,
    };

    let report = pipeline::run(&store, &options)?;

    for entry in &report.reduction.items_removed {
        info!(
            iteration = entry.iteration,
            kind = ?entry.kind,
            item = %entry.item,
            "removed"
        );
    }
    info!(
        run_id = %report.reduction.run_id,
        status = ?report.reduction.status,
        initial_pages = report.reduction.initial_estimated_pages,
        final_pages = report.reduction.final_estimated_pages,
        target_met = report.reduction.target_met,
        compact_applied = report.compact_applied,
        "{}",
        report.reduction.message
    );

    // Advisory ranking: logged for the operator, never fed back into the
    // deterministic loop.
    if let Some(api_key) = &config.anthropic_api_key {
        if !report.reduction.target_met {
            match advisory_ranking(api_key, &store).await {
                Ok(suggestions) => {
                    for suggestion in suggestions {
                        info!(
                            kind = %suggestion.kind,
                            item = %suggestion.item,
                            rationale = %suggestion.rationale,
                            "llm removal suggestion"
                        );
                    }
                }
                Err(e) => warn!("advisory LLM ranking unavailable: {e}"),
            }
        }
    }

    if config.compile_pdf {
        let compiler = PdflatexCompiler;
        let output = compiler.compile(&report.document).await?;
        if output.success {
            let pdf = output.pdf.unwrap_or_default();
            let pdf_path = config.output_dir.join("resume.pdf");
            std::fs::write(&pdf_path, pdf)?;
            info!(path = %pdf_path.display(), "PDF written");
        } else {
            warn!("PDF compilation failed");
            for error in &output.errors {
                warn!("pdflatex: {error}");
            }
        }
    }

    // An unmet target is an outcome, not a failure: the document and the
    // removal log are still written for the caller to act on.
    Ok(())
}

async fn advisory_ranking(
    api_key: &str,
    store: &ArtifactStore,
) -> Result<Vec<llm::RemovalSuggestion>> {
    let client = LlmClient::new(api_key.to_string())?;
    let content = store.load_content()?;
    let jd = store.load_jd()?;
    Ok(llm::suggest_removals(&client, &content, &jd).await?)
}
