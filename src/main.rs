//! Interactive pipeline runner.
//!
//! Walks the full authoring workflow on the terminal: asks the six
//! intent questions, shows each generated document for review, lets the
//! user relabel the synthetic examples, and writes the final bundle to
//! the configured output directory.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use policy_forge::adapters::bundle::FsBundleWriter;
use policy_forge::adapters::generation::{HttpClientConfig, HttpGenerationClient};
use policy_forge::application::WorkflowOrchestrator;
use policy_forge::config::AppConfig;
use policy_forge::domain::example::ExampleLabel;
use policy_forge::domain::export::render_policy_markdown;
use policy_forge::domain::intent::IntentForm;
use policy_forge::domain::policy::PolicyVariant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let mut client_config = HttpClientConfig::new(config.backend.base_url.as_str())
        .with_timeout(config.backend.timeout())
        .with_max_retries(config.backend.max_retries);
    if let Some(api_key) = &config.backend.api_key {
        client_config = client_config.with_api_key(api_key.as_str());
    }
    let client = HttpGenerationClient::new(client_config);
    let mut workflow = WorkflowOrchestrator::new(Arc::new(client));

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let form = ask_intent(&mut input)?;

    println!("Generating initial machine policy...");
    workflow.submit_intent(form).await?;
    print_document(&workflow, PolicyVariant::Machine);

    if !confirm(&mut input, "Review and refine this machine policy?")? {
        return Ok(());
    }

    println!("Generating examples...");
    workflow.generate_examples().await?;
    review_examples(&mut input, &mut workflow)?;

    println!("Refining the machine policy...");
    workflow.refine_policy().await?;
    print_document(&workflow, PolicyVariant::Machine);

    if !confirm(
        &mut input,
        "Generate public and moderator policies from this refined machine policy?",
    )? {
        return Ok(());
    }

    println!("Generating public and moderator policies...");
    workflow.generate_derived_policies().await?;
    print_document(&workflow, PolicyVariant::Moderator);
    print_document(&workflow, PolicyVariant::Public);

    if !confirm(&mut input, "Save all policies?")? {
        return Ok(());
    }

    workflow.advance()?;
    let bundle = workflow.export()?;
    let writer = FsBundleWriter::new(&config.export.output_dir);
    let written = writer.write(&bundle)?;

    println!("Done! Your policies have been saved to:");
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

/// Asks the six intent questions, re-asking required ones until a
/// non-empty answer arrives.
fn ask_intent(input: &mut impl BufRead) -> io::Result<IntentForm> {
    let platform_type = prompt_required(
        input,
        "What type of platform do you operate? (e.g., social media, marketplace)",
    )?;
    let industry = prompt_required(
        input,
        "What industry or domain is your platform in? (e.g., gaming, e-commerce)",
    )?;
    let user_behavior = prompt_required(
        input,
        "What specific behavior or content are you trying to detect or prevent?",
    )?;
    let real_world_concerns = prompt_required(
        input,
        "Are there real-world risks, brand concerns, or legal requirements this relates to?",
    )?;
    let moderation_style = prompt_required(
        input,
        "How strict should enforcement be? (e.g., aggressive takedown, warn first)",
    )?;
    let additional_context = prompt(input, "Any additional context or requirements?")?;

    // Required fields were re-asked until non-empty, so this cannot fail.
    Ok(IntentForm::new(
        platform_type,
        industry,
        user_behavior,
        real_world_concerns,
        moderation_style,
        additional_context,
    )
    .expect("intent form validated at prompt time"))
}

/// Shows each example with its suggested label and applies corrections.
fn review_examples(
    input: &mut impl BufRead,
    workflow: &mut WorkflowOrchestrator,
) -> Result<(), Box<dyn Error>> {
    println!("Review the examples:");
    let examples: Vec<(String, ExampleLabel)> = workflow
        .state()
        .examples()
        .map(|set| {
            set.records()
                .iter()
                .map(|record| (record.text().to_string(), record.label()))
                .collect()
        })
        .unwrap_or_default();

    for (index, (text, label)) in examples.iter().enumerate() {
        println!("\n[{}] {}", index + 1, text);
        println!("Suggested label: {}", label);
        if confirm(input, "Do you agree?")? {
            continue;
        }
        let new_label = loop {
            let answer = prompt(input, "New label (violation/non-violation/borderline)")?;
            match answer.parse::<ExampleLabel>() {
                Ok(label) => break label,
                Err(err) => println!("{}", err),
            }
        };
        workflow.relabel_example(index, new_label)?;
    }
    Ok(())
}

fn print_document(workflow: &WorkflowOrchestrator, variant: PolicyVariant) {
    if let Some(document) = workflow.state().document(variant) {
        println!("\n{}\n", render_policy_markdown(document));
    }
}

fn prompt(input: &mut impl BufRead, question: &str) -> io::Result<String> {
    print!("{}: ", question);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_required(input: &mut impl BufRead, question: &str) -> io::Result<String> {
    loop {
        let answer = prompt(input, question)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        println!("This field is required.");
    }
}

fn confirm(input: &mut impl BufRead, question: &str) -> io::Result<bool> {
    let answer = prompt(input, &format!("{} (Y/n)", question))?;
    Ok(answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
