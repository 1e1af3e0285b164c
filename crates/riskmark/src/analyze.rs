use std::path::PathBuf;

use futures::future::join_all;
use riskmark_core::analysis::{
    build_premium_prompt, build_sentence_prompt, chunk_text, dedupe_sentences,
    parse_premium_response, parse_sentence_response, prefix_chars, premium_after_error,
    ClassificationResponse, ClassifiedSentence, PremiumEstimate,
};
use riskmark_core::highlight::Segment;
use serde::Serialize;

use crate::classifier::{ClassifierBackend, ClassifierOptions};
use crate::config::{AnalysisConfig, Config};
use crate::prelude::{eprintln, println, *};
use crate::render::{render_premium, render_segments};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[clap(flatten)]
    pub classifier: ClassifierOptions,
}

/// Premium estimate plus classified sentences for one policy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyAnalysis {
    pub premium_estimate: PremiumEstimate,
    pub sentences: Vec<ClassifiedSentence>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput<'a> {
    premium_estimate: &'a PremiumEstimate,
    sentences: &'a [ClassifiedSentence],
    segments: &'a [Segment],
}

pub async fn run(options: Options, global: crate::Global, config: Config) -> Result<()> {
    let settings = options.classifier.apply(config.analysis.clone());
    let backend =
        ClassifierBackend::from_config(&settings, options.classifier.google_api_key.clone())?;

    let text = crate::text::read_document(&options.path, &config.layout)?;

    if global.verbose {
        eprintln!("Classifier: {}", backend.describe());
        eprintln!("Document length: {} chars", text.chars().count());
    }

    let analysis = analyze_policy(&backend, &text, &settings).await?;
    let segments = highlight_sentences(&text, &analysis.sentences)?;

    if options.json {
        let output = AnalyzeOutput {
            premium_estimate: &analysis.premium_estimate,
            sentences: &analysis.sentences,
            segments: &segments,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}\n", render_premium(&analysis.premium_estimate));
    println!("{}", render_segments(&segments));
    Ok(())
}

/// Segment `text` using classified sentences as rules, in sentence order.
pub fn highlight_sentences(text: &str, sentences: &[ClassifiedSentence]) -> Result<Vec<Segment>> {
    let response = ClassificationResponse {
        premium_estimate: None,
        sentences: sentences.to_vec(),
    };
    let rules = response.to_rules()?;
    Ok(riskmark_core::highlight::highlight(text, &rules)?)
}

/// Ask the model for a premium estimate. Never fails: any error becomes a
/// keyword-based fallback.
pub async fn estimate_premium(
    backend: &ClassifierBackend,
    text: &str,
    settings: &AnalysisConfig,
) -> PremiumEstimate {
    let sample = prefix_chars(text, settings.premium_sample);
    let prompt = build_premium_prompt(text, settings.premium_sample);

    let parsed = match backend.complete(&prompt).await {
        Ok(answer) => parse_premium_response(&answer, sample).map_err(|e| e.to_string()),
        Err(err) => Err(err.to_string()),
    };

    parsed.unwrap_or_else(|err| {
        log::warn!("premium estimation failed: {}", err);
        premium_after_error(text, &err)
    })
}

/// Classify every chunk concurrently and merge the results in chunk order.
pub async fn classify_sentences(
    backend: &ClassifierBackend,
    text: &str,
    settings: &AnalysisConfig,
) -> Result<Vec<ClassifiedSentence>> {
    let chunks = chunk_text(text, settings.chunk_size);
    let total = chunks.len();
    log::info!("classifying {} chunk(s)", total);

    let requests = chunks.iter().enumerate().map(|(index, chunk)| async move {
        let part = index + 1;
        let prompt = build_sentence_prompt(chunk, part, total);
        let answer = backend
            .complete(&prompt)
            .await
            .with_context(|| f!("Classification of part {} of {} failed", part, total))?;
        let sentences = parse_sentence_response(&answer)
            .with_context(|| f!("Invalid classification for part {} of {}", part, total))?;
        log::debug!("part {} of {}: {} sentences", part, total, sentences.len());
        Ok::<_, color_eyre::eyre::Report>(sentences)
    });

    let mut all = Vec::new();
    for result in join_all(requests).await {
        all.extend(result?);
    }

    let unique = dedupe_sentences(all);
    log::info!("{} unique sentences classified", unique.len());
    Ok(unique)
}

/// Run both classification pipelines on the policy text.
pub async fn analyze_policy(
    backend: &ClassifierBackend,
    text: &str,
    settings: &AnalysisConfig,
) -> Result<PolicyAnalysis> {
    let (premium_estimate, sentences) = tokio::join!(
        estimate_premium(backend, text, settings),
        classify_sentences(backend, text, settings)
    );

    Ok(PolicyAnalysis {
        premium_estimate,
        sentences: sentences?,
    })
}
