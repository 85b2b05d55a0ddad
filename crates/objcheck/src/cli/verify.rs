//! The `objcheck verify` command.

use clap::{Args, ValueEnum};
use objcheck_core::{Config, OutputWriter, ProviderKind, VerificationResult, Verifier};
use std::path::{Path, PathBuf};

/// Upload types accepted, by extension.
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Arguments for the `verify` command.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Image file to verify
    pub image: PathBuf,

    /// Instruction for the model (used only when prompt editing is allowed)
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Provider to use instead of the configured one (openai, anthropic, ollama)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model to use instead of the provider's configured one
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    /// JSON success/error envelope
    Json,
    /// Question/Answer table
    Table,
}

impl From<Format> for objcheck_core::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => Self::Json,
            Format::Table => Self::Table,
        }
    }
}

/// Execute the verify command.
pub async fn execute(args: VerifyArgs, config: Config) -> anyhow::Result<()> {
    let image_path = super::expand_path(&args.image);
    check_image_path(&image_path)?;
    let image = std::fs::read(&image_path)?;

    let result = run(&args, config, &image).await;

    let mut writer = OutputWriter::new(std::io::stdout().lock(), args.format.into(), args.pretty);
    writer.write(&result)?;
    writer.flush()?;

    match &result {
        VerificationResult::Error { message } => {
            tracing::error!("Verification failed for {}: {message}", image_path.display());
            std::process::exit(1);
        }
        VerificationResult::NotFound { .. } => {
            tracing::info!("No matching objects in {}", image_path.display());
        }
        VerificationResult::Success { qa_pairs } => {
            tracing::info!("{} answer(s) for {}", qa_pairs.len(), image_path.display());
        }
    }
    Ok(())
}

async fn run(args: &VerifyArgs, config: Config, image: &[u8]) -> VerificationResult {
    let kind = match args.provider.as_deref() {
        Some(name) => match name.parse::<ProviderKind>() {
            Ok(kind) => kind,
            Err(e) => return e.into(),
        },
        None => config.provider.active,
    };

    let mut provider = config.provider.resolve(kind);
    if let Some(model) = &args.model {
        provider = provider.with_model(model.clone());
    }

    let verifier = Verifier::new(config);
    let prompt = verifier
        .config()
        .verification
        .effective_prompt(args.prompt.as_deref())
        .to_string();

    tracing::info!("Verifying {} with {kind} ({})", args.image.display(), provider.model_name);
    verifier.verify_with(image, &prompt, &provider).await
}

/// Reject missing files and types the providers are not asked to handle.
fn check_image_path(path: &Path) -> anyhow::Result<()> {
    if !path.is_file() {
        anyhow::bail!("Image file not found: {}", path.display());
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        anyhow::bail!(
            "Invalid file type for {}. Please upload an image ({}).",
            path.display(),
            ALLOWED_EXTENSIONS.join(", ")
        );
    }
    Ok(())
}
