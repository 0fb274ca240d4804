use anyhow::Result;
use clap::{Parser, ValueEnum};
use pdf_stamp::{BatchResult, SignResult, StampConfig, StampOptions, StampPosition};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pdfstamp",
    about = "Stamp PDFs with a transparent signature image",
    version
)]
struct Cli {
    /// Path to the signature PNG image
    #[arg(short, long)]
    signature: PathBuf,

    /// PDF file or directory to sign
    #[arg(short, long)]
    input: PathBuf,

    /// Output file or directory (default: <input>_signed.pdf, or <input>/signed/)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pages to sign: all, first, last, odd, even, or ranges like "1-5,10"
    #[arg(long, default_value = "all")]
    pages: String,

    /// Pages to skip (applied after --pages), ranges like "2,5-7,15"
    #[arg(long, default_value = "")]
    skip_pages: String,

    /// Signature position
    #[arg(long, default_value = "bottom-right", value_enum)]
    position: PositionArg,

    /// Signature width as a fraction of page width, 0.1-1.0
    #[arg(long, default_value = "0.25")]
    scale: f32,

    /// Horizontal margin from the page edge in inches, 0.1-2.0
    #[arg(long, default_value = "0.5")]
    x_offset: f32,

    /// Vertical margin from the page edge in inches, 0.1-2.0
    #[arg(long, default_value = "0.5")]
    y_offset: f32,

    /// Signature opacity, 0.1-1.0 (1.0 = opaque)
    #[arg(long, default_value = "1.0")]
    opacity: f32,

    /// Rotation angle in degrees, 0-360
    #[arg(long, default_value = "0")]
    rotation: f32,

    /// Suppress progress output
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PositionArg {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl From<PositionArg> for StampPosition {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::BottomRight => Self::BottomRight,
            PositionArg::BottomLeft => Self::BottomLeft,
            PositionArg::TopRight => Self::TopRight,
            PositionArg::TopLeft => Self::TopLeft,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let options = StampOptions {
        signature_path: cli.signature.clone(),
        position: cli.position.into(),
        scale: cli.scale,
        x_offset_in: cli.x_offset,
        y_offset_in: cli.y_offset,
        opacity: cli.opacity,
        rotation_degrees: cli.rotation,
        pages: cli.pages.clone(),
        skip_pages: cli.skip_pages.clone(),
    };
    let config = StampConfig::from_options(&options)?;

    if !cli.quiet {
        println!("Signature:  {}", cli.signature.display());
        println!("Input:      {}", cli.input.display());
        println!("Position:   {}", config.position().as_str());
        println!("Scale:      {:.0}% of page width", config.scale() * 100.0);
        println!("Pages:      {}", config.pages_expr());
        if !config.skip_expr().is_empty() {
            println!("Skipping:   {}", config.skip_expr());
        }
        println!();
    }

    let failed = if cli.input.is_dir() {
        let output_dir = cli
            .output
            .unwrap_or_else(|| cli.input.join(pdf_stamp::SIGNED_DIR_NAME));
        let batch = pdf_stamp::sign_batch(&cli.input, &output_dir, &config).await?;
        report_batch(&batch, cli.quiet);
        batch.failed
    } else {
        let output = cli
            .output
            .unwrap_or_else(|| pdf_stamp::default_output_path(&cli.input));
        let result = pdf_stamp::sign_pdf(&cli.input, &output, &config).await;
        report_file(&result, cli.quiet);
        usize::from(!result.success)
    };

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn report_file(result: &SignResult, quiet: bool) {
    if result.success {
        if !quiet {
            println!(
                "Signed {} pages of {} → {}",
                result.pages_signed,
                result.total_pages,
                result.output_path.display()
            );
            if let Some(error) = &result.error {
                println!("  with page errors: {}", error);
            }
        }
    } else {
        eprintln!(
            "Failed to sign {}: {}",
            result.input_path.display(),
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn report_batch(batch: &BatchResult, quiet: bool) {
    if !quiet {
        for file in batch.files.iter().filter(|f| f.success) {
            report_file(file, quiet);
        }
        println!();
        println!(
            "Processed {} documents: {} signed, {} failed",
            batch.total_documents, batch.successful, batch.failed
        );
        println!("Log: {}", batch.log_path.display());
    }
    if batch.failed > 0 {
        for file in batch.files.iter().filter(|f| !f.success) {
            eprintln!(
                "  {}: {}",
                file.input_path.display(),
                file.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    if let Some(log_error) = &batch.log_error {
        eprintln!("Warning: could not write signing log: {}", log_error);
    }
}
