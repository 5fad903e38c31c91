use anyhow::{anyhow, Context, Result};
use chat_markdown::{html_to_docx, markdown_to_html, DEFAULT_TITLE};
use clap::{ArgGroup, Parser};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(ArgGroup::new("input").required(true).args(["html_file", "markdown_file"])))]
struct Args {
    /// Input HTML file (fragment or full document).
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// Input Markdown/chat text file; rendered to HTML first.
    #[arg(long)]
    markdown_file: Option<PathBuf>,

    /// Output .docx path.
    #[arg(long)]
    out: PathBuf,

    /// Title block text and document title metadata.
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn load_html(args: &Args) -> Result<String> {
    match (&args.html_file, &args.markdown_file) {
        (Some(path), _) => read_input(path),
        (None, Some(path)) => Ok(markdown_to_html(&read_input(path)?)),
        (None, None) => Err(anyhow!("either --html-file or --markdown-file is required")),
    }
}

fn write_output(out_path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
    }
    fs::write(out_path, bytes).with_context(|| format!("write {}", out_path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let html = load_html(&args)?;
    let docx = html_to_docx(&html, &args.title).context("package docx")?;
    write_output(&args.out, &docx)?;

    tracing::info!(out = %args.out.display(), bytes = docx.len(), "wrote docx");
    Ok(())
}
