use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for spincube")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy and tests
    Check,
    /// Run all tests
    Test,
    /// Launch the demo window
    Run {
        /// Texture image for the box
        #[arg(long)]
        texture: Option<String>,
    },
    /// Simulate frames without a window and print the last one
    Headless {
        #[arg(default_value = "60")]
        frames: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt", &["fmt", "--all", "--", "--check"])?;
            cargo(
                "clippy",
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            )?;
            cargo("test", &["test", "--workspace"])?;
        }
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Run { texture } => {
            let mut args = vec!["run", "-p", "spincube-desktop", "--"];
            if let Some(t) = texture.as_deref() {
                args.extend(["--texture", t]);
            }
            cargo("run", &args)?;
        }
        Commands::Headless { frames } => {
            let frames = frames.to_string();
            cargo(
                "run",
                &["run", "-p", "spincube-desktop", "--", "--headless", &frames],
            )?;
        }
    }

    Ok(())
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {step} failed");
    }
    Ok(())
}
