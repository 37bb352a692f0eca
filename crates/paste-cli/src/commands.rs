use std::io::Read;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use paste_server::{build_service, AppConfig, PasteServer};
use paste_types::Credential;

use crate::cli::{Cli, Command, CreateArgs, ReadArgs, ServeArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => block_on(cmd_serve(config, args)),
        Command::Create(args) => block_on(cmd_create(config, args)),
        Command::Read(args) => block_on(cmd_read(config, args)),
        Command::Config => cmd_config(&config),
    }
}

fn block_on<F: std::future::Future<Output = anyhow::Result<()>>>(fut: F) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?
        .block_on(fut)
}

async fn cmd_serve(mut config: AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if args.ephemeral {
        config = config.ephemeral();
        tracing::warn!("ephemeral mode: pastes are lost on exit");
    }
    println!(
        "{} pastebin on {}",
        "▶".green().bold(),
        config.server.bind_addr.to_string().bold()
    );
    PasteServer::from_config(config).await?.serve().await?;
    Ok(())
}

async fn cmd_create(config: AppConfig, args: CreateArgs) -> anyhow::Result<()> {
    let text = read_text(args.file.as_deref())?;
    let service = build_service(&config).await?;
    let credential = service.create(&args.name, &text).await?;
    println!("{} Stored {}", "✓".green().bold(), args.name.yellow());
    println!("  Credential: {}", credential.as_str().cyan().bold());
    println!("  {}", "It is shown only once.".dimmed());
    Ok(())
}

async fn cmd_read(config: AppConfig, args: ReadArgs) -> anyhow::Result<()> {
    let service = build_service(&config).await?;
    let text = service
        .read(&args.name, &Credential::new(args.credential))
        .await?;
    print!("{text}");
    Ok(())
}

fn cmd_config(config: &AppConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

fn read_text(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
