mod cli;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, KindArg};
use portal::prelude::*;
use portal::page::Section;
use portal::render;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PortalConfig::load(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    match &cli.command {
        Commands::Grading { file } => {
            let raw = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
            match parse_grading_table(&raw) {
                Some(table) => print!("{}", render::render_table(&table)),
                None => eprintln!("No table rows found in {}", file.display()),
            }
            return Ok(());
        }
        Commands::Carousel { images, run_for_ms } => {
            return run_carousel(&config, images.clone(), Duration::from_millis(*run_for_ms)).await;
        }
        _ => {}
    }

    let mut portal = if cli.no_persist { Portal::ephemeral(config)? } else { Portal::connect(config).await? };

    match cli.command {
        Commands::ClearCache => {
            portal.clear_cache().await?;
            println!("Academic cache cleared");
        }
        Commands::Page { section } => {
            let section = match section.as_deref() {
                Some(id) => Some(Section::from_id(id).with_context(|| {
                    let known: Vec<&str> = Section::NAV.iter().map(|s| s.id()).collect();
                    format!("unknown section {id:?}; expected one of {}", known.join(", "))
                })?),
                None => None,
            };
            portal.load_academics(cli.refresh).await;
            match section {
                Some(s) => print!("{}", portal.render_section(s)),
                None => print!("{}", portal.render_page()),
            }
        }
        Commands::Courses { kind } => {
            let status = portal.load_academics(cli.refresh).await.clone();
            let kinds = match kind {
                Some(KindArg::Core) => vec![CourseType::Core],
                Some(KindArg::Elective) => vec![CourseType::Elective],
                None => vec![CourseType::Core, CourseType::Elective],
            };
            for kind in kinds {
                println!("## {}\n", kind.as_str());
                print!("{}", render::render_courses(&status, portal.loader().data(), &kind));
                println!();
            }
            fail_on(&status)?;
        }
        Commands::Rules => {
            let status = portal.load_academics(cli.refresh).await.clone();
            print!("{}", render::render_rules(&status, &portal.loader().data().rules));
            fail_on(&status)?;
        }
        Commands::Grading { .. } | Commands::Carousel { .. } => {}
    }
    Ok(())
}

fn fail_on(status: &LoadStatus) -> Result<()> {
    if let LoadStatus::Failed(msg) = status {
        bail!("{msg}");
    }
    Ok(())
}

async fn run_carousel(config: &PortalConfig, images: Vec<String>, run_for: Duration) -> Result<()> {
    let carousel = Carousel::with_timing(images, config.carousel_interval(), config.carousel.swipe_threshold_px)?;
    let mut changes = carousel.subscribe();
    print_slides(&carousel);
    carousel.start();

    let deadline = tokio::time::sleep(run_for);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = changes.changed() => {
                if changed.is_err() { break; }
                changes.borrow_and_update();
                print_slides(&carousel);
            }
        }
    }
    carousel.stop();
    Ok(())
}

fn print_slides(carousel: &Carousel) {
    let line: Vec<String> = carousel
        .slides()
        .iter()
        .map(|s| if s.active { format!("[{}]", s.alt) } else { s.alt.clone() })
        .collect();
    println!("{}  {}", line.join(" "), carousel.slides()[carousel.current()].src);
}
