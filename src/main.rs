use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    learnhub::logging::init().context("init logging")?;

    let cli = learnhub::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        learnhub::cli::Command::Serve(args) => {
            learnhub::server::run(args).await.context("serve")?;
        }
        learnhub::cli::Command::Render(args) => {
            learnhub::export::run(args).context("render")?;
        }
        learnhub::cli::Command::Check(args) => {
            check(args).context("check")?;
        }
    }

    Ok(())
}

fn check(args: learnhub::cli::CheckArgs) -> anyhow::Result<()> {
    let catalog = learnhub::catalog::Catalog::load_configured(args.catalog.as_deref())?;
    let stats = catalog.stats();

    println!("{}", catalog.title());
    for section in catalog.sections() {
        let lessons = section
            .chapters
            .iter()
            .map(|c| c.lesson_count())
            .sum::<usize>();
        println!(
            "  {}: {} chapters, {} lessons",
            section.id,
            section.chapters.len(),
            lessons
        );
    }
    println!(
        "sections: {}, chapters: {} ({} locked), lessons: {} ({} locked)",
        stats.sections, stats.chapters, stats.locked_chapters, stats.lessons, stats.locked_lessons
    );
    Ok(())
}
