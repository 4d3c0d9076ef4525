use anyhow::{Context, Result};
use clap::Parser;
use pydigest::cli::{Cli, Commands, ExtractArgs, exit_code};
use pydigest::config::Config;
use pydigest::extract::{Aggregator, OnParseError};
use pydigest::notebook::Notebook;
use pydigest::paths::PlatformPaths;
use pydigest::walker::{FileWalker, py_files_from_tree};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Extract(args) => extract(args),
        Commands::Tree { root, config } => {
            let config = Config::load(config.as_deref())?;
            let tree = FileWalker::from_config(&root, &config.walk).render_tree()?;
            print!("{}", tree);
            Ok(())
        }
        Commands::Files {
            paths,
            filter,
            skip_unparseable,
        } => {
            let mut config = Config::load(None)?;
            filter.apply(&mut config);
            config.validate()?;

            let filter = config.filter_spec();
            let result = Aggregator::new(&filter)
                .on_parse_error(policy(skip_unparseable))
                .run(&paths)?;
            print!("{}", result.digest());
            Ok(())
        }
        Commands::Init { path, force } => {
            let path = path.unwrap_or_else(PlatformPaths::default_config_path);
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to replace it)", path.display());
            }
            Config::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn policy(skip_unparseable: bool) -> OnParseError {
    if skip_unparseable {
        OnParseError::Skip
    } else {
        OnParseError::Abort
    }
}

fn extract(args: ExtractArgs) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    if let Some(tree_file) = &args.tree_file {
        let tree = std::fs::read_to_string(tree_file)
            .with_context(|| format!("Failed to read tree file {}", tree_file.display()))?;
        config.walk.include_patterns = py_files_from_tree(&tree);
        if config.walk.include_patterns.is_empty() {
            anyhow::bail!("No .py files listed in {}", tree_file.display());
        }
    }
    config.validate()?;

    let files = FileWalker::from_config(&args.root, &config.walk).walk()?;
    let filter = config.filter_spec();
    let result = Aggregator::new(&filter)
        .on_parse_error(policy(args.skip_unparseable))
        .run(&files)?;

    let digest_path = &config.output.digest_path;
    if let Some(parent) = digest_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(digest_path, result.digest())
        .with_context(|| format!("Failed to write digest to {}", digest_path.display()))?;

    if let Some(notebook_path) = &config.output.notebook_path {
        Notebook::from_result(&result).write(notebook_path)?;
    }

    println!(
        "Wrote {} definitions from {} files to {}{}",
        result.block_count(),
        result.files.len(),
        digest_path.display(),
        if result.skipped.is_empty() {
            String::new()
        } else {
            format!(" ({} skipped)", result.skipped.len())
        }
    );
    Ok(())
}
