use anyhow::{Context, Result as AnyhowResult};
use clap::{Parser, Subcommand};
use editor_overlay::config::OverlayConfig;
use editor_overlay::profile::{ConfigurationProfile, ProfileUpdate};
use editor_overlay::{i18n, logging, CommandRegistry};
use std::path::PathBuf;

/// Inspect the editor overlay: option sets, localized commands, themes
#[derive(Parser, Debug)]
#[command(name = "editor-overlay")]
#[command(about = "Inspect the editor widget overlay configuration", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Override the locale (e.g., 'en', 'zh-CN')
    #[arg(long, value_name = "LOCALE", global = true)]
    locale: Option<String>,

    /// Log filter directive, overrides the config file
    #[arg(long, value_name = "FILTER", global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the merged option set sent to the widget
    Profile {
        #[arg(long, default_value = "text")]
        language: String,
        #[arg(long, default_value = "")]
        theme: String,
    },
    /// List the localized context-menu commands
    Commands,
    /// Print the theme definition registered for a theme token
    Theme {
        #[arg(long, default_value = "")]
        theme: String,
    },
    /// Print JSON Schemas for the config file and the option set
    Schema,
}

fn load_config(args: &Args) -> AnyhowResult<OverlayConfig> {
    let mut config = match &args.config {
        Some(path) => OverlayConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => OverlayConfig::default(),
    };
    if let Some(locale) = &args.locale {
        config.locale = Some(locale.clone());
    }
    if let Some(filter) = &args.log_filter {
        config.log_filter = filter.clone();
    }
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> AnyhowResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    logging::init(&config.log_filter);
    i18n::init_with_config(config.locale.as_deref());
    tracing::debug!("Using config {:?}", config);

    match &args.command {
        Command::Profile { language, theme } => {
            let theme = config.theme_resolver().resolve(theme);
            print_json(&ConfigurationProfile::build(language, theme).to_update())?;
        }
        Command::Commands => {
            let registry = CommandRegistry::new(config.effective_locale());
            for binding in registry.bindings() {
                println!(
                    "{:<16} {:<30} {:<28} {}",
                    binding.context_menu_group_id,
                    binding.id,
                    binding.label,
                    binding.run.native_id()
                );
            }
        }
        Command::Theme { theme } => {
            let resolver = config.theme_resolver();
            print_json(&resolver.palette_for(resolver.resolve(theme)))?;
        }
        Command::Schema => {
            print_json(&serde_json::json!({
                "config": schemars::schema_for!(OverlayConfig),
                "options": schemars::schema_for!(ProfileUpdate),
            }))?;
        }
    }

    Ok(())
}
