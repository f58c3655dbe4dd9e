use clap::Parser;
use colored::Colorize;
use fy::application::lookup::lookup;
use fy::domain::model::{DisplayType, LookupResult};
use fy::infrastructure::config::{self, load_config};
use fy::infrastructure::language;
use fy::interfaces::cli::Cli;
use fy::presentation::theme::Theme;
use fy::state::AppState;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Cancel all in-flight provider requests on Ctrl-C.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            signal_cancel.cancel();
        }
    });

    let cli = Cli::parse();
    let config = load_config()?;

    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.edit_config {
        if let Some(config_path) = config::get_config_path() {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            // Run editor in blocking task
            tokio::task::spawn_blocking(move || {
                std::process::Command::new(editor)
                    .arg(&config_path)
                    .status()
            })
            .await??;
        } else {
            eprintln!("{}", "Config file not found".red());
        }
        return Ok(());
    }

    let state = AppState::new(config.clone())?;

    if cli.status {
        print_status(&state);
        return Ok(());
    }

    if cli.query.is_empty() {
        eprintln!("{}", "Please provide text to translate".red());
        std::process::exit(1);
    }

    let text = cli.query.join(" ");
    let from = cli.from.as_str();
    let to = cli.to.as_deref().unwrap_or(config.to_language.as_str());
    for id in [from, to] {
        if language::lookup(id).is_none() {
            eprintln!("{}", format!("✘ Unknown language: {}", id).red());
            std::process::exit(1);
        }
    }

    let provider_filter: Option<Vec<String>> = cli.providers.map(|s| {
        s.split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    });

    let result = lookup(
        &state,
        &text,
        from,
        to,
        cli.nocache,
        provider_filter.as_deref(),
        &cancel,
    )
    .await;

    if cli.json {
        let errors: Vec<String> = result
            .responses
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| e.to_string()))
            .collect();
        let view = serde_json::json!({
            "query": result.query,
            "sections": result.sections,
            "errors": errors,
            "cached_at": result.cached_at,
        });
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let theme = Theme::from_name(theme_name);
    print!("{}", format_result(&result, &theme));

    Ok(())
}

fn init_logging(logging: &fy::infrastructure::config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}

/// Format the lookup result as string.
fn format_result(result: &LookupResult, theme: &Theme) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    let mut header = (theme.title)(&result.query.word);
    if let Some(phonetic) = &result.query.phonetic {
        header.push(' ');
        header.push_str(&(theme.pron)(&format!("[{}]", phonetic)));
    }
    if result.cached_at.is_some() {
        header.push(' ');
        header.push_str(&"[cached]".cyan().to_string());
    }
    writeln!(output, "{}", header).ok();

    for section in &result.sections {
        if let Some(title) = &section.title {
            writeln!(output).ok();
            writeln!(output, "{}", (theme.section)(title)).ok();
            let cutoff = "⸺".repeat(20);
            writeln!(output, "{}", (theme.line)(&cutoff)).ok();
        }
        for item in &section.items {
            match item.display_type {
                DisplayType::Translation => {
                    let mut line = format!("  {}", (theme.para)(&item.title));
                    if let Some(subtitle) = &item.subtitle {
                        line.push_str(&format!("  {}", (theme.sub)(subtitle)));
                    }
                    let tag = (theme.tag)(&format!("{:>8}", section.provider.name()));
                    writeln!(output, "{}  {}", tag, line.trim_start()).ok();
                }
                _ => {
                    let tag = (theme.tag)(&format!("{:>8}", item.tooltip));
                    let mut line = format!("{}  {}", tag, (theme.para)(&item.title));
                    if let Some(subtitle) = &item.subtitle {
                        if !item.title.is_empty() {
                            line.push_str("  ");
                        }
                        line.push_str(&(theme.sub)(subtitle));
                    }
                    writeln!(output, "{}", line.trim_end()).ok();
                }
            }
        }
    }

    // Failed providers are reported after everything usable.
    let failures: Vec<_> = result
        .responses
        .iter()
        .filter_map(|r| r.result.as_ref().err())
        .collect();
    if !failures.is_empty() {
        writeln!(output).ok();
        for error in failures {
            writeln!(output, "{}", (theme.error)(&format!("✘ {}", error))).ok();
        }
    }

    if result.sections.is_empty() {
        writeln!(output, "{}", (theme.sub)("no results")).ok();
    }

    writeln!(output).ok();
    output
}

fn print_status(state: &AppState) {
    println!("{}", "fy Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!(
        "Config: {}",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );
    println!("Theme: {}", state.config.theme);
    println!("Target language: {}", state.config.to_language);

    let names: Vec<_> = state.providers.iter().map(|p| p.kind().name()).collect();
    if names.is_empty() {
        println!("Providers: none (run --generate-config and add credentials)");
    } else {
        println!("Providers: {}", names.join(", "));
    }

    if state.config.youdao.app_id.is_some() {
        println!("Youdao API: Configured");
    } else {
        println!("Youdao API: Not configured");
    }
    if state.config.baidu.app_id.is_some() {
        println!("Baidu API: Configured");
    } else {
        println!("Baidu API: Not configured");
    }
    if state.config.tencent.secret_id.is_some() {
        println!("Tencent API: Configured");
    } else {
        println!("Tencent API: Not configured");
    }
    if state.config.caiyun.token.is_some() {
        println!("Caiyun API: Configured");
    } else {
        println!("Caiyun API: Not configured");
    }
}
