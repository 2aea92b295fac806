use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, BusinessParams, Config};
use crate::scoring::{StrategyKind, Thresholds};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Prompt for a positive number until the input parses.
fn prompt_positive(message: &str, default: &str) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, default)?;
        match input.parse::<f64>() {
            Ok(v) if v > 0.0 && v.is_finite() => return Ok(v),
            Ok(_) => println!("  Invalid: must be positive. Try again."),
            Err(_) => println!("  Invalid: must be a positive number. Try again."),
        }
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Site Scout Configuration Wizard");
    println!("===============================");
    println!();

    // 1. Strategy
    typewriter("Two scoring strategies are available:");
    typewriter("  budgeted -- fixed point budgets per factor, tracks data confidence (stricter)");
    typewriter("  weighted -- proportional weighted sum over the 7 configurable weights");
    let strategy = loop {
        let input = prompt_with_default("Scoring strategy", "budgeted")?;
        match input.as_str() {
            "budgeted" => break StrategyKind::Budgeted,
            "weighted" => break StrategyKind::Weighted,
            _ => println!("  Invalid: must be 'budgeted' or 'weighted'. Try again."),
        }
    };

    // 2. Business parameters
    println!();
    typewriter("Business parameters drive the rent factor and every financial projection.");
    let average_ticket = prompt_positive("Average ticket", "185")?;
    let base_investment = prompt_positive("Base investment per location", "900000")?;
    let daily_customer_target = prompt_positive("Daily customer target", "220")?;
    let operating_margin = loop {
        let input = prompt_with_default("Target operating margin (0-1)", "0.15")?;
        match input.parse::<f64>() {
            Ok(v) if (0.0..1.0).contains(&v) => break v,
            _ => println!("  Invalid: must be a ratio below 1, e.g. 0.15. Try again."),
        }
    };

    // 3. Thresholds (weighted strategy only reads them, but they are cheap to set)
    println!();
    typewriter("Classification thresholds for the weighted strategy:");
    typewriter("  score >= viable   -> VIABLE");
    typewriter("  score >= evaluate -> EVALUATE");
    typewriter("  otherwise         -> NOT VIABLE");
    let use_default_thresholds = prompt_yes_no(
        "Thresholds - use defaults? (evaluate: 45, viable: 60)",
        true,
    )?;
    let thresholds = if use_default_thresholds {
        Thresholds::default()
    } else {
        loop {
            let evaluate = prompt_positive("Evaluate threshold (0-100)", "45")?;
            let viable = prompt_positive("Viable threshold (0-100)", "60")?;
            if viable > evaluate && viable <= 100.0 {
                break Thresholds { evaluate, viable };
            }
            println!("  Invalid: viable must be above evaluate and at most 100. Try again.");
        }
    };

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let mut config = Config::default();
    config.scoring.strategy = strategy;
    config.scoring.thresholds = thresholds;
    config.business = BusinessParams {
        average_ticket,
        base_investment,
        operating_margin,
        daily_customer_target,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(&config_path)
        .with_context(|| format!("Failed to open atomic write file at {}", config_path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    file.commit().context("Failed to save config")?;

    println!();
    println!("Config written to {}", config_path.display());
    typewriter("Factor weights for the weighted strategy live in the config file under scoring.weights; edit them there and keep the sum at 1.0.");
    println!("Run `site-scout rank --candidates <file.json>` to get started.");

    Ok(())
}
