//! `esql-check`: validate or complete an ES|QL query read from stdin.
//!
//! ```text
//! echo 'FROM logs | KEEP host' | esql-check
//! echo 'FROM logs | KEEP ' | esql-check suggest 17
//! ```
use esql_lang::*;
use std::io::Read;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

enum Mode {
    Validate,
    Suggest(usize),
}

fn mode(args: &[String]) -> Result<Mode> {
    match args {
        [] => Ok(Mode::Validate),
        [cmd, offset] if cmd == "suggest" => offset
            .parse()
            .map(Mode::Suggest)
            .map_err(|_| Error::Config(format!("invalid cursor offset [{offset}]"))),
        _ => Err(Error::Config(
            "usage: esql-check [suggest <offset>] < query".into(),
        )),
    }
}

async fn load_schema() -> Result<ExternalSchema> {
    match &config().schema {
        Some(path) => {
            info!("Loading schema from {}", path.display());
            let text = tokio::fs::read_to_string(path).await?;
            ExternalSchema::from_json(&text)
        }
        None => Ok(ExternalSchema::new()),
    }
}

async fn run() -> Result {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = mode(&args)?;

    let mut query = String::new();
    std::io::stdin().read_to_string(&mut query)?;
    let callbacks = CachedCallbacks::new(load_schema().await?);

    let output = match mode {
        Mode::Validate => {
            let messages = validate_query(&query, &callbacks, &ValidationOptions::default()).await;
            serde_json::to_string_pretty(&messages)?
        }
        Mode::Suggest(offset) => {
            let suggestions = suggest(&query, offset, &callbacks).await;
            serde_json::to_string_pretty(&suggestions)?
        }
    };
    println!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[rstest]
    #[case(&[], true)]
    #[case(&["suggest", "12"], true)]
    #[case(&["suggest", "twelve"], false)]
    #[case(&["check"], false)]
    fn parses_arguments(#[case] values: &[&str], #[case] ok: bool) {
        assert_eq!(mode(&args(values)).is_ok(), ok);
    }

    #[test]
    fn suggest_carries_offset() {
        assert!(matches!(mode(&args(&["suggest", "7"])), Ok(Mode::Suggest(7))));
    }
}
