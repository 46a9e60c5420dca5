use std::path::PathBuf;

use clap::{Parser, Subcommand};

use csrf_gate::config::load_config;
use csrf_gate::csrf::{DigestTokenProvider, TokenProvider};
use csrf_gate::routing::{Router, UrlGenerator};

#[derive(Parser)]
#[command(name = "csrf-cli")]
#[command(about = "Offline token and link tool for csrf-gate", long_about = None)]
struct Cli {
    /// Path to the gate's TOML configuration (must set csrf.secret).
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token expected for a route
    Token { route: String },
    /// Print a link to a route, with its token when the route is protected
    Url {
        route: String,
        /// Extra query parameters as key=value
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// List routes and whether they require a token
    Routes,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let Some(secret) = config.csrf.secret.as_deref() else {
        return Err("csrf.secret is not set; tokens would not match the running server".into());
    };
    let tokens = DigestTokenProvider::new(secret);
    let router = Router::from_config(config.routes);

    println!("{}", execute(cli.command, &router, &tokens)?);
    Ok(())
}

/// Run one subcommand and return what it prints.
fn execute(
    command: Commands,
    router: &Router,
    tokens: &dyn TokenProvider,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match command {
        Commands::Token { route } => {
            if router.route(&route).is_none() {
                return Err(format!("unknown route '{route}'").into());
            }
            tokens.generate(&route).to_string()
        }
        Commands::Url { route, params } => {
            let params: Vec<(&str, &str)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            UrlGenerator::new(router, tokens).generate(&route, &params)?
        }
        Commands::Routes => router
            .routes()
            .map(|route| {
                format!(
                    "{:<24} {:<24} priority={:<4} csrf_protect={}",
                    route.name,
                    route.path_prefix.as_deref().unwrap_or("/"),
                    route.priority,
                    route.options.csrf_protect()
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use csrf_gate::config::RouteConfig;

    fn router() -> Router {
        Router::from_config(vec![
            RouteConfig::with_prefix("checkout", "/checkout").csrf_protected(),
            RouteConfig::with_prefix("search", "/search"),
        ])
    }

    fn command(args: &[&str]) -> Commands {
        let mut argv = vec!["csrf-cli", "--config", "gate.toml"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("q=rust"), Ok(("q".into(), "rust".into())));
        assert_eq!(parse_param("expr=a=b"), Ok(("expr".into(), "a=b".into())));
        assert_eq!(parse_param("empty="), Ok(("empty".into(), String::new())));
        assert!(parse_param("novalue").is_err());

        assert!(Cli::try_parse_from(["csrf-cli", "-c", "gate.toml", "url", "search", "-p", "bad"]).is_err());
    }

    #[test]
    fn test_token_command() {
        let tokens = DigestTokenProvider::new("s3cret");
        let out = execute(command(&["token", "checkout"]), &router(), &tokens).unwrap();
        assert_eq!(out, tokens.generate("checkout").to_string());

        let err = execute(command(&["token", "missing"]), &router(), &tokens).unwrap_err();
        assert_eq!(err.to_string(), "unknown route 'missing'");
    }

    #[test]
    fn test_url_command() {
        let tokens = DigestTokenProvider::new("s3cret");

        let out = execute(command(&["url", "checkout", "-p", "item=42"]), &router(), &tokens).unwrap();
        assert_eq!(out, format!("/checkout?item=42&_csrf_token={}", tokens.generate("checkout")));

        let out = execute(command(&["url", "search", "--param", "q=a b"]), &router(), &tokens).unwrap();
        assert_eq!(out, "/search?q=a+b");

        assert!(execute(command(&["url", "missing"]), &router(), &tokens).is_err());
    }

    #[test]
    fn test_routes_command() {
        let tokens = DigestTokenProvider::new("s3cret");
        let out = execute(command(&["routes"]), &router(), &tokens).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("checkout"));
        assert!(lines[0].ends_with("csrf_protect=true"));
        assert!(lines[1].ends_with("csrf_protect=false"));
    }
}
