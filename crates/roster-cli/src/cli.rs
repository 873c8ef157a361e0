use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Run(RunArgs),
}

#[derive(Debug, Clone)]
pub struct RunArgs {
    pub config: PathBuf,
    pub database: Option<String>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str());

    let mut config = PathBuf::from("roster.toml");
    let mut database: Option<String> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--database" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--database requires a value");
                };
                database = Some(v.to_string());
            }
            _ if token.starts_with("--database=") => {
                database = Some(token.trim_start_matches("--database=").to_string());
            }
            other => anyhow::bail!("unexpected argument: {other}"),
        }
    }

    Ok(Command::Run(RunArgs { config, database }))
}

pub fn print_help() {
    println!(
        "\
roster - manage student records from the console

USAGE:
  roster [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: roster.toml)
  --database <URL>      Override db.url from config
  -h, --help            Print help

ENVIRONMENT:
  RUST_LOG              Log filter for stderr output (default: warn)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("roster")
            .chain(v.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn defaults_without_arguments() {
        let Command::Run(run) = parse_args(&args(&[])).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(run.config, PathBuf::from("roster.toml"));
        assert_eq!(run.database, None);
    }

    #[test]
    fn parses_config_and_database() {
        let cmd = parse_args(&args(&[
            "--config",
            "conf/school.toml",
            "--database=postgres://localhost/school",
        ]))
        .unwrap();
        let Command::Run(run) = cmd else {
            panic!("expected run");
        };
        assert_eq!(run.config, PathBuf::from("conf/school.toml"));
        assert_eq!(run.database.as_deref(), Some("postgres://localhost/school"));
    }

    #[test]
    fn help_wins() {
        assert!(matches!(
            parse_args(&args(&["--config", "x.toml", "-h"])).unwrap(),
            Command::Help
        ));
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = parse_args(&args(&["--database"])).unwrap_err();
        assert!(err.to_string().contains("--database requires a value"));
    }

    #[test]
    fn unknown_argument_is_an_error() {
        assert!(parse_args(&args(&["--verbose"])).is_err());
    }
}
