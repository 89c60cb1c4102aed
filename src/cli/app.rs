//! Main CLI application

use crate::cli::help::render_usage;
use crate::config::{
    find_config_file, load_env_file, parse_config_file, validate_config, write_config_template,
    Config, CONFIG_FILE_NAMES,
};
use crate::error::{ConfigError, DoshError, EXIT_USAGE};
use crate::runner::{
    run_command, ConsoleLogger, Context, EnvironmentPolicy, Logger, SystemHandler, Verbosity,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Variable consulted for the current environment when `--env` is absent
pub const ENV_VARIABLE: &str = "DOSH_ENV";

/// Name of the built-in subcommand writing a starter configuration
pub const INIT_COMMAND: &str = "init";

/// Id of the trailing arguments of a configured command
const ARGS_ID: &str = "args";

/// Global options shared by every invocation
#[derive(Debug, Clone)]
pub struct Options {
    pub file: Option<PathBuf>,
    pub verbosity: Verbosity,
    pub environment: Option<String>,
    pub environment_policy: EnvironmentPolicy,
}

impl Options {
    /// Read the global options from parsed matches
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Options {
            file: matches.get_one::<PathBuf>("file").cloned(),
            verbosity: get_verbosity(matches),
            environment: matches.get_one::<String>("env").cloned(),
            environment_policy: if matches.get_flag("ignore-environments") {
                EnvironmentPolicy::Ignore
            } else {
                EnvironmentPolicy::Enforce
            },
        }
    }

    /// Console logger at the selected verbosity
    pub fn logger(&self) -> ConsoleLogger {
        ConsoleLogger::new(self.verbosity)
    }
}

/// CLI application
pub struct App {
    /// Parsed configuration
    config: Config,
    /// Config file path
    config_path: PathBuf,
    /// Global options
    options: Options,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, options: Options) -> Self {
        App {
            config,
            config_path,
            options,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Current environment: `--env`, else the `DOSH_ENV` variable
    pub fn environment(&self) -> Option<String> {
        self.options
            .environment
            .clone()
            .or_else(|| env::var(ENV_VARIABLE).ok().filter(|env| !env.is_empty()))
    }

    /// Build the execution context for an invocation
    pub fn context(&self, args: Vec<String>) -> Context {
        let mut ctx = Context::new()
            .with_environment(self.environment())
            .with_args(args)
            .with_environment_policy(self.options.environment_policy);

        if let Some(interpreter) = &self.config.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        ctx
    }

    /// Run a configured command with the real action handlers
    pub fn run_command(
        &self,
        name: &str,
        args: Vec<String>,
        logger: &dyn Logger,
    ) -> Result<(), DoshError> {
        let ctx = self.context(args);
        logger.info(
            Verbosity::Debug,
            &format!("Using config file: {}", self.config_path.display()),
        );
        run_command(&self.config, name, &ctx, &mut SystemHandler, logger)
    }

    /// Print the environment and command listing
    pub fn print_usage(&self) {
        println!("{}", render_usage(&self.config));
    }
}

/// Read, parse and validate the configuration, then load its `.env` file
pub fn load_config(file: Option<&Path>) -> Result<(Config, PathBuf), DoshError> {
    let config_path = match file {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let config = parse_config_file(&config_path)?;
    validate_config(&config)?;
    load_env_file(&config_path)?;

    Ok((config, config_path))
}

/// Build the clap command, with one subcommand per configured command
pub fn build_command(config: &Config) -> Command {
    let mut cmd = Command::new("dosh")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run commands defined in dosh.yaml")
        .after_help("Run without a command to list the configured commands.")
        .disable_help_subcommand(true)
        .allow_external_subcommands(true)
        .external_subcommand_value_parser(value_parser!(String))
        .arg(file_arg())
        .arg(
            Arg::new("env")
                .short('e')
                .long("env")
                .value_name("ENVIRONMENT")
                .help("Current environment (defaults to $DOSH_ENV)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Hide debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Print debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ignore-environments")
                .long("ignore-environments")
                .help("Run commands regardless of their environment restrictions")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new(INIT_COMMAND)
                .about("Create a starter dosh.yaml")
                .arg(file_arg()),
        );

    for (name, command) in config.sorted_commands() {
        if name == INIT_COMMAND {
            continue;
        }

        // Everything after the command name is handed over untouched
        let command_cmd = Command::new(name.to_string())
            .about(command.help_text.clone())
            .disable_help_flag(true)
            .arg(
                Arg::new(ARGS_ID)
                    .value_name("ARGS")
                    .num_args(0..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true),
            );

        cmd = cmd.subcommand(command_cmd);
    }

    cmd
}

fn file_arg() -> Arg {
    Arg::new("file")
        .short('f')
        .long("file")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Path to dosh.yaml config file")
}

/// Extract `--file` before clap parsing, so configured commands can be registered
fn extract_file_arg(args: &[OsString]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let Some(arg) = arg.to_str() else {
            return None;
        };

        match arg {
            "-f" | "--file" => return iter.next().map(PathBuf::from),
            "-e" | "--env" => {
                iter.next();
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--file=") {
                    return Some(PathBuf::from(path));
                }
                if !arg.starts_with('-') {
                    // Flags stop at the command name
                    return None;
                }
            }
        }
    }
    None
}

/// Trailing arguments of a configured or unknown command
fn invocation_args(matches: &ArgMatches) -> Vec<String> {
    let values = matches
        .try_get_many::<String>(ARGS_ID)
        .ok()
        .flatten()
        .or_else(|| matches.try_get_many::<String>("").ok().flatten());

    values
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("debug") {
        Verbosity::Debug
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    }
}

/// Write the starter configuration to `--file` or `./dosh.yaml`
fn init_config(path: Option<PathBuf>, logger: &dyn Logger) -> Result<(), DoshError> {
    let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAMES[0]));

    write_config_template(&path)?;
    logger.success(
        Verbosity::Normal,
        &format!("Config file created: {}", path.display()),
    );
    Ok(())
}

/// Run the CLI with the process arguments and return the exit status
pub fn run() -> i32 {
    run_from(env::args_os())
}

/// Run the CLI with the given arguments and return the exit status
pub fn run_from<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let loaded = load_config(extract_file_arg(&args).as_deref());

    let command = match &loaded {
        Ok((config, _)) => build_command(config),
        Err(_) => build_command(&Config::default()),
    };

    let matches = match command.try_get_matches_from(&args) {
        Ok(matches) => matches,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { EXIT_USAGE } else { 0 };
        }
    };

    let options = Options::from_matches(&matches);
    let logger = options.logger();

    if let Some((INIT_COMMAND, init_matches)) = matches.subcommand() {
        let path = init_matches
            .get_one::<PathBuf>("file")
            .cloned()
            .or_else(|| options.file.clone());
        return match init_config(path, &logger) {
            Ok(()) => 0,
            Err(e) => report(&logger, e),
        };
    }

    let app = match loaded {
        Ok((config, config_path)) => App::new(config, config_path, options),
        Err(e) => return report(&logger, e),
    };

    let (name, sub_matches) = match matches.subcommand() {
        Some(subcommand) => subcommand,
        None => {
            app.print_usage();
            return 0;
        }
    };

    match app.run_command(name, invocation_args(sub_matches), &logger) {
        Ok(()) => 0,
        Err(e @ DoshError::Config(ConfigError::CommandNotFound(_))) => {
            let code = report(&logger, e);
            app.print_usage();
            code
        }
        // Step and execution failures were already reported by the dispatcher
        Err(e) => e.exit_code(),
    }
}

/// Render an error through the logger and return its exit status
fn report(logger: &dyn Logger, error: DoshError) -> i32 {
    logger.error(Verbosity::Normal, &error.to_string());
    error.exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::fs;
    use tempfile::TempDir;

    fn options() -> Options {
        Options {
            file: None,
            verbosity: Verbosity::Normal,
            environment: None,
            environment_policy: EnvironmentPolicy::Enforce,
        }
    }

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_get_verbosity() {
        let cmd = build_command(&Config::default());

        let matches = cmd.clone().get_matches_from(vec!["dosh"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Normal);

        let matches = cmd.clone().get_matches_from(vec!["dosh", "-q"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Quiet);

        let matches = cmd.get_matches_from(vec!["dosh", "--debug"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Debug);
    }

    #[test]
    fn test_logger_uses_selected_verbosity() {
        let matches = build_command(&Config::default()).get_matches_from(vec!["dosh", "-q"]);
        let options = Options::from_matches(&matches);
        assert_eq!(options.logger().verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_external_subcommand_args() {
        let matches = build_command(&Config::default()).get_matches_from(vec![
            "dosh", "-e", "DEV", "start", "-d", "web",
        ]);
        let options = Options::from_matches(&matches);
        assert_eq!(options.environment.as_deref(), Some("DEV"));

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "start");
        assert_eq!(invocation_args(sub), vec!["-d", "web"]);
    }

    #[test]
    fn test_configured_commands_are_subcommands() {
        let config = parse_config(
            "commands:\n  start:\n    help_text: Start things\n  init:\n    run: PRINT x\n",
        )
        .unwrap();
        let cmd = build_command(&config);

        let start = cmd.find_subcommand("start").unwrap();
        assert_eq!(start.get_about().unwrap().to_string(), "Start things");

        // The built-in init is registered once
        let inits = cmd
            .get_subcommands()
            .filter(|sub| sub.get_name() == INIT_COMMAND)
            .count();
        assert_eq!(inits, 1);

        let help = cmd.clone().render_help().to_string();
        assert!(help.contains("Start things"));

        let matches = cmd.get_matches_from(vec!["dosh", "start", "-x", "--rm", "web"]);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "start");
        assert_eq!(invocation_args(sub), vec!["-x", "--rm", "web"]);
    }

    #[test]
    fn test_options_from_matches() {
        let matches = build_command(&Config::default()).get_matches_from(vec![
            "dosh",
            "--file",
            "custom.yaml",
            "--ignore-environments",
        ]);
        let options = Options::from_matches(&matches);
        assert_eq!(options.file, Some(PathBuf::from("custom.yaml")));
        assert_eq!(options.environment_policy, EnvironmentPolicy::Ignore);
    }

    #[test]
    fn test_extract_file_arg() {
        let args = os_args(&["dosh", "-q", "--file", "custom.yaml", "start"]);
        assert_eq!(extract_file_arg(&args), Some(PathBuf::from("custom.yaml")));

        let args = os_args(&["dosh", "--file=other.yml"]);
        assert_eq!(extract_file_arg(&args), Some(PathBuf::from("other.yml")));

        let args = os_args(&["dosh", "-e", "DEV", "-f", "x.yaml"]);
        assert_eq!(extract_file_arg(&args), Some(PathBuf::from("x.yaml")));

        // Arguments of the command itself are not options
        let args = os_args(&["dosh", "start", "-f", "compose.yml"]);
        assert_eq!(extract_file_arg(&args), None);
    }

    #[test]
    fn test_usage_error_exit_code() {
        assert_eq!(run_from(vec!["dosh", "--no-such-flag"]), EXIT_USAGE);
        assert_ne!(EXIT_USAGE, crate::error::EXIT_CONFIG);
    }

    #[test]
    fn test_load_config_and_context() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dosh.yaml");
        fs::write(
            &path,
            "interpreter: [bash, -c]\ncommands:\n  hello:\n    run: PRINT hi\n",
        )
        .unwrap();

        let (config, config_path) = load_config(Some(&path)).unwrap();
        let mut options = options();
        options.environment = Some("PROD".to_string());
        let app = App::new(config, config_path, options);

        assert_eq!(app.config_path(), &path);
        assert!(app.config().commands.contains_key("hello"));

        let ctx = app.context(vec!["x".to_string()]);
        assert_eq!(ctx.interpreter, vec!["bash", "-c"]);
        assert_eq!(ctx.environment.as_deref(), Some("PROD"));
        assert_eq!(ctx.args, vec!["x"]);
    }

    #[test]
    fn test_load_config_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dosh.yaml");
        fs::write(&path, "commands:\n  deploy:\n    environments: [NOPE]\n").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(
            result,
            Err(DoshError::Config(ConfigError::UndeclaredEnvironment { .. }))
        ));
    }
}
