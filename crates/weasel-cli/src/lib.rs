// weasel-cli: shared utilities for CLI tools.

use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;
use weasel_core::DictionaryKey;
use weasel_dict::{Dictionary, DictionaryCacheRegistry, DictionaryConfig};

/// Key used when `-l` is not given.
pub const DEFAULT_KEY: &str = "en";

/// Options shared by the command-line tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    /// JSON configuration file (`-c`).
    pub config_path: Option<PathBuf>,
    /// Dictionary key the file is registered under (`-l`).
    pub key: String,
    /// Split each input line into tokens (`-b`).
    pub block: bool,
    /// Print full results as JSON lines (`--json`).
    pub json: bool,
    pub dict_file: PathBuf,
}

/// Parse command-line arguments (program name excluded).
///
/// Accepts `-c PATH`, `--config=PATH`, `-l KEY`, `--key=KEY`, `-b`,
/// `--block`, `--json` and exactly one positional dictionary file.
pub fn parse_args(args: &[String]) -> Result<CheckArgs, String> {
    let mut config_path = None;
    let mut key = None;
    let mut block = false;
    let mut json = false;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(val) = arg.strip_prefix("--config=") {
            config_path = Some(PathBuf::from(val));
        } else if let Some(val) = arg.strip_prefix("--key=") {
            key = Some(val.to_string());
        } else if arg == "-c" || arg == "--config" {
            let val = iter.next().ok_or_else(|| format!("{arg} requires a value"))?;
            config_path = Some(PathBuf::from(val));
        } else if arg == "-l" || arg == "--key" {
            let val = iter.next().ok_or_else(|| format!("{arg} requires a value"))?;
            key = Some(val.clone());
        } else if arg == "-b" || arg == "--block" {
            block = true;
        } else if arg == "--json" {
            json = true;
        } else if arg.starts_with('-') && arg.len() > 1 {
            return Err(format!("unknown option {arg}"));
        } else {
            positional.push(arg);
        }
    }

    let dict_file = match positional.as_slice() {
        [file] => PathBuf::from(file),
        [] => return Err("missing dictionary file".to_string()),
        _ => return Err("expected exactly one dictionary file".to_string()),
    };

    Ok(CheckArgs {
        config_path,
        key: key.unwrap_or_else(|| DEFAULT_KEY.to_string()),
        block,
        json,
        dict_file,
    })
}

/// Read the configuration file, or fall back to defaults.
pub fn load_config(args: &CheckArgs) -> Result<DictionaryConfig, String> {
    match &args.config_path {
        Some(path) => DictionaryConfig::from_json_file(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display())),
        None => Ok(DictionaryConfig::default()),
    }
}

/// Build a registry from the configuration and load the dictionary file
/// under the requested key.
pub fn load_dictionary(args: &CheckArgs) -> Result<(DictionaryCacheRegistry, Dictionary), String> {
    let key: DictionaryKey = args
        .key
        .parse()
        .map_err(|e| format!("invalid key {:?}: {e}", args.key))?;
    let registry = DictionaryCacheRegistry::new(load_config(args)?);
    let dictionary = registry
        .create_dictionary(&key, &args.dict_file)
        .map_err(|e| format!("failed to load {}: {e}", args.dict_file.display()))?;
    Ok((registry, dictionary))
}

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`
/// (default `warn`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
