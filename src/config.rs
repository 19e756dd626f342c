use crate::mapping::MatchMode;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_MARCO: &str = "http://localhost:81";
pub const DEFAULT_ENDPOINT: &str = "unix:///var/run/docker.sock";
pub const DEFAULT_PORTS: &str = "80,8080,2368,8983";
pub const DEFAULT_ENV: &str = "DOMAIN";
pub const DEFAULT_FREQUENCY_SECS: u64 = 15;

/// Agent configuration, resolved once at startup.
///
/// Precedence, highest first: command-line flag, environment variable,
/// config file, built-in default.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Remote Marco registry the backends are pushed to.
    pub marco: String,
    /// Docker endpoint (`unix://`, `tcp://` or `http://`).
    pub endpoint: String,
    /// Comma-joined ports eligible for proxying.
    pub ports: String,
    /// Container env variable holding the domain.
    pub env: String,
    /// Seconds between poll cycles.
    pub frequency: u64,
    pub match_mode: MatchMode,
    pub push_timeout_secs: u64,
    pub docker_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            marco: DEFAULT_MARCO.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            ports: DEFAULT_PORTS.into(),
            env: DEFAULT_ENV.into(),
            frequency: DEFAULT_FREQUENCY_SECS,
            match_mode: MatchMode::Substring,
            push_timeout_secs: 10,
            docker_timeout_secs: 120,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub marco: Option<String>,
    pub endpoint: Option<String>,
    pub ports: Option<String>,
    pub env: Option<String>,
    pub frequency: Option<String>,
    pub match_mode: Option<String>,
    pub help: bool,
    pub version: bool,
}

impl CliArgs {
    /// Parse flags (without the program name). Accepts `--flag value` and
    /// `--flag=value`.
    pub fn parse<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cli = CliArgs::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => {
                    cli.help = true;
                    continue;
                }
                "-V" | "--version" => {
                    cli.version = true;
                    continue;
                }
                _ => {}
            }

            let (flag, inline) = match arg.split_once('=') {
                Some((f, v)) => (f.to_string(), Some(v.to_string())),
                None => (arg.clone(), None),
            };
            let slot = match flag.as_str() {
                "--marco" => &mut cli.marco,
                "--endpoint" => &mut cli.endpoint,
                "--ports" => &mut cli.ports,
                "--env" => &mut cli.env,
                "--frequency" => &mut cli.frequency,
                "--match-mode" => &mut cli.match_mode,
                _ => anyhow::bail!("unknown argument {arg:?} (see --help)"),
            };
            let value = match inline {
                Some(v) => v,
                None => args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{flag} requires a value"))?,
            };
            *slot = Some(value);
        }

        Ok(cli)
    }
}

pub fn usage() -> String {
    format!(
        "{name} {version}
Publish running Docker containers to a Marco registry, keyed by domain.

USAGE:
    {name} [OPTIONS]

OPTIONS:
    --marco <URL>         The remote Marco backend [env: MARCO_ECS_URL] [default: {marco}]
    --endpoint <URL>      The Docker endpoint [env: DOCKER_HOST] [default: {endpoint}]
    --ports <LIST>        The ports you wish to proxy [env: MARCO_DOCKER_PORTS] [default: {ports}]
    --env <NAME>          Container env variable used as the domain [env: MARCO_DOCKER_ENV] [default: {env}]
    --frequency <SECS>    How often to push to Marco [env: MARCO_ECS_FREQUENCY] [default: {frequency}]
    --match-mode <MODE>   substring | exact [env: MARCO_DOCKER_MATCH_MODE] [default: substring]
    -h, --help            Print help
    -V, --version         Print version

A TOML file (CONFIG_FILE, default config.toml) may set any of the above plus
push_timeout_secs and docker_timeout_secs.",
        name = crate::version::NAME,
        version = crate::version::VERSION,
        marco = DEFAULT_MARCO,
        endpoint = DEFAULT_ENDPOINT,
        ports = DEFAULT_PORTS,
        env = DEFAULT_ENV,
        frequency = DEFAULT_FREQUENCY_SECS,
    )
}

impl AppConfig {
    /// Resolve from the process environment, the optional config file and `cli`.
    pub fn load(cli: &CliArgs) -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let file = match std::fs::read_to_string(&path) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(anyhow::anyhow!("reading {path}: {e}")),
        };
        Self::resolve(file.as_deref(), |key| std::env::var(key).ok(), cli)
    }

    /// Parse and validate config from a TOML string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer `file`, then `env`, then `cli` over the defaults and validate.
    pub fn resolve<F>(file: Option<&str>, env: F, cli: &CliArgs) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: AppConfig = match file {
            Some(s) => toml::from_str(s)?,
            None => AppConfig::default(),
        };

        let pick = |flag: &Option<String>, var: &str| flag.clone().or_else(|| env(var));

        if let Some(v) = pick(&cli.marco, "MARCO_ECS_URL") {
            config.marco = v;
        }
        if let Some(v) = pick(&cli.endpoint, "DOCKER_HOST") {
            config.endpoint = v;
        }
        if let Some(v) = pick(&cli.ports, "MARCO_DOCKER_PORTS") {
            config.ports = v;
        }
        if let Some(v) = pick(&cli.env, "MARCO_DOCKER_ENV") {
            config.env = v;
        }
        if let Some(v) = pick(&cli.frequency, "MARCO_ECS_FREQUENCY") {
            config.frequency = parse_number("frequency", &v)?;
        }
        if let Some(v) = pick(&cli.match_mode, "MARCO_DOCKER_MATCH_MODE") {
            config.match_mode = v.parse().map_err(|e: String| anyhow::anyhow!("match_mode: {e}"))?;
        }
        if let Some(v) = env("MARCO_PUSH_TIMEOUT") {
            config.push_timeout_secs = parse_number("push_timeout_secs", &v)?;
        }
        if let Some(v) = env("MARCO_DOCKER_TIMEOUT") {
            config.docker_timeout_secs = parse_number("docker_timeout_secs", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.frequency)
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout_secs)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.marco.is_empty(), "marco must be non-empty");
        anyhow::ensure!(
            self.marco.starts_with("http://") || self.marco.starts_with("https://"),
            "marco must be an http:// or https:// URL, got {:?}",
            self.marco
        );
        anyhow::ensure!(!self.ports.trim().is_empty(), "ports must be non-empty");
        anyhow::ensure!(!self.env.is_empty(), "env must be non-empty");
        anyhow::ensure!(
            self.frequency > 0,
            "frequency must be > 0, got {}",
            self.frequency
        );
        anyhow::ensure!(
            self.push_timeout_secs > 0,
            "push_timeout_secs must be > 0, got {}",
            self.push_timeout_secs
        );
        anyhow::ensure!(
            self.docker_timeout_secs > 0,
            "docker_timeout_secs must be > 0, got {}",
            self.docker_timeout_secs
        );
        Ok(())
    }
}

fn parse_number(name: &str, value: &str) -> anyhow::Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{name} must be a whole number of seconds, got {value:?}: {e}"))
}
