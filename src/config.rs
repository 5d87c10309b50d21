use std::sync::OnceLock;

pub const ECHO_ENV: &str = "RSVM_INTERN_ECHO";
pub const REBIND_ENV: &str = "RSVM_INTERN_REBIND";
pub const LOG_ENV: &str = "RSVM_INTERN_LOG";

static GLOBAL_CONFIG: OnceLock<InternConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternConfig {
    echo: bool,
    rebind_on_load: bool,
}

impl Default for InternConfig {
    fn default() -> Self {
        Self {
            echo: true,
            rebind_on_load: true,
        }
    }
}

impl InternConfig {
    /// Process-wide configuration, read from the environment on first use.
    /// The logger is installed at the same time.
    pub fn global() -> &'static InternConfig {
        return GLOBAL_CONFIG.get_or_init(|| {
            init_logger();
            let cfg = InternConfig::from_lookup(|key| std::env::var(key).ok());
            log::debug!("intern config {:?}", cfg);
            cfg
        });
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut cfg = Self::default();
        if let Some(val) = lookup(ECHO_ENV) {
            cfg.set_echo(parse_switch(&val, cfg.echo));
        }
        if let Some(val) = lookup(REBIND_ENV) {
            cfg.set_rebind_on_load(parse_switch(&val, cfg.rebind_on_load));
        }
        return cfg;
    }

    pub fn echo(&self) -> bool {
        self.echo
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    pub fn rebind_on_load(&self) -> bool {
        self.rebind_on_load
    }

    pub fn set_rebind_on_load(&mut self, rebind: bool) {
        self.rebind_on_load = rebind;
    }
}

fn parse_switch(val: &str, default: bool) -> bool {
    return match val.trim().to_ascii_lowercase().as_str() {
        "0" | "false" | "off" | "no" => false,
        "1" | "true" | "on" | "yes" => true,
        _ => default,
    };
}

#[cfg(feature = "logger")]
fn init_logger() {
    let env = env_logger::Env::default().filter_or(LOG_ENV, "error");
    // the host process may already own the logger
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(not(feature = "logger"))]
fn init_logger() {}
