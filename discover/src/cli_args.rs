use std::path::PathBuf;
use argh::FromArgs;

fn default_config_path () -> PathBuf {
    PathBuf::from("./discover_config.toml")
}

#[derive(Debug, FromArgs)]
#[argh(description = "browse the local network for instances of an mDNS service type")]
pub struct CliArgs {
    #[argh(
        option,
        description = "config file path, default: './discover_config.toml'",
        default = "default_config_path()"
    )]
    pub config: PathBuf,

    #[argh(option, description = "service type to browse, overrides the config file")]
    pub service: Option<String>,

    #[argh(switch, short = 'q', description = "only print the discovered services")]
    pub quiet: bool,
}
