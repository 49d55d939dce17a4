//! Plain option record built once from [crate::cli::Cli], threaded by
//! value/reference into the dispatcher and writer. No global state.
use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct Config {
    pub dispatcher: osp::dispatcher::Config,
    pub stripped: bool,
    pub patience: usize,
    pub target_version: rinex::version::Version,
    pub marker_name: Option<String>,
    pub gzip: bool,
    pub short_name: bool,
    pub sys_sat: Vec<String>,
    pub observables: Vec<String>,
    pub rtk: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            dispatcher: osp::dispatcher::Config {
                min_nsv: cli.min_nsv(),
                apply_bias_correction: cli.apply_bias_correction(),
            },
            stripped: cli.stripped(),
            patience: cli.patience(),
            target_version: if cli.target_v2() {
                rinex::version::V210
            } else {
                rinex::version::V302
            },
            marker_name: cli.marker_name().cloned(),
            gzip: cli.gzip(),
            short_name: cli.short_name(),
            sys_sat: cli.sys_sat(),
            observables: cli.observables(),
            rtk: cli.rtk(),
        }
    }
}
