//! Command line interface
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};
use std::path::{Path, PathBuf};

pub struct Cli {
    /// Arguments passed by user
    matches: ArgMatches,
}

impl Cli {
    /// Builds the command line interface.
    pub fn new() -> Self {
        Self {
            matches: {
                Command::new("sirf2rnx")
                    .author("rtk-rs")
                    .version(env!("CARGO_PKG_VERSION"))
                    .about("SiRF OSP stream to RINEX / RTKLIB solution converter")
                    .arg_required_else_help(true)
                    .color(ColorChoice::Always)
                    .arg(
                        Arg::new("filepath")
                            .help("Input OSP byte stream (framed or stripped)")
                            .required(true),
                    )
                    .arg(
                        Arg::new("workspace")
                            .short('w')
                            .long("workspace")
                            .action(ArgAction::Set)
                            .help("Define custom output workspace. Defaults to the input file's directory."),
                    )
                    .next_help_heading("Input framing")
                    .arg(
                        Arg::new("stripped")
                            .long("stripped")
                            .action(ArgAction::SetTrue)
                            .help("Input is a decapsulated stream: length-prefixed payloads with no A0 A2 / checksum / B0 B3 framing."),
                    )
                    .arg(
                        Arg::new("patience")
                            .long("patience")
                            .action(ArgAction::Set)
                            .help("Bytes of resynchronization patience for framed input before giving up. Defaults to 4096."),
                    )
                    .next_help_heading("Decoding")
                    .arg(
                        Arg::new("min-nsv")
                            .long("min-nsv")
                            .action(ArgAction::Set)
                            .help("Reject position fixes reporting fewer satellites than this. Defaults to 0 (disabled)."),
                    )
                    .arg(
                        Arg::new("no-bias-correction")
                            .long("no-bias-correction")
                            .action(ArgAction::SetTrue)
                            .help("Disable clock bias/drift correction of pseudorange, carrier phase and Doppler."),
                    )
                    .next_help_heading("RINEX production")
                    .arg(
                        Arg::new("v2")
                            .long("v2")
                            .action(ArgAction::SetTrue)
                            .help("Downgrade RINEX revision to V2.10. We emit V3.02 by default.")
                    )
                    .arg(
                        Arg::new("marker-name")
                            .long("marker-name")
                            .action(ArgAction::Set)
                            .help("Set the MARKER NAME header field. Defaults to the input file stem."),
                    )
                    .arg(
                        Arg::new("gzip")
                            .long("gzip")
                            .action(ArgAction::SetTrue)
                            .help("Gzip-compress RINEX output."),
                    )
                    .arg(
                        Arg::new("short-name")
                            .long("short-name")
                            .action(ArgAction::SetTrue)
                            .help("Use the short V2.10 style file name even when producing V3.02."),
                    )
                    .next_help_heading("Selection filter")
                    .arg(
                        Arg::new("sys-sat")
                            .long("sys-sat")
                            .action(ArgAction::Append)
                            .help("Select a system or satellite, e.g. \"G\" or \"G01\". May be repeated."),
                    )
                    .arg(
                        Arg::new("obs")
                            .long("obs")
                            .action(ArgAction::Append)
                            .help("Select an observable code, e.g. \"C1C\". May be repeated."),
                    )
                    .next_help_heading("RTK solution")
                    .arg(
                        Arg::new("rtk")
                            .long("rtk")
                            .action(ArgAction::SetTrue)
                            .help("Also emit an RTKLIB-style position solution text file alongside RINEX."),
                    )
                    .get_matches()
            },
        }
    }

    pub fn input_path(&self) -> PathBuf {
        Path::new(self.matches.get_one::<String>("filepath").unwrap()).to_path_buf()
    }

    pub fn workspace(&self) -> Option<&String> {
        self.matches.get_one::<String>("workspace")
    }

    pub fn stripped(&self) -> bool {
        self.matches.get_flag("stripped")
    }

    pub fn patience(&self) -> usize {
        self.matches
            .get_one::<String>("patience")
            .and_then(|s| s.parse().ok())
            .unwrap_or(4096)
    }

    pub fn min_nsv(&self) -> u8 {
        self.matches
            .get_one::<String>("min-nsv")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    pub fn apply_bias_correction(&self) -> bool {
        !self.matches.get_flag("no-bias-correction")
    }

    pub fn target_v2(&self) -> bool {
        self.matches.get_flag("v2")
    }

    pub fn marker_name(&self) -> Option<&String> {
        self.matches.get_one::<String>("marker-name")
    }

    pub fn gzip(&self) -> bool {
        self.matches.get_flag("gzip")
    }

    pub fn short_name(&self) -> bool {
        self.matches.get_flag("short-name")
    }

    pub fn sys_sat(&self) -> Vec<String> {
        self.matches
            .get_many::<String>("sys-sat")
            .map(|v| v.cloned().collect())
            .unwrap_or_default()
    }

    pub fn observables(&self) -> Vec<String> {
        self.matches
            .get_many::<String>("obs")
            .map(|v| v.cloned().collect())
            .unwrap_or_default()
    }

    pub fn rtk(&self) -> bool {
        self.matches.get_flag("rtk")
    }
}
