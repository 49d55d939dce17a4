//! `sirf2rnx`: converts a SiRF OSP binary stream into RINEX observation and
//! navigation files, and optionally an RTKLIB-style position solution text
//! file (C10), per the CLI contract in §7.
mod cli;
mod config;
mod error;
mod pipeline;
mod rtk;

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use env_logger::{Builder, Target};
use log::{info, warn};
use osp::prelude::*;
use rinex::prelude::*;

use cli::Cli;
use config::Config;
use error::Error;

fn main() {
    Builder::from_default_env()
        .target(Target::Stdout)
        .format_timestamp_secs()
        .init();

    let cli = Cli::new();
    let config = Config::from_cli(&cli);

    let code = match run(&cli, &config) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli, config: &Config) -> Result<(), Error> {
    let input_path = cli.input_path();
    let file = File::open(&input_path).map_err(Error::CannotOpenInput)?;
    let reader = BufReader::new(file);

    let mut dispatcher = Dispatcher::new(config.dispatcher);
    let mut collector = pipeline::Collector::new();
    let (messages_seen, errors_seen) = if config.stripped {
        drive(StrippedReader::new(reader), &mut dispatcher, &mut collector)
    } else {
        drive(FramedReader::new(reader, config.patience), &mut dispatcher, &mut collector)
    };

    if messages_seen > 0 && errors_seen * 2 > messages_seen {
        return Err(Error::EpochErrorsDominated);
    }
    if collector.epochs_seen() == 0 {
        return Err(Error::NoEpochs);
    }

    finalize_headers(&mut collector, config, &input_path)?;

    let obs_ok = collector.observation.filter.set_filter(
        &collector.observation.header,
        &config.sys_sat,
        &config.observables,
    );
    let nav_ok = collector.navigation.filter.set_filter(
        &collector.navigation.header,
        &config.sys_sat,
        &config.observables,
    );
    if !obs_ok {
        warn!("some observation filter tokens were rejected");
    }
    if !nav_ok {
        warn!("some navigation filter tokens were rejected");
    }

    if filter_rejects_everything(&mut collector) {
        return Err(Error::FilterRejectedAll);
    }

    let workspace = cli
        .workspace()
        .map(PathBuf::from)
        .unwrap_or_else(|| input_path.parent().map(Path::to_path_buf).unwrap_or_default());
    let site = marker_site(config, &input_path);

    let obs_path = output_path(&workspace, &collector.observation, config, &site, 'O');
    let nav_path = output_path(&workspace, &collector.navigation, config, &site, nav_file_type(&collector.navigation));

    ensure_creatable(&obs_path)?;
    collector.observation.to_path(&obs_path, config.target_version)?;
    info!("wrote {}", obs_path.display());

    ensure_creatable(&nav_path)?;
    collector.navigation.to_path(&nav_path, config.target_version)?;
    info!("wrote {}", nav_path.display());

    if config.rtk && !collector.solution.is_empty() {
        let rtk_path = workspace.join(format!("{}.pos", site.to_lowercase()));
        ensure_creatable(&rtk_path)?;
        let mut out = File::create(&rtk_path).map_err(Error::CannotCreateOutput)?;
        collector
            .solution
            .write(&mut out, &config.dispatcher)
            .map_err(Error::CannotCreateOutput)?;
        info!("wrote {}", rtk_path.display());
    }

    Ok(())
}

/// Drains `source` to completion, feeding every decoded message through
/// `dispatcher` and `collector`. Returns `(messages_seen, errors_seen)`.
fn drive<S: MessageSource>(mut source: S, dispatcher: &mut Dispatcher, collector: &mut pipeline::Collector) -> (u64, u64) {
    let mut messages = 0u64;
    let mut errors = 0u64;
    loop {
        match source.read_message() {
            Ok(payload) => {
                messages += 1;
                if payload.is_empty() {
                    errors += 1;
                    continue;
                }
                let mid = payload[0];
                match dispatcher.dispatch(mid, &payload) {
                    Ok(events) => {
                        for event in events {
                            collector.ingest(event, dispatcher);
                        }
                    }
                    Err(e) => {
                        warn!("dispatch error on MID {}: {}", mid, e);
                        errors += 1;
                    }
                }
            }
            Err(FrameError::Eof) => break,
            Err(e) => {
                warn!("stream error: {}", e);
                errors += 1;
            }
        }
    }
    (messages, errors)
}

/// Common surface of [FramedReader] and [StrippedReader] the driver loop
/// needs; lets [drive] stay agnostic of which framing mode is active.
trait MessageSource {
    fn read_message(&mut self) -> Result<Vec<u8>, FrameError>;
}

impl<R: std::io::Read> MessageSource for FramedReader<R> {
    fn read_message(&mut self) -> Result<Vec<u8>, FrameError> {
        FramedReader::read_message(self)
    }
}

impl<R: std::io::Read> MessageSource for StrippedReader<R> {
    fn read_message(&mut self) -> Result<Vec<u8>, FrameError> {
        StrippedReader::read_message(self)
    }
}

/// Fills the `PGM / RUN BY / DATE`, marker name and constellation fields
/// both output headers need, derived from CLI/driver state rather than
/// anything C5 emits (§4.8 obligations).
fn finalize_headers(collector: &mut pipeline::Collector, config: &Config, input_path: &Path) -> Result<(), Error> {
    let date = hifitime::Epoch::now()
        .map(|now| {
            let (y, m, d, hh, mm, ss, _) = now.to_gregorian_utc();
            format!("{:04}{:02}{:02} {:02}{:02}{:02} UTC", y, m, d, hh, mm, ss)
        })
        .unwrap_or_else(|_| "UNKNOWN".to_string());
    let site = marker_site(config, input_path);

    for header in [&mut collector.observation.header, &mut collector.navigation.header] {
        header.program = "sirf2rnx".to_string();
        header.run_by = "rtk-rs".to_string();
        header.date = date.clone();
        if header.constellation.is_none() {
            header.constellation = derive_constellation(header);
        }
    }
    collector.observation.header.push(Label::MarkerName, Payload::Text(site));
    Ok(())
}

/// Mirrors the fallback the writer itself would compute for `VERSION`, so
/// `TIME OF FIRST/LAST OBS`'s system field agrees with it (§4.8).
fn derive_constellation(header: &Header) -> Option<Constellation> {
    let mut systems: Vec<_> = header.systems.keys().copied().collect();
    match systems.pop() {
        Some(only) if systems.is_empty() => Some(only),
        Some(_) => Some(Constellation::Mixed),
        None => None,
    }
}

/// Builds a 4-character RINEX site code from `--marker-name` or the input
/// file's stem, padding with `X` when too short.
fn marker_site(config: &Config, input_path: &Path) -> String {
    let raw = config.marker_name.clone().unwrap_or_else(|| {
        input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sirf")
            .to_string()
    });
    let mut site: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    site.truncate(4);
    while site.len() < 4 {
        site.push('X');
    }
    site.to_uppercase()
}

/// `N` for a GLONASS-only navigation file, `G` ... actually RINEX V2.10
/// nav file types: `N` GPS, `G` GLONASS, `H` SBAS; Mixed/unknown falls back
/// to `N`, the far more common case for this receiver family.
fn nav_file_type(navigation: &Rinex) -> char {
    match navigation.header.constellation {
        Some(Constellation::Glonass) => 'G',
        Some(Constellation::SBAS) => 'H',
        _ => 'N',
    }
}

/// Earliest epoch present in `rinex`, used to name the output file; falls
/// back to the GPS time origin when the store is empty (never written in
/// practice, since [run] already rejects zero-epoch conversions).
fn earliest_epoch(rinex: &Rinex) -> hifitime::Epoch {
    match &rinex.record {
        Record::Observation(_) => rinex
            .header
            .first_obs
            .unwrap_or_else(|| rinex::epoch::gpst_epoch(0, 0.0)),
        Record::Navigation(store) => store
            .iter()
            .map(|r| r.epoch)
            .min()
            .unwrap_or_else(|| rinex::epoch::gpst_epoch(0, 0.0)),
    }
}

fn output_path(workspace: &Path, rinex: &Rinex, config: &Config, site: &str, file_type: char) -> PathBuf {
    let epoch = earliest_epoch(rinex);
    let name = if config.target_version == rinex::version::V210 || config.short_name {
        rinex::filename::v210_filename(site, epoch, file_type)
    } else {
        rinex::filename::v302_filename(
            site,
            "00",
            'R',
            "XXX",
            epoch,
            hifitime::Duration::from_seconds(1.0),
            hifitime::Duration::from_days(1.0),
            rinex.header.constellation,
            file_type,
        )
    };
    let mut path = workspace.join(name);
    if config.gzip {
        let mut os = path.into_os_string();
        os.push(".gz");
        path = PathBuf::from(os);
    }
    path
}

/// `File::create` against the parent directory, surfaced as
/// [Error::CannotCreateOutput] rather than letting the eventual write
/// fail with the less specific [Error::OutputWrite] (§7's exit-code split).
fn ensure_creatable(path: &Path) -> Result<(), Error> {
    File::create(path).map(drop).map_err(Error::CannotCreateOutput)
}

/// True if the filter selection emptied a store that had data before
/// filtering was applied (§4.9) -- the trigger for exit code 4.
fn filter_rejects_everything(collector: &mut pipeline::Collector) -> bool {
    let mut rejected = false;
    if let Some(store) = collector.observation.record.as_mut_obs() {
        let had_data = !store.is_empty();
        collector.observation.filter.apply_to_observations(store);
        if had_data && store.is_empty() {
            rejected = true;
        }
    }
    if let Some(store) = collector.navigation.record.as_mut_nav() {
        let had_data = !store.is_empty();
        collector.navigation.filter.apply_to_navigation(store);
        if had_data && store.is_empty() {
            rejected = true;
        }
    }
    rejected
}
