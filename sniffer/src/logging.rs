use crate::config::Config;
use chrono::{Datelike, Local, Timelike};
use log::{LevelFilter, Record};
use std::fmt::Arguments;
use thiserror::Error;

pub const DEFAULT_FORMAT: &str = "[$Y-$m-$D $H:$M:$S $LEVEL] $MESSAGE";
pub const LOG_TITLE: &str = "BONJOUR-SNIFFER";

pub fn setup(log_level: &LevelFilter, config: &Config) -> Result<(), LogError> {
    if log_level.eq(&LevelFilter::Off) {
        return Ok(());
    }

    let format = config.log_format.clone();
    let mut dispatch = fern::Dispatch::new()
        .level(*log_level)
        .format(move |out, message, record| {
            let formatted = parse_format(&format, message, record);

            out.finish(format_args!("{}", formatted))
        })
        .chain(std::io::stdout());

    if config.log_to_file {
        let file = fern::log_file(generate_file_name(LOG_TITLE)).map_err(LogError::IOError)?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().map_err(LogError::SetLoggerError)
}

pub fn generate_file_name(title: &str) -> String {
    let now = Local::now();
    let date = format!(
        "{year:04}-{month:02}-{day:02}",
        year = now.year(),
        month = now.month(),
        day = now.day(),
    );

    let title_formatted = title.trim().replace(" ", "-");
    format!("{title_formatted}_{date}.log")
}

/// Expands `$Y $m $D $H $M $S` (local time), `$LEVEL`, `$TARGET` and `$MESSAGE`.
pub fn parse_format(format: &str, message: &Arguments, record: &Record) -> String {
    // Message text is never expanded
    match format.trim().split_once("$MESSAGE") {
        Some((head, tail)) => format!(
            "{}{}{}",
            expand_tokens(head, record),
            message,
            expand_tokens(tail, record)
        ),
        None => expand_tokens(format.trim(), record),
    }
}

fn expand_tokens(template: &str, record: &Record) -> String {
    let mut log = template.to_string();

    // Time
    let time = Local::now();
    log = log.replacen("$Y", &format!("{:0>2}", time.year()), 1);
    log = log.replacen("$m", &format!("{:0>2}", time.month()), 1);
    log = log.replacen("$D", &format!("{:0>2}", time.day()), 1);
    log = log.replacen("$H", &format!("{:0>2}", time.hour()), 1);
    log = log.replacen("$M", &format!("{:0>2}", time.minute()), 1);
    log = log.replacen("$S", &format!("{:0>2}", time.second()), 1);

    // Level
    log = log.replacen("$LEVEL", record.level().as_str(), 1);

    // Target
    log = log.replacen("$TARGET", record.target(), 1);

    log
}

#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO Error.")]
    IOError(#[from] std::io::Error),

    #[error("Logger initialization error.")]
    SetLoggerError(log::SetLoggerError),
}

impl LogError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            LogError::IOError(err) => Some(err.to_string()),
            LogError::SetLoggerError(err) => Some(err.to_string()),
        }
    }
}
