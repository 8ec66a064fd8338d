use crate::config::Config;
use bonjour::StreamOptions;

fn main() {
    let config = match Config::from_file() {
        Ok(value) => value,
        Err(err) => {
            let mut message = format!("Config initialization failed. Error: {err}.");
            if let Some(additional_info) = err.additional_info() {
                message.push_str(&format!(" Additional_info: {additional_info}"));
            }
            println!("{}", message);
            std::process::exit(1);
        },
    };

    let log_level = config.log_level().unwrap_or_else(|err| {
        println!("{}", err);
        std::process::exit(1);
    });
    logging::setup(&log_level, &config).unwrap_or_else(|err| {
        let mut message = format!("Logger initialization failed. Error: {err}.");
        if let Some(additional_info) = err.additional_info() {
            message.push_str(&format!(" Additional_info: {additional_info}"));
        }
        println!("{}", message);
        std::process::exit(1);
    });
    log::info!("Settings loaded. Log level: {}", log_level);

    let source = net::capture::open(&config).unwrap_or_else(|err| {
        let mut message = format!("Capture initialization failed. Error: {err}.");
        if let Some(additional_info) = err.additional_info() {
            message.push_str(&format!(" Additional_info: {additional_info}"));
        }
        log::error!("{}", message);
        std::process::exit(1);
    });

    let options = StreamOptions {
        capacity: config.channel_capacity,
        ..StreamOptions::default()
    };
    let stream = bonjour::produce(source, options).unwrap_or_else(|err| {
        let mut message = format!("Classifier initialization failed. Error: {err}.");
        if let Some(additional_info) = err.additional_info() {
            message.push_str(&format!(" Additional_info: {additional_info}"));
        }
        log::error!("{}", message);
        std::process::exit(1);
    });

    let token = stream.cancel_token();
    let handler = ctrlc::set_handler(move || {
        log::info!("Interrupted. Stopping capture.");
        token.cancel();
    });
    if let Err(err) = handler {
        log::warn!("Failed to set Ctrl-C handler: {err}");
    }

    render::run(stream);
}

mod config;
mod logging;
mod net;
mod render;
