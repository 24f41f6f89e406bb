use clap::*;
use clap_num::maybe_hex;
use log::{debug, error, info, LevelFilter};
use plainfile::{FileHandle, Plain, StateFlags};
use serde::Serialize;
use serde_json::{json, Value};

/// Everything printed about one inspection run.
#[derive(Serialize)]
struct Report {
    path: String,
    size: u64,
    start: u64,
    read_position: u64,
    kind: String,
    values: Vec<Value>,
    eof: bool,
    state: StateFlags,
}

/// Caps `count` so that at most one element more than the file still holds is
/// requested. The extra element keeps a short read visible in the flags.
fn bounded_count(count: usize, remaining: u64, item_size: usize) -> usize {
    let available = remaining / item_size.max(1) as u64;
    let available_items = usize::try_from(available).unwrap_or(usize::MAX);
    let bounded = count.min(available_items.saturating_add(1));
    if bounded < count {
        debug!("Only {} item(s) left in the file, reading {}", available, bounded);
    }
    bounded
}

/// Reads up to `count` values and keeps only the ones actually read.
fn read_values<T: Plain + Serialize>(
    handle: &mut FileHandle,
    count: usize,
    remaining: u64,
) -> Vec<Value> {
    let mut values = vec![T::zeroed(); bounded_count(count, remaining, T::SIZE)];
    let start = handle.read_position();
    handle.read_buffer(&mut values);
    let read = (handle.read_position() - start) as usize;
    values.truncate(read / T::SIZE.max(1));
    values.iter().map(|value| json!(value)).collect()
}

fn read_texts(handle: &mut FileHandle, delimiter: u8, count: usize) -> Vec<Value> {
    let mut values = Vec::new();
    for _ in 0..count {
        let text = handle.read_token(delimiter);
        if handle.eof() && text.is_empty() {
            break;
        }
        values.push(Value::String(text));
    }
    values
}

fn process_file(file_path: &str, kind: &str, offset: u64, count: usize, delimiter: u8) -> Report {
    let mut handle = FileHandle::new();
    info!("Opening the file '{}'...", file_path);
    if !handle.open(file_path, true, false) {
        error!("Could not open '{}' for reading.", file_path);
        std::process::exit(1);
    }

    let size = handle.size();
    debug!("------------------------------------------------------------");
    info!("Size: {} bytes", size);
    info!("Reading {} x '{}' from offset {:#x}", count, kind, offset);
    debug!("------------------------------------------------------------");

    handle.set_read_position(offset);
    let remaining = size.saturating_sub(offset);
    let values = match kind {
        "line" => read_texts(&mut handle, b'\n', count),
        "string" => read_texts(&mut handle, 0, count),
        "token" => read_texts(&mut handle, delimiter, count),
        "bytes" => {
            let mut bytes = vec![0u8; bounded_count(count, remaining, 1)];
            let start = handle.read_position();
            handle.read_buffer(&mut bytes);
            bytes.truncate((handle.read_position() - start) as usize);
            vec![Value::String(String::from_utf8_lossy(&bytes).into_owned())]
        }
        "u8" => read_values::<u8>(&mut handle, count, remaining),
        "u16" => read_values::<u16>(&mut handle, count, remaining),
        "u32" => read_values::<u32>(&mut handle, count, remaining),
        "u64" => read_values::<u64>(&mut handle, count, remaining),
        "i8" => read_values::<i8>(&mut handle, count, remaining),
        "i16" => read_values::<i16>(&mut handle, count, remaining),
        "i32" => read_values::<i32>(&mut handle, count, remaining),
        "i64" => read_values::<i64>(&mut handle, count, remaining),
        "f32" => read_values::<f32>(&mut handle, count, remaining),
        "f64" => read_values::<f64>(&mut handle, count, remaining),
        _ => {
            error!("Invalid read kind '{}'.", kind);
            std::process::exit(1);
        }
    };

    let eof = handle.eof();
    Report {
        path: file_path.to_string(),
        size,
        start: offset,
        read_position: handle.read_position(),
        kind: kind.to_string(),
        values,
        eof,
        state: handle.state(),
    }
}

fn print_report(report: &Report) {
    println!("File          : {}", report.path);
    println!("Size          : {} bytes", report.size);
    println!(
        "Read          : {:#x} -> {:#x}",
        report.start, report.read_position
    );
    for value in &report.values {
        match value {
            Value::String(text) => println!("{}", text),
            other => println!("{}", other),
        }
    }
    println!("State         : {} (eof: {})", report.state, report.eof);
}

fn main() {
    let matches = Command::new("plainfile")
        .version(crate_version!())
        .author(crate_authors!())
        .about("Inspect a file as text tokens or fixed-size binary values.")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_parser(value_parser!(String))
                .required(true)
                .help("The path to the file to inspect."),
        )
        .arg(
            Arg::new("offset")
                .short('o')
                .long("offset")
                .value_parser(maybe_hex::<u64>)
                .required(false)
                .help("Start reading at a specific offset."),
        )
        .arg(
            Arg::new("read")
                .short('r')
                .long("read")
                .value_parser([
                    "line", "string", "token", "bytes", "u8", "u16", "u32", "u64", "i8", "i16",
                    "i32", "i64", "f32", "f64",
                ])
                .default_value("line")
                .help("What to read: text units or a fixed-size value type."),
        )
        .arg(
            Arg::new("count")
                .short('c')
                .long("count")
                .value_parser(maybe_hex::<usize>)
                .required(false)
                .help("How many items (or bytes, for 'bytes') to read."),
        )
        .arg(
            Arg::new("delimiter")
                .short('d')
                .long("delimiter")
                .value_parser(value_parser!(char))
                .required(false)
                .help("Single-byte delimiter used by 'token' reads."),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the result as JSON."),
        )
        .arg(
            Arg::new("log_level")
                .short('l')
                .long("log-level")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .default_value("info")
                .help("Set the log verbosity level"),
        )
        .get_matches();

    let log_level_str = matches
        .get_one::<String>("log_level")
        .map(String::as_str)
        .unwrap_or("info");
    let level_filter = match log_level_str {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level_filter).init();

    let Some(file_path) = matches.get_one::<String>("file") else {
        error!("A file path is required.");
        std::process::exit(1);
    };
    let kind = matches
        .get_one::<String>("read")
        .map(String::as_str)
        .unwrap_or("line");
    let offset = matches.get_one::<u64>("offset").copied().unwrap_or(0);
    let count = matches.get_one::<usize>("count").copied().unwrap_or(1);
    let delimiter = matches.get_one::<char>("delimiter").copied().unwrap_or(',');
    let Ok(delimiter) = u8::try_from(delimiter) else {
        error!("The delimiter '{}' is not a single byte.", delimiter);
        std::process::exit(1);
    };

    let report = process_file(file_path, kind, offset, count, delimiter);
    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                error!("Could not serialize the report: {}", err);
                std::process::exit(1);
            }
        }
    } else {
        print_report(&report);
    }
}
