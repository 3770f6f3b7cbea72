//! kvbridge demo binary
//!
//! Drives the marshaling layer the way a runtime binding would.

use clap::{Parser, Subcommand};
use crossbeam::channel;
use kvbridge::{transcode, HostString, StoreConfig, StoreFactory, TextHandle, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// kvbridge demo
#[derive(Parser, Debug)]
#[command(name = "kvbridge-demo")]
#[command(about = "Exercise the kvbridge marshaling and notification layer")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcode text through the UTF-16 path and print the UTF-8 bytes
    Transcode {
        /// Text to transcode
        text: String,
    },

    /// Set values on a store and print the change events they trigger
    Session {
        /// Store instance id
        #[arg(short, long, default_value = "mmkv.default")]
        id: String,

        /// Clear the store after setting the values
        #[arg(short, long)]
        clear: bool,

        /// Assignments as key=value (true/false and numbers keep their type)
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvbridge=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("kvbridge demo v{}", kvbridge::VERSION);

    let code = match args.command {
        Commands::Transcode { text } => run_transcode(&text),
        Commands::Session { id, clear, pairs } => run_session(id, clear, &pairs),
    };

    std::process::exit(code);
}

fn run_transcode(text: &str) -> i32 {
    let units: Vec<u16> = text.encode_utf16().collect();
    let fast = transcode::utf16_to_utf8(&units);
    let scalar = transcode::scalar::utf16_to_utf8(&units);

    println!("backend:     {}", transcode::backend_name());
    println!("utf-16 units: {}", units.len());
    println!("utf-8 bytes:  {}", fast.len());
    println!("hex:          {}", hex(&fast));
    println!("matches scalar: {}", fast == scalar);

    if fast == scalar {
        0
    } else {
        tracing::error!("fast path diverged from scalar path");
        1
    }
}

fn run_session(id: String, clear: bool, pairs: &[String]) -> i32 {
    let factory = StoreFactory::new();
    let store = match factory.create(StoreConfig::builder().id(id).build()) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            return 1;
        }
    };

    let (tx, rx) = channel::unbounded::<String>();
    let listener = store.add_on_value_changed_listener(move |key| {
        // The receiver outlives every notification in this function.
        let _ = tx.send(key.to_string());
    });

    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            tracing::error!("Expected key=value, got {:?}", pair);
            return 1;
        };

        // Keys arrive as runtime strings; a single 8-bit chunk stays zero-copy.
        let host_key = HostString::ascii(key);
        let key = TextHandle::from_external(&host_key);

        if let Err(e) = store.set(&key, parse_value(raw)) {
            tracing::error!("set {} failed: {}", key, e);
            return 1;
        }
    }

    if clear {
        if let Err(e) = store.clear_all() {
            tracing::error!("clear failed: {}", e);
            return 1;
        }
    }

    listener.remove();

    for key in rx.try_iter() {
        println!("changed: {}", key);
    }
    println!("keys: {:?}", store.get_all_keys());
    println!("size: {} bytes", store.size());
    0
}

fn parse_value(raw: &str) -> Value<'_> {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::from(raw),
        },
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
