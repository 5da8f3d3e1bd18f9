use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use wirecast::{codec_from_source, decode_to_json, encode_from_json, to_json, Error};
use wirecast_compiler::{compile_schema, compile_schemas_to_rust, GenOptions};

#[derive(Parser)]
#[command(name = "wcast")]
#[command(about = "Check `.wire` declarations, generate Rust from them, or encode/decode values", long_about = None)]
struct Cli {
    /// Log at DEBUG instead of INFO
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, resolve and verify a type, then print its schema as JSON
    Check {
        /// Input `.wire` file
        #[arg(short, long)]
        input: PathBuf,

        /// Struct or alias to use as the top-level type
        #[arg(short = 't', long = "type")]
        type_name: String,
    },

    /// Generate Rust structs with inlined size/encode/decode routines
    GenRust {
        /// Input `.wire` file
        #[arg(short, long)]
        input: PathBuf,

        /// Top-level types, comma separated or repeated; all land in one file
        #[arg(short = 't', long = "type", value_delimiter = ',', required = true)]
        type_names: Vec<String>,

        /// Output `.rs` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Wrap the generated code in `pub mod <MODULE>`
        #[arg(long)]
        module: Option<String>,

        /// Crate path the generated code imports the runtime from
        #[arg(long, default_value = "wirecast")]
        runtime: String,
    },

    /// Encode a JSON value into the binary format
    Encode {
        /// Input `.wire` file
        #[arg(short, long)]
        input: PathBuf,

        /// Struct or alias to use as the top-level type
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// JSON file holding the value
        #[arg(long)]
        json: PathBuf,

        /// Output binary file (defaults to the JSON file with a `.bin` extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode binary data and print it as JSON
    Decode {
        /// Input `.wire` file
        #[arg(short, long)]
        input: PathBuf,

        /// Struct or alias to use as the top-level type
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Binary file to decode
        #[arg(long)]
        data: PathBuf,

        /// Allow trailing bytes and report how many bytes were consumed
        #[arg(long)]
        prefix: bool,
    },
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    // Create logger
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    match &cli.command {
        Commands::Check { input, type_name } => {
            let text = fs::read_to_string(input)?;
            let schema = compile_schema(&text, type_name)?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }

        Commands::GenRust { input, type_names, output, module, runtime } => {
            let text = fs::read_to_string(input)?;
            let schemas = type_names
                .iter()
                .map(|name| compile_schema(&text, name))
                .collect::<Result<Vec<_>, _>>()?;
            let options = GenOptions { module: module.clone(), runtime_crate: runtime.clone() };
            let rust_code = compile_schemas_to_rust(&schemas, &options)?;
            if let Some(out_path) = output {
                fs::write(out_path, &rust_code)?;
                info!(path = %out_path.display(), "generated rust code");
            } else {
                print!("{}", rust_code);
            }
            Ok(())
        }

        Commands::Encode { input, type_name, json, output } => {
            let codec = codec_from_source(&fs::read_to_string(input)?, type_name)?;
            let bytes = encode_from_json(&codec, &fs::read_to_string(json)?)?;
            let out_path = if let Some(o) = output {
                o.clone()
            } else {
                let mut p = json.clone();
                p.set_extension("bin");
                p
            };
            fs::write(&out_path, &bytes)?;
            info!(path = %out_path.display(), bytes = bytes.len(), "encoded value");
            Ok(())
        }

        Commands::Decode { input, type_name, data, prefix } => {
            let codec = codec_from_source(&fs::read_to_string(input)?, type_name)?;
            let buffer = fs::read(data)?;
            if *prefix {
                let mut value = codec.zero_value();
                let n = codec.decode_prefix(&buffer, &mut value)?;
                println!("{}", serde_json::to_string_pretty(&to_json(codec.schema(), &value))?);
                info!(consumed = n, trailing = buffer.len() - n, "decoded prefix");
            } else {
                println!("{}", decode_to_json(&codec, &buffer)?);
            }
            Ok(())
        }
    }
}
