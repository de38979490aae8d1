use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use schema_cpp_gen::codegen::{self, EmitOptions};

/// Generate C++ data types and nlohmann::json serializers from a JSON Schema.
///
/// Reads the schema, resolves its definitions (including recursive ones) and
/// writes a header with the type declarations and a source file with the
/// to_json/from_json functions.
#[derive(Parser)]
#[command(name = "schema-cpp-gen", version, about)]
struct Cli {
    /// JSON Schema document to read.
    input_schema: PathBuf,

    /// Header file to write the type declarations to.
    output_header: PathBuf,

    /// Source file to write the serialization functions to.
    output_source: PathBuf,

    /// C++ namespace for the generated declarations.
    #[arg(long, default_value = "gap::sarif", env = "SCHEMA_CPP_GEN_NAMESPACE")]
    namespace: String,

    /// Include path of the header, as written in the source file.
    #[arg(long, default_value = "gap/sarif/sarif.hpp", env = "SCHEMA_CPP_GEN_INCLUDE")]
    include: String,

    /// Where the schema was obtained, recorded in the header banner.
    #[arg(long)]
    source_url: Option<String>,

    /// Suppress non-error output.
    #[arg(long, short)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked by `--quiet`.
fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> schema_cpp_gen::error::Result<()> {
    tracing::info!(path = %cli.input_schema.display(), "loading schema");
    let schema = schema_cpp_gen::schema::load_schema(&cli.input_schema)?;
    tracing::info!(
        definitions = schema.definitions.len(),
        "loaded schema"
    );

    let options = EmitOptions {
        namespace: cli.namespace,
        header_include: cli.include,
        source_url: cli.source_url,
    };
    let artifacts = codegen::generate(&schema, &options)?;
    codegen::write_artifacts(&artifacts, &cli.output_header, &cli.output_source)?;

    tracing::info!(
        header = %cli.output_header.display(),
        source = %cli.output_source.display(),
        structs = artifacts.stats.structs_generated,
        enums = artifacts.stats.enums_generated,
        fields = artifacts.stats.fields_generated,
        "done"
    );
    Ok(())
}
