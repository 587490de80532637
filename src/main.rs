mod command;

use std::{env, error::Error, process};

use isa::{diagram, docs, registry::InstructionRegistry};
use tracing_subscriber::EnvFilter;

use crate::command::Command;

/// JSON document loaded instead of the default ISA when set.
const ISA_FILE_ENV: &str = "CVERE_ISA";

fn main() {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    let code = exit_code();

    // The non-blocking writer only flushes when its guard is dropped.
    drop(guard);
    process::exit(code);
}

fn exit_code() -> i32 {
    let args = env::args().skip(1).collect::<Vec<String>>();
    let command = match Command::try_from(args.as_slice()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };

    let mut registry = match load_registry() {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("cannot load ISA: {e}");
            return 2;
        }
    };

    match run(command, &mut registry) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{e}");
            2
        }
    }
}

fn load_registry() -> Result<InstructionRegistry, Box<dyn Error>> {
    let mut registry = InstructionRegistry::with_default_isa();
    if let Ok(path) = env::var(ISA_FILE_ENV) {
        registry.import_json(&path)?;
    }
    Ok(registry)
}

fn run(command: Command, registry: &mut InstructionRegistry) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Demo => demo(registry)?,
        Command::Doc => println!("{}", docs::generate_documentation(registry)),
        Command::Analyze => println!("{}", registry.analyze_encoding_space()),
        Command::Show(mnemonic) => println!("{}", diagram::visualize(registry, &mnemonic)?),
        Command::Encode { mnemonic, operands } => {
            let word = registry.codec().encode(&mnemonic, &operands)?;
            println!("0x{word:04X}");
            println!("{}", diagram::bit_layout(registry, word));
        }
        Command::Decode(words) => {
            for line in registry.codec().disassemble_all(0, &words) {
                println!("{line}");
            }
        }
        Command::Export(path) => registry.export_json(path)?,
        Command::Import(path) => {
            registry.import_json(path)?;
            println!("{}", registry.analyze_encoding_space());
        }
    }

    Ok(())
}

fn demo(registry: &InstructionRegistry) -> Result<(), Box<dyn Error>> {
    println!("=== CVERE ISA Designer ===\n");

    println!("Loaded Instructions:");
    let mut specs = registry.all_specs();
    specs.sort_by(|a, b| a.mnemonic.cmp(&b.mnemonic));
    for spec in specs {
        println!(
            "  {:6} (0x{:02X}) - {}",
            spec.mnemonic, spec.opcode, spec.description
        );
    }

    println!("\n=== Encoding Space Analysis ===");
    println!("{}", registry.analyze_encoding_space());

    println!("\n=== Instruction Encoding Visualizations ===");
    for mnemonic in ["ADD", "LOADI", "LOAD", "JMP", "BEQ"] {
        println!("\n{}", diagram::visualize(registry, mnemonic)?);
    }

    println!("\n=== Encoding/Decoding Test ===");
    let codec = registry.codec();
    let cases: [(&str, &[u32]); 3] = [
        ("ADD", &[3, 1, 2]),
        ("LOADI", &[5, 0x42]),
        ("LOAD", &[3, 2, 4]),
    ];
    for (mnemonic, operands) in cases {
        let word = codec.encode(mnemonic, operands)?;
        let decoded = codec.decode(word);
        println!(
            "{mnemonic} {operands:?} -> 0x{word:04X} -> {} {:?}",
            decoded.mnemonic, decoded.operands
        );
    }

    println!("\n=== Generated Documentation ===");
    println!("{}", docs::generate_documentation(registry));

    Ok(())
}
