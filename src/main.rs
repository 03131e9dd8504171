use halfword::config::InterpreterConfig;
use halfword::interpreter::Interpreter;
use halfword::machine::Machine;
use halfword::program::Program;
use log::{debug, info};
use std::env;
use std::fs::File;
use std::io::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Display help information if no program file provided
    if args.len() < 2 {
        println!("halfword - a 16-bit word virtual machine");
        println!();
        println!("Usage: {} <program.bin> [--config <config.toml>]", args[0]);
        println!();
        println!("The program file is a sequence of big-endian 16-bit");
        println!("instruction words, deposited into the code region and");
        println!("executed from offset 0 until the machine halts.");
        return Ok(());
    }

    let program_path = &args[1];

    // Optional --config option
    let mut config = InterpreterConfig::default();
    if args.len() >= 4 && args[2] == "--config" {
        config = InterpreterConfig::from_file(&args[3])?;
        debug!("Loaded config from {}: {:?}", args[3], config);
    }

    // Load the program file with user-friendly error handling
    debug!("Loading program: {}", program_path);
    let mut file = match File::open(program_path) {
        Ok(file) => file,
        Err(e) => {
            match e.kind() {
                std::io::ErrorKind::NotFound => {
                    eprintln!("Error: Program file not found: {}", program_path);
                    eprintln!();
                    eprintln!("Please check:");
                    eprintln!("• File path is correct");
                    eprintln!("• You're running from the right directory");
                    eprintln!("• File exists and is readable");
                }
                std::io::ErrorKind::PermissionDenied => {
                    eprintln!(
                        "Error: Permission denied accessing program file: {}",
                        program_path
                    );
                    eprintln!();
                    eprintln!("Please check file permissions.");
                }
                _ => {
                    eprintln!("Error: Cannot open program file '{}': {}", program_path, e);
                }
            }
            std::process::exit(1);
        }
    };
    let mut program_bytes = Vec::new();
    if let Err(e) = file.read_to_end(&mut program_bytes) {
        eprintln!("Error: Cannot read program file '{}': {}", program_path, e);
        std::process::exit(1);
    }

    let program = Program::from_bytes(&program_bytes)?;
    info!("Loaded {} instruction words", program.len());

    let mut machine = Machine::new();
    machine.load(&program);
    let mut interpreter = Interpreter::with_output(
        machine,
        config,
        Box::new(halfword::output::StdoutSink),
    );

    let result = match interpreter.run() {
        Ok(()) => {
            debug!("Program halted normally.");
            Ok(())
        }
        Err(e) => {
            eprintln!("\nError during execution: {e}");
            Err(e)
        }
    };

    info!("Final state:\n{}", interpreter.machine);

    result.map_err(|e| Box::new(std::io::Error::other(e)) as Box<dyn std::error::Error>)
}
