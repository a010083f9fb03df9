// Entry point for the weave client CLI
// Every command works against the local Sled ledger under WEAVE_DATA_DIR
use clap::Parser;
use log::{error, info, LevelFilter};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process;
use weave_client::{
    Batcher, Chunker, Combiner, Command, Ledger, Opt, SledLedger, Transactor, Wallet,
    WeaveError, GLOBAL_CONFIG,
};

fn main() {
    // Info level by default, RUST_LOG still wins
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Err(e) = run(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = opt.data_dir {
        GLOBAL_CONFIG.set_data_dir(dir)?;
    }
    run_command(opt.command)
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Address { key } => {
            let wallet = load_wallet(key)?;
            println!("{}", wallet.get_address());
        }
        Command::Upload {
            file,
            key,
            max_chunk_size,
        } => {
            let wallet = load_wallet(key)?;
            let max_chunk_size = resolve_chunk_size(max_chunk_size)?;
            let (reader, size) = open_payload(&file)?;

            let ledger = open_ledger()?;
            let addresses = Batcher::new(Transactor::new(&ledger), &wallet, reader, size)
                .with_max_chunk_size(max_chunk_size)?
                .send_batch()?;

            for (position, address) in addresses.iter().enumerate() {
                println!("{position}: {address}");
            }
            // send_batch never returns an empty list
            if let Some(head) = addresses.last() {
                println!("Head: {head}");
            }
        }
        Command::Download { head, out } => {
            let ledger = open_ledger()?;
            let combiner = Combiner::new(&ledger);
            // Fetch the whole chain before touching the output file
            let chunks = combiner.get_all_chunks(&head)?;
            let mut writer = BufWriter::new(File::create(&out)?);
            let written = combiner.recombine(&chunks, &mut writer)?;
            info!("Wrote {written} bytes to {}", out.display());
        }
        Command::Show { id } => {
            let ledger = open_ledger()?;
            let record = ledger.fetch_record(&id)?;
            println!("{}", serde_json::to_string_pretty(&record.to_json())?);
        }
        Command::Plan {
            file,
            max_chunk_size,
        } => {
            let max_chunk_size = resolve_chunk_size(max_chunk_size)?;
            let (reader, size) = open_payload(&file)?;
            let chunker = Chunker::with_max_chunk_size(reader, size, max_chunk_size)?;
            println!(
                "{} bytes in {} chunk(s) of at most {max_chunk_size} bytes",
                size,
                chunker.total_chunks()
            );
            for chunk in chunker {
                let chunk = chunk?;
                println!("{}: {} bytes", chunk.get_position(), chunk.get_data().len());
            }
        }
    }
    Ok(())
}

fn load_wallet(key: Option<PathBuf>) -> Result<Wallet, WeaveError> {
    let path = match key {
        Some(path) => path,
        None => GLOBAL_CONFIG.get_key_file()?.ok_or_else(|| {
            WeaveError::Config("no key file: pass --key or set WEAVE_KEY_FILE".to_string())
        })?,
    };
    Wallet::from_file(&path)
}

fn resolve_chunk_size(flag: Option<u64>) -> Result<u64, WeaveError> {
    if let Some(size) = flag {
        GLOBAL_CONFIG.set_max_chunk_size(size)?;
    }
    GLOBAL_CONFIG.get_max_chunk_size()
}

fn open_payload(path: &Path) -> Result<(BufReader<File>, u64), WeaveError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    Ok((BufReader::new(file), size))
}

fn open_ledger() -> Result<SledLedger, WeaveError> {
    SledLedger::open(GLOBAL_CONFIG.get_data_dir()?)
}
