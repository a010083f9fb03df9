use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "weave-client", about = "Sign, chunk and reassemble ledger records")]
pub struct Opt {
    /// Directory of the local ledger database (overrides WEAVE_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "address", about = "Print the address of a key file")]
    Address {
        #[arg(long, help = "RSA key file, JWK or PKCS#8 DER (overrides WEAVE_KEY_FILE)")]
        key: Option<PathBuf>,
    },
    #[command(name = "upload", about = "Split a file into a chain of signed records")]
    Upload {
        #[arg(help = "File to upload")]
        file: PathBuf,
        #[arg(long, help = "RSA key file, JWK or PKCS#8 DER (overrides WEAVE_KEY_FILE)")]
        key: Option<PathBuf>,
        #[arg(long, help = "Raw bytes per chunk (overrides WEAVE_MAX_CHUNK_SIZE)")]
        max_chunk_size: Option<u64>,
    },
    #[command(name = "download", about = "Rebuild a file from the head of its chain")]
    Download {
        #[arg(help = "Address of the head record")]
        head: String,
        #[arg(help = "Where to write the payload")]
        out: PathBuf,
    },
    #[command(name = "show", about = "Print a stored record as wire JSON")]
    Show {
        #[arg(help = "Record address")]
        id: String,
    },
    #[command(name = "plan", about = "Show how a file would be chunked, without signing")]
    Plan {
        #[arg(help = "File to inspect")]
        file: PathBuf,
        #[arg(long, help = "Raw bytes per chunk (overrides WEAVE_MAX_CHUNK_SIZE)")]
        max_chunk_size: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload() {
        let opt = Opt::try_parse_from([
            "weave-client",
            "--data-dir",
            "/tmp/ledger",
            "upload",
            "photo.png",
            "--max-chunk-size",
            "4096",
        ])
        .unwrap();
        assert_eq!(opt.data_dir.as_deref(), Some("/tmp/ledger"));
        match opt.command {
            Command::Upload {
                file,
                key,
                max_chunk_size,
            } => {
                assert_eq!(file, PathBuf::from("photo.png"));
                assert!(key.is_none());
                assert_eq!(max_chunk_size, Some(4096));
            }
            other => panic!("parsed the wrong command: {other:?}"),
        }
    }

    #[test]
    fn test_download_needs_output() {
        assert!(Opt::try_parse_from(["weave-client", "download", "head-id"]).is_err());
    }
}
