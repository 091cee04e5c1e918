use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use hashlogit::Model;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "A program to manipulate trained models.")]
struct Args {
    /// Input path of the model file
    #[arg(long)]
    model_in: PathBuf,

    /// The input model file is compressed with zstd
    #[arg(long)]
    zstd_in: bool,

    /// Output path of the model file
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// Compress the output model with zstd at the given level
    #[arg(long)]
    zstd_level: Option<i32>,

    /// Output the dictionary contained in the model as CSV.
    #[arg(long)]
    dump_dict: Option<PathBuf>,
}

#[derive(Serialize)]
struct DictionaryRecord<'a> {
    token: &'a str,
    slot: usize,
    weight: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    eprintln!("Loading model file...");
    let f = fs::File::open(args.model_in)?;
    let rdr: Box<dyn Read> = if args.zstd_in {
        Box::new(zstd::Decoder::new(f)?)
    } else {
        Box::new(BufReader::new(f))
    };
    let model = Model::read(rdr)?;
    eprintln!("# of weights: {}", model.weights().len());
    eprintln!("# of tokens: {}", model.dictionary().len());

    if let Some(path) = args.dump_dict {
        eprintln!("Saving dictionary file...");
        let mut entries: Vec<_> = model.dictionary().iter().collect();
        entries.sort_unstable();
        let mut wtr = csv::Writer::from_writer(fs::File::create(path)?);
        for (token, slot) in entries {
            wtr.serialize(DictionaryRecord {
                token,
                slot,
                weight: model.weights().get(slot).copied(),
            })?;
        }
        wtr.flush()?;
    }

    if let Some(path) = args.model_out {
        eprintln!("Saving model file...");
        let f = fs::File::create(path)?;
        if let Some(level) = args.zstd_level {
            let mut f = zstd::Encoder::new(f, level)?;
            model.write(&mut f)?;
            f.finish()?;
        } else {
            let mut f = BufWriter::new(f);
            model.write(&mut f)?;
            f.flush()?;
        }
    }

    Ok(())
}
