use std::fs::File;
use std::io::{prelude::*, stdin, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use hashlogit::{Classifier, Config, Model};

#[derive(Parser, Debug)]
#[command(about = "A program to classify documents read from stdin, one per line.")]
struct Args {
    /// The model file to use when classifying text
    #[arg(long)]
    model: PathBuf,

    /// The width of feature vectors the model was trained with
    #[arg(long, default_value = "100000")]
    num_features: usize,

    /// The model file is compressed with zstd
    #[arg(long)]
    zstd: bool,

    /// Print the probability of class 1 after each label
    #[arg(long)]
    scores: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    eprintln!("Loading model file...");
    let f = File::open(args.model)?;
    let model = if args.zstd {
        Model::read(zstd::Decoder::new(f)?)?
    } else {
        Model::read(BufReader::new(f))?
    };
    let mut classifier = Classifier::new(Config::default().num_features(args.num_features))?;
    classifier.set_model(model)?;

    eprintln!("Start classification");
    let mut n_documents = 0;
    let start = Instant::now();
    for line in stdin().lock().lines() {
        let line = line?;
        let p = classifier.probability(&line)?;
        let label = u8::from(p >= hashlogit::DECISION_THRESHOLD);
        if args.scores {
            println!("{label}\t{p}");
        } else {
            println!("{label}");
        }
        n_documents += 1;
    }
    let duration = start.elapsed();
    eprintln!("Elapsed: {} [sec]", duration.as_secs_f64());
    eprintln!(
        "Speed: {} [documents/sec]",
        n_documents as f64 / duration.as_secs_f64()
    );

    Ok(())
}
