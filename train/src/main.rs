use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use hashlogit::{Classifier, Config, Dataset};

#[derive(Parser, Debug)]
#[command(about = "A program to train models of hashlogit.")]
struct Args {
    /// A labeled training corpus. Each line is `<label>\t<document>` with a label of 0 or 1
    #[arg(long, required = true)]
    data: Vec<PathBuf>,

    /// The file to write the trained model to
    #[arg(long)]
    model: PathBuf,

    /// The first learning rate tried by gradient descent
    #[arg(long, default_value = "0.01")]
    learning_rate: f64,

    /// The maximum number of gradient steps at each learning rate
    #[arg(long, default_value = "200000")]
    iterations: u32,

    /// The width of feature vectors
    #[arg(long, default_value = "100000")]
    num_features: usize,

    /// Compress the model with zstd at the given level
    #[arg(long)]
    zstd_level: Option<i32>,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    eprintln!("Loading dataset...");
    let mut dataset = Dataset::new();
    for path in args.data {
        eprintln!("Loading {path:?} ...");
        let f = BufReader::new(File::open(path)?);
        dataset.extend_from_tsv(f)?;
        eprintln!("# of documents: {}", dataset.len());
    }

    let config = Config::default()
        .learning_rate(args.learning_rate)
        .iterations(args.iterations)
        .num_features(args.num_features);
    let mut classifier = Classifier::new(config)?;

    eprintln!("Start training...");
    classifier.train(&dataset.documents, &dataset.labels)?;
    eprintln!("Finish training.");
    eprintln!("# of tokens: {}", classifier.dictionary().len());

    if let Some(level) = args.zstd_level {
        let mut f = zstd::Encoder::new(File::create(args.model)?, level)?;
        f.multithread(args.zstd_workers)?;
        classifier.write(&mut f)?;
        f.finish()?;
    } else {
        classifier.save_model(args.model)?;
    }

    Ok(())
}
