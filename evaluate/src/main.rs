use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use hashlogit::{Classifier, Config, Dataset, Model};

#[derive(Parser, Debug)]
#[command(about = "A program to evaluate the accuracy of hashlogit.")]
struct Args {
    /// The model file to use when classifying text
    #[arg(long)]
    model: PathBuf,

    /// A labeled test corpus. Each line is `<label>\t<document>` with a label of 0 or 1
    #[arg(long, required = true)]
    data: Vec<PathBuf>,

    /// The width of feature vectors the model was trained with
    #[arg(long, default_value = "100000")]
    num_features: usize,

    /// The model file is compressed with zstd
    #[arg(long)]
    zstd: bool,
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

    eprintln!("Loading dataset...");
    let mut dataset = Dataset::new();
    for path in args.data {
        eprintln!("Loading {path:?} ...");
        dataset.extend_from_tsv(BufReader::new(File::open(path)?))?;
    }
    if dataset.is_empty() {
        return Err("the test corpus is empty".into());
    }

    eprintln!("Start evaluation");
    // counts[gold][predicted]
    let mut counts = [[0usize; 2]; 2];
    for (document, &label) in dataset.documents.iter().zip(&dataset.labels) {
        let predicted = classifier.classify(document)?;
        counts[label as usize][usize::from(predicted)] += 1;
    }
    let loss = classifier.loss(&dataset.documents, &dataset.labels)?;

    let n_correct = counts[0][0] + counts[1][1];
    let n_total = dataset.len();
    let accuracy = n_correct as f64 / n_total as f64;
    println!("# of documents: {n_total}");
    println!("Accuracy: {accuracy}");
    println!("Error rate: {}", 1.0 - accuracy);
    println!("Log loss: {loss}");
    for gold in 0..2 {
        println!(
            "Class {gold}: {} correct, {} misclassified",
            counts[gold][gold],
            counts[gold][1 - gold]
        );
    }

    Ok(())
}
